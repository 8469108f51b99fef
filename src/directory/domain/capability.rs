//! Agent capability descriptor.

use serde::{Deserialize, Serialize};

/// A single capability advertised by an agent.
///
/// Capability content is provider-declared and intentionally loose: ids and
/// names are free text, and mode lists follow the A2A agent-card vocabulary.
/// The serialized form (camelCase keys) is shared between JSONB storage and
/// agent-card parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapability {
    id: String,
    name: String,
    description: Option<String>,
    input_modes: Option<Vec<String>>,
    output_modes: Option<Vec<String>>,
}

impl AgentCapability {
    /// Creates a capability with the required id and name.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            input_modes: None,
            output_modes: None,
        }
    }

    /// Sets an optional description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the accepted input modes.
    #[must_use]
    pub fn with_input_modes(mut self, modes: Vec<String>) -> Self {
        self.input_modes = Some(modes);
        self
    }

    /// Sets the produced output modes.
    #[must_use]
    pub fn with_output_modes(mut self, modes: Vec<String>) -> Self {
        self.output_modes = Some(modes);
        self
    }

    /// Returns the capability identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the optional input mode list.
    #[must_use]
    pub fn input_modes(&self) -> Option<&[String]> {
        self.input_modes.as_deref()
    }

    /// Returns the optional output mode list.
    #[must_use]
    pub fn output_modes(&self) -> Option<&[String]> {
        self.output_modes.as_deref()
    }
}
