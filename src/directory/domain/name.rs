//! Validated agent name and description types.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum length for an agent name, in characters.
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for an agent description, in characters.
const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Validated display name for a registered agent.
///
/// Names keep their original casing (e.g. `Invoice Reconciler`); they are
/// trimmed but otherwise stored as supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a validated agent name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyAgentName`] when the value is
    /// empty after trimming, or [`DirectoryDomainError::AgentNameTooLong`]
    /// when it exceeds 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(DirectoryDomainError::EmptyAgentName);
        }

        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DirectoryDomainError::AgentNameTooLong(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the agent name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated free-text description of an agent's purpose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentDescription(String);

impl AgentDescription {
    /// Creates a validated agent description.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyDescription`] when the value is
    /// empty or whitespace only, or
    /// [`DirectoryDomainError::DescriptionTooLong`] when it exceeds 2000
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();

        if raw.trim().is_empty() {
            return Err(DirectoryDomainError::EmptyDescription);
        }

        let length = raw.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            return Err(DirectoryDomainError::DescriptionTooLong(length));
        }

        Ok(Self(raw))
    }

    /// Returns the description as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AgentDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AgentDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
