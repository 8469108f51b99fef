//! Protocol binding types for registered agents.

use super::{EndpointUrl, ParseProtocolKindError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interop protocol an agent can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolKind {
    /// Agent-to-agent protocol, advertised via an agent-card URL.
    A2a,
    /// Model Context Protocol, advertised via a server URL.
    Mcp,
}

impl ProtocolKind {
    /// Returns the canonical filter representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A2a => "a2a",
            Self::Mcp => "mcp",
        }
    }
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProtocolKind {
    type Error = ParseProtocolKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "a2a" => Ok(Self::A2a),
            "mcp" => Ok(Self::Mcp),
            _ => Err(ParseProtocolKindError(value.to_owned())),
        }
    }
}

/// Optional protocol endpoints advertised by an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolBindings {
    a2a_agent_card_url: Option<EndpointUrl>,
    mcp_server_url: Option<EndpointUrl>,
}

impl ProtocolBindings {
    /// Creates bindings with no protocols advertised.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a2a_agent_card_url: None,
            mcp_server_url: None,
        }
    }

    /// Sets the A2A agent-card URL.
    #[must_use]
    pub fn with_a2a_agent_card_url(mut self, url: EndpointUrl) -> Self {
        self.a2a_agent_card_url = Some(url);
        self
    }

    /// Sets the MCP server URL.
    #[must_use]
    pub fn with_mcp_server_url(mut self, url: EndpointUrl) -> Self {
        self.mcp_server_url = Some(url);
        self
    }

    /// Returns the A2A agent-card URL.
    #[must_use]
    pub const fn a2a_agent_card_url(&self) -> Option<&EndpointUrl> {
        self.a2a_agent_card_url.as_ref()
    }

    /// Returns the MCP server URL.
    #[must_use]
    pub const fn mcp_server_url(&self) -> Option<&EndpointUrl> {
        self.mcp_server_url.as_ref()
    }

    /// Returns `true` when the given protocol has a binding.
    #[must_use]
    pub const fn binds(&self, kind: ProtocolKind) -> bool {
        match kind {
            ProtocolKind::A2a => self.a2a_agent_card_url.is_some(),
            ProtocolKind::Mcp => self.mcp_server_url.is_some(),
        }
    }
}
