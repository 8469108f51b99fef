//! Error types for directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The agent name is empty after trimming.
    #[error("agent name must not be empty")]
    EmptyAgentName,

    /// The agent name exceeds the 200-character limit.
    #[error("agent name exceeds 200 character limit: {0}")]
    AgentNameTooLong(String),

    /// The agent description is empty or whitespace only.
    #[error("agent description must not be empty")]
    EmptyDescription,

    /// The agent description exceeds the 2000-character limit.
    #[error("agent description exceeds 2000 character limit ({0} characters)")]
    DescriptionTooLong(usize),

    /// The endpoint URL could not be parsed as an absolute URL.
    #[error("endpoint URL '{0}' is not a valid absolute URL")]
    InvalidEndpointUrl(String),

    /// The endpoint URL uses a scheme other than `http` or `https`.
    #[error("endpoint URL scheme '{0}' is not supported (only http and https)")]
    UnsupportedEndpointScheme(String),

    /// The tag list exceeds the 20-entry limit.
    #[error("tag list exceeds 20 entry limit ({0} entries)")]
    TooManyTags(usize),

    /// The verification domain is empty after trimming.
    #[error("verification domain must not be empty")]
    EmptyDomainName,

    /// The verification domain contains whitespace or control characters.
    #[error("verification domain '{0}' contains invalid characters")]
    InvalidDomainName(String),

    /// The verification domain exceeds the 253-character DNS limit.
    #[error("verification domain exceeds 253 character limit: {0}")]
    DomainNameTooLong(String),

    /// The challenge token does not match the `agora-verify=<32 hex>` shape.
    #[error("challenge token '{0}' is not a valid agora-verify token")]
    InvalidChallengeToken(String),

    /// The page limit falls outside the accepted 1..=100 range.
    #[error("page limit must be between 1 and 100: {0}")]
    LimitOutOfRange(u32),

    /// Verification was confirmed without a pending challenge.
    #[error("no verification challenge is pending for this agent")]
    NoPendingChallenge,
}

/// Error returned while parsing agent status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);

/// Error returned while parsing a protocol kind from a filter or column.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown protocol kind: {0}")]
pub struct ParseProtocolKindError(pub String);

/// Error returned while parsing a probe status from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown probe status: {0}")]
pub struct ParseProbeStatusError(pub String);
