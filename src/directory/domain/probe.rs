//! Endpoint reachability probe outcomes.

use super::ParseProbeStatusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum stored length of an unreachable reason, in characters.
const MAX_REASON_LENGTH: usize = 100;

/// Classified outcome of a single reachability probe.
///
/// The storage form is the canonical string: `healthy`, `unhealthy:<code>`,
/// or `unreachable:<reason>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ProbeStatus {
    /// The endpoint answered with a success status.
    Healthy,
    /// The endpoint answered with the given non-success status code.
    Unhealthy(u16),
    /// The endpoint could not be reached; carries a bounded reason.
    Unreachable(String),
}

impl ProbeStatus {
    /// Classifies an HTTP response status code.
    #[must_use]
    pub const fn from_status_code(code: u16) -> Self {
        if code >= 200 && code < 300 {
            Self::Healthy
        } else {
            Self::Unhealthy(code)
        }
    }

    /// Creates an unreachable status, truncating the reason to 100
    /// characters so stored statuses stay bounded.
    #[must_use]
    pub fn unreachable(reason: impl Into<String>) -> Self {
        let full = reason.into();
        Self::Unreachable(full.chars().take(MAX_REASON_LENGTH).collect())
    }

    /// Returns `true` for [`ProbeStatus::Healthy`].
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("healthy"),
            Self::Unhealthy(code) => write!(f, "unhealthy:{code}"),
            Self::Unreachable(reason) => write!(f, "unreachable:{reason}"),
        }
    }
}

impl TryFrom<&str> for ProbeStatus {
    type Error = ParseProbeStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value == "healthy" {
            return Ok(Self::Healthy);
        }
        if let Some(code) = value.strip_prefix("unhealthy:") {
            return code
                .parse::<u16>()
                .map(Self::Unhealthy)
                .map_err(|_| ParseProbeStatusError(value.to_owned()));
        }
        if let Some(reason) = value.strip_prefix("unreachable:") {
            return Ok(Self::unreachable(reason));
        }
        Err(ParseProbeStatusError(value.to_owned()))
    }
}

impl TryFrom<String> for ProbeStatus {
    type Error = ParseProbeStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<ProbeStatus> for String {
    fn from(status: ProbeStatus) -> Self {
        status.to_string()
    }
}

/// Timestamped record of the most recent probe against an agent endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    status: ProbeStatus,
    checked_at: DateTime<Utc>,
}

impl ProbeRecord {
    /// Creates a probe record.
    #[must_use]
    pub const fn new(status: ProbeStatus, checked_at: DateTime<Utc>) -> Self {
        Self { status, checked_at }
    }

    /// Returns the classified probe status.
    #[must_use]
    pub const fn status(&self) -> &ProbeStatus {
        &self.status
    }

    /// Returns the probe timestamp.
    #[must_use]
    pub const fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }
}
