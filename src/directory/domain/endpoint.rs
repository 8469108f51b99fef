//! Validated endpoint URL type.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Validated HTTP(S) URL for an agent endpoint or protocol binding.
///
/// The caller's string form is preserved rather than the parser's normalized
/// form, so stored endpoints round-trip byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointUrl(String);

impl EndpointUrl {
    /// Creates a validated endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidEndpointUrl`] when the value
    /// does not parse as an absolute URL, or
    /// [`DirectoryDomainError::UnsupportedEndpointScheme`] for schemes other
    /// than `http` and `https`.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();

        let parsed = Url::parse(trimmed)
            .map_err(|_| DirectoryDomainError::InvalidEndpointUrl(trimmed.to_owned()))?;

        match parsed.scheme() {
            "http" | "https" => Ok(Self(trimmed.to_owned())),
            scheme => Err(DirectoryDomainError::UnsupportedEndpointScheme(
                scheme.to_owned(),
            )),
        }
    }

    /// Returns the endpoint URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EndpointUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
