//! Raw API keys and their stored hashes.

use super::CredentialDomainError;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix identifying raw keys issued by this service.
const KEY_PREFIX: &str = "agora_";

/// Number of hex characters following the key prefix.
const KEY_HEX_LENGTH: usize = 48;

/// Length of a SHA-256 hex digest in characters.
const HASH_HEX_LENGTH: usize = 64;

/// A freshly-generated API key in its presentable form.
///
/// The raw key is shown to the caller exactly once at issuance; only its
/// hash is stored. Debug output redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct RawApiKey(String);

impl RawApiKey {
    /// Generates a fresh random key of the form `agora_<48 hex>`.
    #[must_use]
    pub fn generate() -> Self {
        let high: u128 = rand::rng().random();
        let low: u64 = rand::rng().random();
        Self(format!("{KEY_PREFIX}{high:032x}{low:016x}"))
    }

    /// Returns the raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the key has the issued `agora_<48 hex>` shape.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.strip_prefix(KEY_PREFIX).is_some_and(|hex| {
            hex.len() == KEY_HEX_LENGTH && hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
        })
    }
}

impl fmt::Debug for RawApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawApiKey").field(&"<redacted>").finish()
    }
}

/// SHA-256 hex digest of a raw API key.
///
/// The digest covers the full raw string, prefix included, so presented
/// keys can be hashed without parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyHash(String);

impl KeyHash {
    /// Hashes a presented secret.
    #[must_use]
    pub fn compute(secret: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(secret.as_bytes())))
    }

    /// Validates a digest loaded from persistence.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialDomainError::InvalidKeyHash`] when the value is
    /// not a 64-character lowercase hex string.
    pub fn new(value: impl Into<String>) -> Result<Self, CredentialDomainError> {
        let raw = value.into();
        let is_valid = raw.len() == HASH_HEX_LENGTH
            && raw.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'));

        if !is_valid {
            return Err(CredentialDomainError::InvalidKeyHash(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the hex digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
