//! Error types for credential domain validation.

use thiserror::Error;

/// Errors returned while constructing credential domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialDomainError {
    /// The key hash is not a 64-character lowercase hex digest.
    #[error("key hash '{0}' is not a valid SHA-256 hex digest")]
    InvalidKeyHash(String),
}
