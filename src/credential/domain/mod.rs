//! Domain model for API credentials.
//!
//! Credentials carry an irreversible hash of their secret; the raw key is
//! materialized once at issuance and never stored.

mod credential;
mod error;
mod ids;
mod key;

pub use credential::{ApiCredential, PersistedCredentialData};
pub use error::CredentialDomainError;
pub use ids::CredentialId;
pub use key::{KeyHash, RawApiKey};
