//! API credential aggregate.

use super::{CredentialId, KeyHash};
use chrono::{DateTime, Utc};
use mockable::Clock;

/// An issued API credential.
///
/// Holds only the hash of the secret; the raw key exists solely in the
/// issuance response. `last_used_at` stays unset until the first successful
/// authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCredential {
    id: CredentialId,
    label: Option<String>,
    key_hash: KeyHash,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
}

/// Raw field values for rebuilding a credential from persistence.
#[derive(Debug, Clone)]
pub struct PersistedCredentialData {
    /// Credential identifier.
    pub id: CredentialId,
    /// Optional human-readable label.
    pub label: Option<String>,
    /// Stored digest of the raw key.
    pub key_hash: KeyHash,
    /// Issuance timestamp.
    pub created_at: DateTime<Utc>,
    /// Instant of the most recent successful authentication.
    pub last_used_at: Option<DateTime<Utc>>,
}

impl ApiCredential {
    /// Creates a new credential with a fresh identifier.
    #[must_use]
    pub fn new(label: Option<String>, key_hash: KeyHash, clock: &impl Clock) -> Self {
        Self {
            id: CredentialId::new(),
            label,
            key_hash,
            created_at: clock.utc(),
            last_used_at: None,
        }
    }

    /// Rebuilds a credential from persisted field values.
    #[must_use]
    pub fn from_persisted(data: PersistedCredentialData) -> Self {
        Self {
            id: data.id,
            label: data.label,
            key_hash: data.key_hash,
            created_at: data.created_at,
            last_used_at: data.last_used_at,
        }
    }

    /// Returns the credential identifier.
    #[must_use]
    pub const fn id(&self) -> CredentialId {
        self.id
    }

    /// Returns the optional label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the stored key digest.
    #[must_use]
    pub const fn key_hash(&self) -> &KeyHash {
        &self.key_hash
    }

    /// Returns the issuance timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the instant of the most recent successful authentication.
    #[must_use]
    pub const fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    /// Records a successful authentication.
    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        self.last_used_at = Some(at);
    }
}
