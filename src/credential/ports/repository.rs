//! Repository port for API credential persistence.

use crate::credential::domain::{ApiCredential, CredentialId, KeyHash};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for credential repository operations.
pub type CredentialRepositoryResult<T> = Result<T, CredentialRepositoryError>;

/// Credential persistence contract.
///
/// Lookup is by key hash only; presented secrets are hashed by the caller
/// and never reach the repository.
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    /// Stores a new credential.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialRepositoryError::Duplicate`] when the credential
    /// id or key hash already exists.
    async fn insert(&self, credential: &ApiCredential) -> CredentialRepositoryResult<()>;

    /// Finds the credential whose stored digest matches `hash`.
    ///
    /// Returns `None` when no credential matches.
    async fn find_by_hash(
        &self,
        hash: &KeyHash,
    ) -> CredentialRepositoryResult<Option<ApiCredential>>;

    /// Records a successful authentication and returns the updated
    /// credential, or `None` when the credential no longer exists.
    async fn mark_used(
        &self,
        id: CredentialId,
        at: DateTime<Utc>,
    ) -> CredentialRepositoryResult<Option<ApiCredential>>;
}

/// Errors returned by credential repository implementations.
#[derive(Debug, Clone, Error)]
pub enum CredentialRepositoryError {
    /// A credential with the same identifier or key hash already exists.
    #[error("duplicate credential: {0}")]
    Duplicate(CredentialId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl CredentialRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
