//! Service layer for API credential issuance and authentication.

use crate::credential::{
    domain::{ApiCredential, KeyHash, RawApiKey},
    ports::{CredentialRepository, CredentialRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// A newly-issued credential together with its raw key.
///
/// The raw key appears here and nowhere else; callers must hand it to the
/// registrant immediately.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    /// The stored credential record.
    pub credential: ApiCredential,
    /// The one-time presentable secret.
    pub key: RawApiKey,
}

/// Service-level errors for credential operations.
#[derive(Debug, Error)]
pub enum CredentialServiceError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] CredentialRepositoryError),
}

/// Result type for credential service operations.
pub type CredentialServiceResult<T> = Result<T, CredentialServiceError>;

/// Credential issuance and authentication service.
#[derive(Clone)]
pub struct CredentialService<R, C>
where
    R: CredentialRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CredentialService<R, C>
where
    R: CredentialRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new credential service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Issues a fresh credential.
    ///
    /// Blank or whitespace-only labels are stored as no label. The returned
    /// raw key cannot be recovered later.
    ///
    /// # Errors
    ///
    /// Returns an error when the credential cannot be stored.
    pub async fn issue(&self, label: Option<&str>) -> CredentialServiceResult<IssuedCredential> {
        let key = RawApiKey::generate();
        let hash = KeyHash::compute(key.as_str());
        let cleaned = label
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_owned);

        let credential = ApiCredential::new(cleaned, hash, &*self.clock);
        self.repository.insert(&credential).await?;

        tracing::info!(credential_id = %credential.id(), "issued API credential");
        Ok(IssuedCredential { credential, key })
    }

    /// Authenticates a presented secret.
    ///
    /// Returns the matching credential with its last-used instant bumped,
    /// or `None` when no stored hash matches. The secret itself is hashed
    /// immediately and never retained.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository lookup or update fails.
    pub async fn authenticate(
        &self,
        presented: &str,
    ) -> CredentialServiceResult<Option<ApiCredential>> {
        let hash = KeyHash::compute(presented);
        let Some(credential) = self.repository.find_by_hash(&hash).await? else {
            return Ok(None);
        };

        Ok(self
            .repository
            .mark_used(credential.id(), self.clock.utc())
            .await?)
    }
}
