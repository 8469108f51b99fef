//! In-memory credential repository for tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::credential::{
    domain::{ApiCredential, CredentialId, KeyHash},
    ports::{CredentialRepository, CredentialRepositoryError, CredentialRepositoryResult},
};

/// Thread-safe in-memory credential repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialRepository {
    state: Arc<RwLock<HashMap<CredentialId, ApiCredential>>>,
}

impl InMemoryCredentialRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(
        &self,
    ) -> CredentialRepositoryResult<std::sync::RwLockReadGuard<'_, HashMap<CredentialId, ApiCredential>>>
    {
        self.state.read().map_err(|err| {
            CredentialRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write_state(
        &self,
    ) -> CredentialRepositoryResult<std::sync::RwLockWriteGuard<'_, HashMap<CredentialId, ApiCredential>>>
    {
        self.state.write().map_err(|err| {
            CredentialRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCredentialRepository {
    async fn insert(&self, credential: &ApiCredential) -> CredentialRepositoryResult<()> {
        let mut state = self.write_state()?;
        if state.contains_key(&credential.id()) {
            return Err(CredentialRepositoryError::Duplicate(credential.id()));
        }
        if state
            .values()
            .any(|stored| stored.key_hash() == credential.key_hash())
        {
            return Err(CredentialRepositoryError::Duplicate(credential.id()));
        }
        state.insert(credential.id(), credential.clone());
        Ok(())
    }

    async fn find_by_hash(
        &self,
        hash: &KeyHash,
    ) -> CredentialRepositoryResult<Option<ApiCredential>> {
        let state = self.read_state()?;
        Ok(state
            .values()
            .find(|credential| credential.key_hash() == hash)
            .cloned())
    }

    async fn mark_used(
        &self,
        id: CredentialId,
        at: DateTime<Utc>,
    ) -> CredentialRepositoryResult<Option<ApiCredential>> {
        let mut state = self.write_state()?;
        Ok(state.get_mut(&id).map(|credential| {
            credential.mark_used(at);
            credential.clone()
        }))
    }
}
