//! Repository port for agent record persistence and querying.

use crate::directory::domain::{
    AgentId, AgentPatch, AgentRecord, CategoryCount, DirectoryStats, ProbeRecord, RecordPage,
    RecordQuery, VerificationChallenge,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for agent repository operations.
pub type AgentRepositoryResult<T> = Result<T, AgentRepositoryError>;

/// Agent record persistence contract.
///
/// Targeted mutation methods return the updated record, or `None` when no
/// record has the given id. Write methods never invent timestamps; the
/// caller supplies the mutation instant so the value it observes and the
/// value persisted are the same.
#[async_trait]
pub trait AgentRepository: Send + Sync {
    /// Stores a new agent record.
    ///
    /// # Errors
    ///
    /// Returns [`AgentRepositoryError::Duplicate`] when the record id already
    /// exists.
    async fn insert(&self, record: &AgentRecord) -> AgentRepositoryResult<()>;

    /// Finds an agent record by identifier.
    ///
    /// Returns `None` when the record does not exist.
    async fn find_by_id(&self, id: AgentId) -> AgentRepositoryResult<Option<AgentRecord>>;

    /// Applies a partial update and returns the updated record.
    async fn apply_patch(
        &self,
        id: AgentId,
        patch: &AgentPatch,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>>;

    /// Deletes an agent record.
    ///
    /// Returns `true` when a record was removed.
    async fn delete(&self, id: AgentId) -> AgentRepositoryResult<bool>;

    /// Evaluates a structured query, returning one page of matches ordered
    /// by registration time, newest first, plus the pre-pagination total.
    async fn search(&self, query: &RecordQuery) -> AgentRepositoryResult<RecordPage>;

    /// Returns all records with `Active` status.
    async fn list_active(&self) -> AgentRepositoryResult<Vec<AgentRecord>>;

    /// Returns all records regardless of status.
    async fn list_all(&self) -> AgentRepositoryResult<Vec<AgentRecord>>;

    /// Returns directory-wide aggregate counts.
    async fn stats(&self) -> AgentRepositoryResult<DirectoryStats>;

    /// Returns per-category occupancy, most populated first.
    async fn category_counts(&self) -> AgentRepositoryResult<Vec<CategoryCount>>;

    /// Stores a fresh ownership challenge on the record.
    async fn store_challenge(
        &self,
        id: AgentId,
        challenge: &VerificationChallenge,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>>;

    /// Marks the record's claimed domain verified.
    async fn mark_verified(
        &self,
        id: AgentId,
        at: DateTime<Utc>,
    ) -> AgentRepositoryResult<Option<AgentRecord>>;

    /// Stores the outcome of a health probe on the record.
    async fn record_probe(
        &self,
        id: AgentId,
        probe: &ProbeRecord,
    ) -> AgentRepositoryResult<Option<AgentRecord>>;
}

/// Errors returned by agent repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AgentRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate agent identifier: {0}")]
    Duplicate(AgentId),

    /// The record was not found.
    #[error("agent not found: {0}")]
    NotFound(AgentId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AgentRepositoryError {
    /// Wraps a data-quality or deserialization error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
