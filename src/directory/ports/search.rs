//! Search index port for free-text agent discovery.

use crate::directory::domain::{AgentId, SearchDocument};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for search index operations.
pub type SearchIndexResult<T> = Result<T, SearchIndexError>;

/// Free-text index contract.
///
/// The index holds a derived projection of the record store and can always
/// be regenerated from it via [`SearchIndex::rebuild`]. Implementations must
/// tokenize stored documents and query text with the same scheme, or
/// matching silently degrades.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Inserts or replaces the document for one agent.
    async fn upsert(&self, document: &SearchDocument) -> SearchIndexResult<()>;

    /// Removes the document for one agent.
    ///
    /// Removing an unindexed agent is not an error.
    async fn remove(&self, id: AgentId) -> SearchIndexResult<()>;

    /// Returns ids of agents matching the free-text query, best match first.
    async fn match_ids(&self, text: &str) -> SearchIndexResult<Vec<AgentId>>;

    /// Replaces the entire index with the given documents.
    async fn rebuild(&self, documents: &[SearchDocument]) -> SearchIndexResult<()>;
}

/// Errors returned by search index implementations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Index-layer failure.
    #[error("search index error: {0}")]
    Index(Arc<dyn std::error::Error + Send + Sync>),
}

impl SearchIndexError {
    /// Wraps an index backend error.
    pub fn index(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Index(Arc::new(err))
    }
}
