//! DNS resolution port for domain-ownership verification.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for TXT record lookups.
pub type TxtLookupResult = Result<Vec<String>, TxtLookupError>;

/// TXT record lookup contract.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// Resolves every TXT string published at the given record name.
    ///
    /// Multi-string records are flattened into individual entries.
    ///
    /// # Errors
    ///
    /// Returns [`TxtLookupError`] when resolution fails, including when the
    /// record name does not exist.
    async fn lookup_txt(&self, name: &str) -> TxtLookupResult;
}

/// Errors returned by TXT resolver implementations.
#[derive(Debug, Clone, Error)]
pub enum TxtLookupError {
    /// Resolution failure, including nonexistent names.
    #[error("dns lookup failed: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl TxtLookupError {
    /// Wraps a resolver error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
