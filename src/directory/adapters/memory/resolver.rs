//! In-memory TXT resolver for verification tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::ports::{TxtLookupError, TxtLookupResult, TxtResolver};

/// Scriptable in-memory TXT resolver.
///
/// Record names without a configured response behave like nonexistent DNS
/// names and fail the lookup, matching how a real resolver reports NXDOMAIN.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTxtResolver {
    responses: Arc<RwLock<HashMap<String, TxtLookupResult>>>,
}

impl InMemoryTxtResolver {
    /// Creates a resolver with no configured records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the TXT strings returned for a record name.
    pub fn set_records(&self, name: impl Into<String>, values: Vec<String>) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(name.into(), Ok(values));
        }
    }

    /// Configures a lookup failure for a record name.
    pub fn set_failure(&self, name: impl Into<String>, message: impl Into<String>) {
        if let Ok(mut responses) = self.responses.write() {
            responses.insert(
                name.into(),
                Err(TxtLookupError::lookup(std::io::Error::other(message.into()))),
            );
        }
    }
}

#[async_trait]
impl TxtResolver for InMemoryTxtResolver {
    async fn lookup_txt(&self, name: &str) -> TxtLookupResult {
        let responses = self
            .responses
            .read()
            .map_err(|err| TxtLookupError::lookup(std::io::Error::other(err.to_string())))?;
        responses.get(name).cloned().unwrap_or_else(|| {
            Err(TxtLookupError::lookup(std::io::Error::other(format!(
                "no TXT records found for {name}"
            ))))
        })
    }
}
