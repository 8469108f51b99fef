//! In-memory search index for agent directory tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::{
    domain::{AgentId, SearchDocument, tokenize},
    ports::{SearchIndex, SearchIndexError, SearchIndexResult},
};

/// Thread-safe in-memory search index.
///
/// Documents are stored as stemmed token lists. A query matches a document
/// when every query token appears in it; results rank by the number of
/// matching token occurrences so denser matches surface first.
#[derive(Debug, Clone, Default)]
pub struct InMemorySearchIndex {
    state: Arc<RwLock<HashMap<AgentId, Vec<String>>>>,
}

impl InMemorySearchIndex {
    /// Creates an empty in-memory index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(
        &self,
    ) -> SearchIndexResult<std::sync::RwLockReadGuard<'_, HashMap<AgentId, Vec<String>>>> {
        self.state
            .read()
            .map_err(|err| SearchIndexError::index(std::io::Error::other(err.to_string())))
    }

    fn write_state(
        &self,
    ) -> SearchIndexResult<std::sync::RwLockWriteGuard<'_, HashMap<AgentId, Vec<String>>>> {
        self.state
            .write()
            .map_err(|err| SearchIndexError::index(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl SearchIndex for InMemorySearchIndex {
    async fn upsert(&self, document: &SearchDocument) -> SearchIndexResult<()> {
        let tokens = tokenize(&document.full_text());
        let mut state = self.write_state()?;
        state.insert(document.agent_id, tokens);
        Ok(())
    }

    async fn remove(&self, id: AgentId) -> SearchIndexResult<()> {
        let mut state = self.write_state()?;
        state.remove(&id);
        Ok(())
    }

    async fn match_ids(&self, text: &str) -> SearchIndexResult<Vec<AgentId>> {
        let query_tokens = tokenize(text);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let state = self.read_state()?;
        let mut scored: Vec<(usize, AgentId)> = state
            .iter()
            .filter_map(|(id, doc_tokens)| {
                query_tokens
                    .iter()
                    .all(|token| doc_tokens.contains(token))
                    .then(|| {
                        let occurrences = doc_tokens
                            .iter()
                            .filter(|token| query_tokens.contains(token))
                            .count();
                        (occurrences, *id)
                    })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| a.1.as_ref().cmp(b.1.as_ref()))
        });
        Ok(scored.into_iter().map(|(_, id)| id).collect())
    }

    async fn rebuild(&self, documents: &[SearchDocument]) -> SearchIndexResult<()> {
        let rebuilt: HashMap<AgentId, Vec<String>> = documents
            .iter()
            .map(|document| (document.agent_id, tokenize(&document.full_text())))
            .collect();
        let mut state = self.write_state()?;
        *state = rebuilt;
        Ok(())
    }
}
