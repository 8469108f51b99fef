//! `PostgreSQL` full-text search index for agent records.
//!
//! Match quality relies on the generated `search_vector` tsvector column
//! and its GIN index, which live only in the migration. Diesel sees the
//! plain text columns it writes; ranking goes through raw SQL.

use super::{models::MatchedAgentIdRow, models::SearchDocumentRow, schema::agent_search_documents};
use crate::directory::{
    domain::{AgentId, SearchDocument},
    ports::{SearchIndex, SearchIndexError, SearchIndexResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;

use super::repository::DirectoryPgPool;

/// Ranked full-text match over the indexed documents.
const MATCH_SQL: &str = "SELECT agent_id FROM agent_search_documents \
     WHERE search_vector @@ plainto_tsquery('english', $1) \
     ORDER BY ts_rank(search_vector, plainto_tsquery('english', $2)) DESC, agent_id ASC";

/// `PostgreSQL`-backed search index.
#[derive(Debug, Clone)]
pub struct PostgresSearchIndex {
    pool: DirectoryPgPool,
}

impl PostgresSearchIndex {
    /// Creates a new search index from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> SearchIndexResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SearchIndexResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SearchIndexError::index)?;
            f(&mut connection)
        })
        .await
        .map_err(SearchIndexError::index)?
    }
}

impl From<DieselError> for SearchIndexError {
    fn from(err: DieselError) -> Self {
        Self::index(err)
    }
}

#[async_trait]
impl SearchIndex for PostgresSearchIndex {
    async fn upsert(&self, document: &SearchDocument) -> SearchIndexResult<()> {
        let row = SearchDocumentRow::from(document);

        self.run_blocking(move |connection| {
            diesel::insert_into(agent_search_documents::table)
                .values(&row)
                .on_conflict(agent_search_documents::agent_id)
                .do_update()
                .set(&row)
                .execute(connection)
                .map_err(SearchIndexError::index)?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: AgentId) -> SearchIndexResult<()> {
        self.run_blocking(move |connection| {
            diesel::delete(
                agent_search_documents::table
                    .filter(agent_search_documents::agent_id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(SearchIndexError::index)?;
            Ok(())
        })
        .await
    }

    async fn match_ids(&self, query: &str) -> SearchIndexResult<Vec<AgentId>> {
        let text = query.to_owned();

        self.run_blocking(move |connection| {
            let rows = diesel::sql_query(MATCH_SQL)
                .bind::<diesel::sql_types::Text, _>(text.clone())
                .bind::<diesel::sql_types::Text, _>(text)
                .load::<MatchedAgentIdRow>(connection)
                .map_err(SearchIndexError::index)?;
            Ok(rows
                .into_iter()
                .map(|row| AgentId::from_uuid(row.agent_id))
                .collect())
        })
        .await
    }

    async fn rebuild(&self, documents: &[SearchDocument]) -> SearchIndexResult<()> {
        let rows: Vec<SearchDocumentRow> = documents.iter().map(SearchDocumentRow::from).collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, SearchIndexError, _>(|tx| {
                diesel::delete(agent_search_documents::table).execute(tx)?;
                diesel::insert_into(agent_search_documents::table)
                    .values(&rows)
                    .execute(tx)?;
                Ok(())
            })
        })
        .await
    }
}
