//! `PostgreSQL` adapters for directory persistence and full-text search.

mod models;
mod repository;
mod schema;
mod search_index;

pub use repository::{DirectoryPgPool, PostgresAgentRepository};
pub use search_index::PostgresSearchIndex;
