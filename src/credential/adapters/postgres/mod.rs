//! `PostgreSQL` adapters for credential persistence.

mod models;
mod repository;
mod schema;

pub use repository::{CredentialPgPool, PostgresCredentialRepository};
