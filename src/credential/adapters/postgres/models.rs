//! Diesel row models for credential persistence.

use super::schema::api_credentials;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for credentials.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = api_credentials)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CredentialRow {
    /// Credential identifier.
    pub id: uuid::Uuid,
    /// SHA-256 hex digest of the raw key.
    pub key_hash: String,
    /// Optional human-readable label.
    pub label: Option<String>,
    /// Issuance timestamp.
    pub created_at: DateTime<Utc>,
    /// Instant of the most recent successful authentication.
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Insert model for credentials.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = api_credentials)]
pub struct NewCredentialRow {
    /// Credential identifier.
    pub id: uuid::Uuid,
    /// SHA-256 hex digest of the raw key.
    pub key_hash: String,
    /// Optional human-readable label.
    pub label: Option<String>,
    /// Issuance timestamp.
    pub created_at: DateTime<Utc>,
    /// Instant of the most recent successful authentication.
    pub last_used_at: Option<DateTime<Utc>>,
}
