//! Diesel row models for agent directory persistence.

use super::schema::{agent_search_documents, agents};
use crate::directory::domain::SearchDocument;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for agent records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgentRow {
    /// Internal agent identifier.
    pub id: uuid::Uuid,
    /// Credential that owns the record.
    pub owner_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Primary service endpoint URL.
    pub endpoint_url: String,
    /// Published version string.
    pub version: Option<String>,
    /// Provider organization JSON payload.
    pub provider: Option<Value>,
    /// Capabilities JSON payload.
    pub capabilities: Value,
    /// Category slugs JSON payload.
    pub categories: Value,
    /// Tags JSON payload.
    pub tags: Value,
    /// A2A agent card URL.
    pub a2a_agent_card_url: Option<String>,
    /// MCP server URL.
    pub mcp_server_url: Option<String>,
    /// Authentication schemes JSON payload.
    pub auth_schemes: Value,
    /// Lifecycle status.
    pub status: String,
    /// Claimed domain of the pending ownership challenge.
    pub verification_domain: Option<String>,
    /// Token of the pending ownership challenge.
    pub verification_token: Option<String>,
    /// Whether a domain confirmation has succeeded.
    pub verified: bool,
    /// Instant of the last successful confirmation.
    pub verified_at: Option<DateTime<Utc>>,
    /// Rendered outcome of the latest health probe.
    pub last_probe_status: Option<String>,
    /// Instant of the latest health probe.
    pub last_probe_at: Option<DateTime<Utc>>,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for agent records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = agents)]
pub struct NewAgentRow {
    /// Internal agent identifier.
    pub id: uuid::Uuid,
    /// Credential that owns the record.
    pub owner_id: uuid::Uuid,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Primary service endpoint URL.
    pub endpoint_url: String,
    /// Published version string.
    pub version: Option<String>,
    /// Provider organization JSON payload.
    pub provider: Option<Value>,
    /// Capabilities JSON payload.
    pub capabilities: Value,
    /// Category slugs JSON payload.
    pub categories: Value,
    /// Tags JSON payload.
    pub tags: Value,
    /// A2A agent card URL.
    pub a2a_agent_card_url: Option<String>,
    /// MCP server URL.
    pub mcp_server_url: Option<String>,
    /// Authentication schemes JSON payload.
    pub auth_schemes: Value,
    /// Lifecycle status.
    pub status: String,
    /// Claimed domain of the pending ownership challenge.
    pub verification_domain: Option<String>,
    /// Token of the pending ownership challenge.
    pub verification_token: Option<String>,
    /// Whether a domain confirmation has succeeded.
    pub verified: bool,
    /// Instant of the last successful confirmation.
    pub verified_at: Option<DateTime<Utc>>,
    /// Rendered outcome of the latest health probe.
    pub last_probe_status: Option<String>,
    /// Instant of the latest health probe.
    pub last_probe_at: Option<DateTime<Utc>>,
    /// Registration timestamp.
    pub registered_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial agent updates.
///
/// `None` fields leave the stored column untouched; the mutation timestamp
/// is always written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = agents)]
pub struct AgentPatchChangeset {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement service endpoint URL.
    pub endpoint_url: Option<String>,
    /// Replacement version string.
    pub version: Option<String>,
    /// Pre-merged provider JSON payload.
    pub provider: Option<Value>,
    /// Replacement capabilities JSON payload.
    pub capabilities: Option<Value>,
    /// Replacement category slugs JSON payload.
    pub categories: Option<Value>,
    /// Replacement tags JSON payload.
    pub tags: Option<Value>,
    /// Replacement A2A agent card URL.
    pub a2a_agent_card_url: Option<String>,
    /// Replacement MCP server URL.
    pub mcp_server_url: Option<String>,
    /// Replacement authentication schemes JSON payload.
    pub auth_schemes: Option<Value>,
    /// Replacement lifecycle status.
    pub status: Option<String>,
    /// Mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert-or-replace model for search documents.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = agent_search_documents)]
pub struct SearchDocumentRow {
    /// Identifier of the projected agent.
    pub agent_id: uuid::Uuid,
    /// Agent display name.
    pub name: String,
    /// Agent description.
    pub description: String,
    /// Space-joined category slugs.
    pub categories_text: String,
    /// Space-joined tags.
    pub tags_text: String,
    /// Concatenated capability names and descriptions.
    pub capabilities_text: String,
}

impl From<&SearchDocument> for SearchDocumentRow {
    fn from(document: &SearchDocument) -> Self {
        Self {
            agent_id: document.agent_id.into_inner(),
            name: document.name.clone(),
            description: document.description.clone(),
            categories_text: document.categories_text.clone(),
            tags_text: document.tags_text.clone(),
            capabilities_text: document.capabilities_text.clone(),
        }
    }
}

/// Row shape for ranked free-text id lookups.
#[derive(Debug, QueryableByName)]
pub struct MatchedAgentIdRow {
    /// Identifier of a matching agent.
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    pub agent_id: uuid::Uuid,
}

/// Row shape for the directory stats query.
#[derive(Debug, QueryableByName)]
pub struct StatsRow {
    /// Number of stored records.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub total_agents: i64,
    /// Number of records with a verified domain.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub verified_agents: i64,
    /// Number of records carrying an A2A binding.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub a2a_agents: i64,
    /// Number of records carrying an MCP binding.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub mcp_agents: i64,
}

/// Row shape for the category occupancy query.
#[derive(Debug, QueryableByName)]
pub struct CategoryCountRow {
    /// Category slug.
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub slug: String,
    /// Number of records listing the category.
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    pub agent_count: i64,
}
