//! Diesel schema for agent directory persistence.

diesel::table! {
    /// Published agent records.
    agents (id) {
        /// Internal agent identifier.
        id -> Uuid,
        /// Credential that owns the record.
        owner_id -> Uuid,
        /// Display name.
        #[max_length = 200]
        name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Primary service endpoint URL.
        endpoint_url -> Text,
        /// Published version string.
        #[max_length = 100]
        version -> Nullable<Varchar>,
        /// Provider organization metadata as JSONB.
        provider -> Nullable<Jsonb>,
        /// Advertised capabilities as a JSONB array.
        capabilities -> Jsonb,
        /// Category slugs as a JSONB array.
        categories -> Jsonb,
        /// Free-form tags as a JSONB array.
        tags -> Jsonb,
        /// A2A agent card URL.
        a2a_agent_card_url -> Nullable<Text>,
        /// MCP server URL.
        mcp_server_url -> Nullable<Text>,
        /// Accepted authentication schemes as a JSONB array.
        auth_schemes -> Jsonb,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Claimed domain of the pending ownership challenge.
        #[max_length = 253]
        verification_domain -> Nullable<Varchar>,
        /// Token of the pending ownership challenge.
        #[max_length = 100]
        verification_token -> Nullable<Varchar>,
        /// Whether a domain confirmation has succeeded.
        verified -> Bool,
        /// Instant of the last successful confirmation.
        verified_at -> Nullable<Timestamptz>,
        /// Rendered outcome of the latest health probe.
        last_probe_status -> Nullable<Text>,
        /// Instant of the latest health probe.
        last_probe_at -> Nullable<Timestamptz>,
        /// Registration timestamp.
        registered_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Denormalized search documents, one per agent.
    ///
    /// The table also carries a generated `search_vector` tsvector column
    /// with a GIN index; it is populated by the database and never written
    /// through Diesel, so it is deliberately absent here.
    agent_search_documents (agent_id) {
        /// Identifier of the projected agent.
        agent_id -> Uuid,
        /// Agent display name.
        name -> Text,
        /// Agent description.
        description -> Text,
        /// Space-joined category slugs.
        categories_text -> Text,
        /// Space-joined tags.
        tags_text -> Text,
        /// Concatenated capability names and descriptions.
        capabilities_text -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(agents, agent_search_documents);
