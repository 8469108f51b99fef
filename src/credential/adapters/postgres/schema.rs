//! Diesel schema for credential persistence.

diesel::table! {
    /// Issued API credentials, hash only.
    api_credentials (id) {
        /// Credential identifier.
        id -> Uuid,
        /// SHA-256 hex digest of the raw key.
        #[max_length = 64]
        key_hash -> Varchar,
        /// Optional human-readable label.
        label -> Nullable<Text>,
        /// Issuance timestamp.
        created_at -> Timestamptz,
        /// Instant of the most recent successful authentication.
        last_used_at -> Nullable<Timestamptz>,
    }
}
