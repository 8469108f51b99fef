//! Agora: a directory service for autonomous agents.
//!
//! Third parties register agent records (name, endpoint, capabilities,
//! protocol bindings) and clients discover them through structured filters
//! and stemmed free-text search. Records can prove domain ownership via a
//! DNS TXT challenge and are liveness-probed on demand or in bulk.
//!
//! # Architecture
//!
//! Agora follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, DNS, HTTP)
//!
//! # Modules
//!
//! - [`directory`]: Agent registration, discovery, verification, and health
//! - [`credential`]: API credential issuance and authentication

pub mod credential;
pub mod directory;
