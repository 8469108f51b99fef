//! Port contracts for agent directory persistence, search, and probing.
//!
//! Ports define infrastructure-agnostic interfaces used by directory
//! services.

pub mod dns;
pub mod probe;
pub mod repository;
pub mod search;

pub use dns::{TxtLookupError, TxtLookupResult, TxtResolver};
pub use probe::EndpointProber;
pub use repository::{AgentRepository, AgentRepositoryError, AgentRepositoryResult};
pub use search::{SearchIndex, SearchIndexError, SearchIndexResult};
