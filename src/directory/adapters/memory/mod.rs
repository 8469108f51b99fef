//! In-memory adapters for the directory context.
//!
//! Thread-safe implementations of the directory ports backed by standard
//! collections, intended for unit tests and local development. Not suitable
//! for production use.

mod prober;
mod repository;
mod resolver;
mod search_index;

pub use prober::InMemoryEndpointProber;
pub use repository::InMemoryAgentRepository;
pub use resolver::InMemoryTxtResolver;
pub use search_index::InMemorySearchIndex;
