//! In-memory credential adapter.
//!
//! Thread-safe and intended for unit tests and embedding; not suitable for
//! production persistence.

mod repository;

pub use repository::InMemoryCredentialRepository;
