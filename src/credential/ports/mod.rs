//! Port contracts for API credential persistence.

pub mod repository;

pub use repository::{CredentialRepository, CredentialRepositoryError, CredentialRepositoryResult};
