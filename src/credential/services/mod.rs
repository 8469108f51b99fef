//! Service layer for the credential context.

mod issuance;

pub use issuance::{CredentialService, CredentialServiceError, IssuedCredential};
