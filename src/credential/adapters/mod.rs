//! Adapter implementations of the credential ports.
//!
//! # Available Adapters
//!
//! - [`memory`]: in-memory repository for tests and embedding
//! - [`postgres`]: Diesel-backed `PostgreSQL` repository

pub mod memory;
pub mod postgres;
