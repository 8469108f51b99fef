//! Agent directory: registration, discovery, verification, and health.
//!
//! This module implements the directory bounded context: third parties
//! register agent records, clients discover them through structured filters
//! and free-text search, registrants prove domain ownership via DNS TXT
//! challenges, and a health monitor probes registered endpoints. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
