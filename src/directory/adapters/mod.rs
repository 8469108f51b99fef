//! Infrastructure adapters for the directory context.
//!
//! This module provides concrete implementations of the directory ports,
//! following hexagonal architecture principles. Adapters handle all
//! infrastructure concerns while the domain remains pure.
//!
//! # Available Adapters
//!
//! - [`memory`]: thread-safe in-memory implementations for unit testing
//! - [`postgres`]: production-grade `PostgreSQL` persistence and full-text
//!   search using Diesel ORM
//! - [`dns::HickoryTxtResolver`]: TXT record lookups for domain verification
//! - [`http::HttpEndpointProber`]: HTTP health probes against agent endpoints

pub mod dns;
pub mod http;
pub mod memory;
pub mod postgres;
