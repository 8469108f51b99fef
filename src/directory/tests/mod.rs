//! Unit tests for the directory module.
//!
//! Tests are organised by layer, covering domain validation, service
//! orchestration, and the card import mapping.
