//! Unit tests for the credential module.
