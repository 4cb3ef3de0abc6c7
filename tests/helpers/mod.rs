//! Shared fixtures and search helpers for integration tests.

pub mod fixtures;
pub mod search_helpers;
