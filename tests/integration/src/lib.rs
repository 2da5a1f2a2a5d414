//! Integration test utilities for the audit service
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API and the stream listener.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
