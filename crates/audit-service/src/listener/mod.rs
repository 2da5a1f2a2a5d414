//! Stream listener
//!
//! Consumes audit envelopes published by other services and feeds them
//! through the same ingestion path as direct requests.

mod consumer;
mod envelope;

pub use consumer::{AuditListener, DEFAULT_READ_BACKOFF};
pub use envelope::{AuditEnvelope, AuditPayload};
