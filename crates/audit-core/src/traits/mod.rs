//! Ports - interfaces the infrastructure crates implement

mod store;
mod stream;

pub use store::{AuditStore, StoreResult};
pub use stream::{StreamMessage, StreamSource};
