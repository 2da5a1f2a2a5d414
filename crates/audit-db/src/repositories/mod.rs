//! Store implementations
//!
//! Implementations of the [`AuditStore`](audit_core::AuditStore) port.
//! Both give identical filter, ordering and pagination semantics.

mod audit_log;
mod error;
mod memory;

pub use audit_log::PgAuditStore;
pub use memory::MemoryAuditStore;
