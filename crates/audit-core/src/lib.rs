//! # audit-core
//!
//! Domain layer containing the audit record model, query filters, and the ports
//! (store and stream source traits) the infrastructure crates implement.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod query;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{AuditRecord, AuditResult, Details, NormalizedAuditInput, ParseEnumError, Severity};
pub use error::DomainError;
pub use query::{
    build_filter, newest_first, FieldMatch, FilterCriteria, FilterField, PageRequest, RecordFilter,
    StoreQuery, TimeRange, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use traits::{AuditStore, StoreResult, StreamMessage, StreamSource};
pub use value_objects::{Clock, IdGenerator, RecordId, SystemClock, UuidGenerator};
