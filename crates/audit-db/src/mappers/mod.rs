//! Entity to model mappers
//!
//! - `From<AuditRecordModel> for AuditRecord`: Convert database rows to domain objects
//! - `AuditRecordInsert`: Prepare entity data for insertion

mod audit_record;

pub use audit_record::AuditRecordInsert;
