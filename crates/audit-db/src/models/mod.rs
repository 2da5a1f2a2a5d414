//! Database models - SQLx-compatible structs for PostgreSQL tables

mod audit_record;

pub use audit_record::AuditRecordModel;

pub(crate) use audit_record::AUDIT_RECORD_COLUMNS;
