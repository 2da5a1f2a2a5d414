//! Error handling utilities for stores

use audit_core::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Report a primary key collision on insert
///
/// Identifiers are generated, never supplied by callers, so a collision
/// points at a broken id generator rather than a bad request.
pub fn map_insert_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::InternalError(format!("duplicate audit record id: {db_err}"));
        }
    }
    map_db_error(e)
}
