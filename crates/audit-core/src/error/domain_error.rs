//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Invalid {kind} value: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    // =========================================================================
    // Input Errors
    // =========================================================================
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Validation
            Self::InvalidPagination(_) => "INVALID_PAGINATION",
            Self::InvalidEnumValue { .. } => "INVALID_ENUM_VALUE",

            // Input
            Self::MalformedEvent(_) => "MALFORMED_EVENT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::StreamError(_) => "STREAM_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPagination(_) | Self::InvalidEnumValue { .. })
    }
}
