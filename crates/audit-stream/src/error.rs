//! Stream transport errors

use audit_core::DomainError;

use crate::pool::RedisPoolError;

/// Error type for stream operations
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error(transparent)]
    Pool(#[from] RedisPoolError),

    #[error("Failed to encode event: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stream source closed")]
    Closed,
}

/// Result type for stream operations
pub type StreamResult<T> = Result<T, StreamError>;

impl From<StreamError> for DomainError {
    fn from(err: StreamError) -> Self {
        DomainError::StreamError(err.to_string())
    }
}
