//! # audit-stream
//!
//! Redis Streams transport for audit events.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Consumer**: Consumer-group reader implementing the `StreamSource` port
//! - **Publisher**: Appends audit envelopes to the stream
//!
//! ## Example
//!
//! ```ignore
//! use audit_stream::{RedisPool, RedisPoolConfig, RedisStreamSource, StreamConsumerConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let source = RedisStreamSource::connect(pool, StreamConsumerConfig::default()).await?;
//!
//! while let Some(message) = source.next_message().await? {
//!     // handle message.payload ...
//!     source.ack(&message).await?;
//! }
//! ```

pub mod consumer;
pub mod error;
pub mod pool;
pub mod publisher;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

pub use consumer::{RedisStreamSource, StreamConsumerConfig, PAYLOAD_FIELD};
pub use error::{StreamError, StreamResult};
pub use publisher::StreamPublisher;
