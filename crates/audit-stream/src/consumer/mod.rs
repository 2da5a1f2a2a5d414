//! Redis Streams consumer-group reader.

mod config;
mod redis_source;

pub use config::StreamConsumerConfig;
pub use redis_source::{RedisStreamSource, PAYLOAD_FIELD};
