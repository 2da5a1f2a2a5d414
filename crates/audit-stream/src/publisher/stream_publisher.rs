//! Appends audit envelopes to the stream with `XADD`.

use redis::AsyncCommands;
use serde::Serialize;

use crate::consumer::PAYLOAD_FIELD;
use crate::error::StreamResult;
use crate::pool::RedisPool;

/// Redis Streams publisher
#[derive(Clone, Debug)]
pub struct StreamPublisher {
    pool: RedisPool,
    stream_key: String,
}

impl StreamPublisher {
    /// Create a new publisher for one stream
    #[must_use]
    pub fn new(pool: RedisPool, stream_key: impl Into<String>) -> Self {
        Self {
            pool,
            stream_key: stream_key.into(),
        }
    }

    /// Serialize an event to JSON and append it; returns the entry id
    pub async fn publish<T: Serialize>(&self, event: &T) -> StreamResult<String> {
        let payload = serde_json::to_vec(event)?;
        self.publish_raw(&payload).await
    }

    /// Append raw bytes as the payload field
    pub async fn publish_raw(&self, payload: &[u8]) -> StreamResult<String> {
        let mut conn = self.pool.get().await?;
        let id: String = conn
            .xadd(&self.stream_key, "*", &[(PAYLOAD_FIELD, payload)])
            .await?;

        tracing::debug!(
            stream = %self.stream_key,
            id = %id,
            bytes = payload.len(),
            "Published audit event"
        );

        Ok(id)
    }

    /// Stream key this publisher appends to
    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }
}
