//! Consumer-group reader implementing the `StreamSource` port.
//!
//! Reads one entry at a time with `XREADGROUP ... COUNT 1 BLOCK <ms>` on a
//! dedicated connection, since a blocking read would stall every other
//! command sharing a multiplexed connection. Acks and group setup go
//! through the pool.
//!
//! Entries handed out by Redis stay in the consumer's pending list until
//! acknowledged. On connect (and on every reconnect) the source claims
//! entries left idle by other consumers, then re-reads its own pending
//! list from id `0` before asking for new entries with `>`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::streams::{StreamId, StreamReadOptions, StreamReadReply};
use redis::{AsyncCommands, Client, ErrorKind, RedisError, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use audit_core::{StoreResult, StreamMessage, StreamSource};

use crate::error::{StreamError, StreamResult};
use crate::pool::RedisPool;

use super::config::StreamConsumerConfig;

/// Entry field holding the JSON envelope
pub const PAYLOAD_FIELD: &str = "payload";

/// Entries claimed per XAUTOCLAIM call
const CLAIM_BATCH: usize = 100;

/// Redis Streams implementation of StreamSource
pub struct RedisStreamSource {
    client: Client,
    pool: RedisPool,
    config: StreamConsumerConfig,
    /// Read connection; dropped after a failed read and re-opened lazily
    read_conn: Mutex<Option<MultiplexedConnection>>,
    /// Last pending entry handed out while replaying the pending list;
    /// `None` once the list is drained
    backlog: Mutex<Option<String>>,
    closed: AtomicBool,
}

impl std::fmt::Debug for RedisStreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStreamSource")
            .field("config", &self.config)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

impl RedisStreamSource {
    /// Create the consumer group (if needed) and open the read connection
    pub async fn connect(pool: RedisPool, config: StreamConsumerConfig) -> StreamResult<Self> {
        let client = Client::open(pool.url())?;
        let source = Self {
            client,
            pool,
            config,
            read_conn: Mutex::new(None),
            backlog: Mutex::new(None),
            closed: AtomicBool::new(false),
        };

        source.ensure_group().await?;
        source.recover_pending().await;
        *source.read_conn.lock().await = Some(source.open_read_connection().await?);

        info!(
            stream = %source.config.stream_key,
            group = %source.config.group,
            consumer = %source.config.consumer,
            "Stream consumer connected"
        );

        Ok(source)
    }

    /// Ping Redis through the pool
    pub async fn health_check(&self) -> StreamResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StreamError::Closed);
        }
        self.pool.health_check().await?;
        Ok(())
    }

    /// `XGROUP CREATE <key> <group> $ MKSTREAM`; an existing group is fine
    async fn ensure_group(&self) -> StreamResult<()> {
        let mut conn = self.pool.get().await?;
        let created: Result<(), RedisError> = conn
            .xgroup_create_mkstream(&self.config.stream_key, &self.config.group, "$")
            .await;

        match created {
            Ok(()) => {
                info!(group = %self.config.group, "Consumer group created");
                Ok(())
            }
            Err(e) if e.code() == Some("BUSYGROUP") => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Take over stale entries, then replay this consumer's pending list
    async fn recover_pending(&self) {
        match self.claim_stale().await {
            Ok(0) => {}
            Ok(claimed) => info!(claimed, "Claimed stale pending entries"),
            Err(e) => warn!(error = %e, "Failed to claim stale pending entries"),
        }
        *self.backlog.lock().await = Some("0".to_string());
    }

    /// `XAUTOCLAIM <key> <group> <consumer> <idle> <cursor> COUNT n JUSTID`
    /// until the cursor wraps around
    async fn claim_stale(&self) -> StreamResult<usize> {
        let mut conn = self.pool.get().await?;
        let mut cursor = "0-0".to_string();
        let mut claimed = 0;

        loop {
            let reply: Vec<Value> = redis::cmd("XAUTOCLAIM")
                .arg(&self.config.stream_key)
                .arg(&self.config.group)
                .arg(&self.config.consumer)
                .arg(self.config.claim_idle_ms)
                .arg(&cursor)
                .arg("COUNT")
                .arg(CLAIM_BATCH)
                .arg("JUSTID")
                .query_async(&mut conn)
                .await?;

            let (next, ids) = parse_autoclaim(&reply)?;
            claimed += ids;
            if next == "0-0" {
                return Ok(claimed);
            }
            cursor = next;
        }
    }

    async fn open_read_connection(&self) -> StreamResult<MultiplexedConnection> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Reuse the read connection, reconnecting if the last read failed
    async fn read_connection(&self) -> StreamResult<MultiplexedConnection> {
        let mut guard = self.read_conn.lock().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        // The server may have restarted and lost the group along with the stream
        self.ensure_group().await?;
        self.recover_pending().await;
        let conn = self.open_read_connection().await?;
        *guard = Some(conn.clone());
        debug!("Stream read connection re-established");
        Ok(conn)
    }

    /// Next entry of this consumer's pending list after `after`
    async fn read_pending(
        &self,
        conn: &mut MultiplexedConnection,
        after: &str,
    ) -> Result<Option<StreamMessage>, RedisError> {
        let options = StreamReadOptions::default()
            .group(&self.config.group, &self.config.consumer)
            .count(1);

        let reply: Option<StreamReadReply> = conn
            .xread_options(&[&self.config.stream_key], &[after], &options)
            .await?;
        Ok(reply.and_then(first_message))
    }

    async fn read_one(&self) -> StreamResult<Option<StreamMessage>> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StreamError::Closed);
        }

        let mut conn = self.read_connection().await?;

        let mut backlog = self.backlog.lock().await;
        if let Some(after) = (*backlog).clone() {
            match self.read_pending(&mut conn, &after).await {
                Ok(Some(message)) => {
                    debug!(id = %message.id, "Replaying pending stream entry");
                    *backlog = Some(message.id.clone());
                    return Ok(Some(message));
                }
                Ok(None) => {
                    debug!("Pending stream entries replayed");
                    *backlog = None;
                }
                Err(e) if e.kind() == ErrorKind::TypeError => {
                    // Unreadable entries stay pending for an operator
                    warn!(error = %e, "Skipping unreadable pending entries");
                    *backlog = None;
                }
                Err(e) => {
                    drop(backlog);
                    self.read_conn.lock().await.take();
                    return Err(e.into());
                }
            }
        }
        drop(backlog);

        let options = StreamReadOptions::default()
            .group(&self.config.group, &self.config.consumer)
            .count(1)
            .block(usize::try_from(self.config.block_ms).unwrap_or(usize::MAX));

        let reply: Result<Option<StreamReadReply>, RedisError> = conn
            .xread_options(&[&self.config.stream_key], &[">"], &options)
            .await;

        match reply {
            Ok(reply) => Ok(reply.and_then(first_message)),
            Err(e) => {
                // Force a reconnect on the next read
                self.read_conn.lock().await.take();
                Err(e.into())
            }
        }
    }
}

/// Next cursor and number of ids from an `XAUTOCLAIM ... JUSTID` reply
///
/// Redis 6.2 replies with two elements, 7.0 adds a third (deleted ids).
fn parse_autoclaim(reply: &[Value]) -> StreamResult<(String, usize)> {
    let cursor = reply.first().ok_or_else(|| {
        RedisError::from((ErrorKind::TypeError, "empty XAUTOCLAIM reply"))
    })?;
    let cursor: String = redis::from_redis_value(cursor)?;
    let ids = match reply.get(1) {
        Some(value) => redis::from_redis_value::<Vec<String>>(value)?.len(),
        None => 0,
    };
    Ok((cursor, ids))
}

/// First entry of a read reply as a StreamMessage
///
/// An entry without a payload field yields an empty payload, which the
/// consumer treats as malformed.
fn first_message(reply: StreamReadReply) -> Option<StreamMessage> {
    reply
        .keys
        .into_iter()
        .flat_map(|key| key.ids)
        .next()
        .map(into_message)
}

fn into_message(entry: StreamId) -> StreamMessage {
    let payload: Vec<u8> = entry.get(PAYLOAD_FIELD).unwrap_or_default();
    StreamMessage::new(entry.id, payload)
}

#[async_trait]
impl StreamSource for RedisStreamSource {
    async fn next_message(&self) -> StoreResult<Option<StreamMessage>> {
        Ok(self.read_one().await?)
    }

    #[instrument(skip(self, message), fields(id = %message.id))]
    async fn ack(&self, message: &StreamMessage) -> StoreResult<()> {
        let acked: i64 = async {
            let mut conn = self.pool.get().await?;
            let acked: i64 = conn
                .xack(&self.config.stream_key, &self.config.group, &[&message.id])
                .await?;
            Ok::<_, StreamError>(acked)
        }
        .await?;

        if acked == 0 {
            warn!("Stream entry was not pending; nothing acknowledged");
        }
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.read_conn.lock().await.take();
        self.pool.close();
        info!(stream = %self.config.stream_key, "Stream consumer closed");
        Ok(())
    }
}
