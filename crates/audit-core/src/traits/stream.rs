//! Event stream source trait (port)

use async_trait::async_trait;

use super::store::StoreResult;

/// One message delivered by the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamMessage {
    /// Transport-assigned message id (used for acknowledgement)
    pub id: String,
    /// Raw message body, expected to be a JSON envelope
    pub payload: Vec<u8>,
}

impl StreamMessage {
    /// Create a new StreamMessage
    pub fn new(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// Source of audit event messages
///
/// Delivery order is whatever the transport provides; consumers must not
/// reorder or batch.
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Wait for the next message
    ///
    /// Returns `Ok(None)` when the transport's wait interval elapsed with no
    /// message. Errors are transient read failures; the caller decides how
    /// to back off. The future may be dropped at any await point.
    async fn next_message(&self) -> StoreResult<Option<StreamMessage>>;

    /// Mark a message as handled so it is not redelivered to the group
    async fn ack(&self, message: &StreamMessage) -> StoreResult<()>;

    /// Release the underlying connection
    async fn close(&self) -> StoreResult<()>;
}
