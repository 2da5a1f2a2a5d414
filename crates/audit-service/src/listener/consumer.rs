//! Consumer loop over a [`StreamSource`]
//!
//! Every message is acknowledged once handled, whether it was stored or
//! dropped. A message that fails to decode or to store is logged and never
//! retried.

use std::sync::Arc;
use std::time::Duration;

use audit_core::{DomainError, RecordId, StreamMessage, StreamSource};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::services::{AuditService, ServiceContext, ServiceError, ServiceResult};

use super::envelope::AuditEnvelope;

/// Pause after a failed read before trying again
pub const DEFAULT_READ_BACKOFF: Duration = Duration::from_secs(1);

/// Long-running stream consumer
pub struct AuditListener {
    source: Arc<dyn StreamSource>,
    ctx: ServiceContext,
    backoff: Duration,
}

impl AuditListener {
    pub fn new(source: Arc<dyn StreamSource>, ctx: ServiceContext) -> Self {
        Self {
            source,
            ctx,
            backoff: DEFAULT_READ_BACKOFF,
        }
    }

    /// Override the read-failure backoff
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Run until `cancel` fires
    ///
    /// Cancellation is observed while waiting for a message and while
    /// backing off. A message already read is processed and acknowledged
    /// before the loop checks again.
    pub async fn run(self, cancel: CancellationToken) {
        info!(backoff_ms = self.backoff.as_millis() as u64, "Starting audit stream listener");

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                next = self.source.next_message() => next,
            };

            match next {
                Ok(Some(message)) => self.handle(message).await,
                Ok(None) => {}
                Err(e) => {
                    error!(error = %e, "Failed to read stream message");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.backoff) => {}
                    }
                }
            }
        }

        info!("Stopping audit stream listener");
    }

    /// Decode and store one message payload
    ///
    /// # Errors
    /// Returns `DomainError::MalformedEvent` for undecodable bytes, or the
    /// store error if persisting fails.
    pub async fn process_message(&self, payload: &[u8]) -> ServiceResult<RecordId> {
        let envelope = AuditEnvelope::decode(payload)?;
        let event_id = envelope.event_id.clone();

        info!(
            event_id = %event_id,
            action = %envelope.action(),
            source = %envelope.source_service,
            "Processing audit event"
        );

        let id = AuditService::new(&self.ctx)
            .create_audit_log(envelope.into_input())
            .await?;

        info!(event_id = %event_id, record_id = %id, "Audit log created from stream event");
        Ok(id)
    }

    #[instrument(skip(self, message), fields(message_id = %message.id))]
    async fn handle(&self, message: StreamMessage) {
        match self.process_message(&message.payload).await {
            Ok(_) => {}
            Err(e @ ServiceError::Domain(DomainError::MalformedEvent(_))) => {
                warn!(
                    error = %e,
                    raw = %String::from_utf8_lossy(&message.payload),
                    "Dropping malformed audit event"
                );
            }
            Err(e) => {
                error!(error = %e, "Failed to create audit log from event");
            }
        }

        if let Err(e) = self.source.ack(&message).await {
            warn!(error = %e, "Failed to acknowledge stream message");
        }
    }
}
