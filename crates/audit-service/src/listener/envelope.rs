//! Wire format of stream events

use audit_core::{Details, DomainError, NormalizedAuditInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::nullable;

/// Event envelope as published by producing services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditEnvelope {
    #[serde(deserialize_with = "nullable::string")]
    pub event_id: String,
    #[serde(deserialize_with = "nullable::string")]
    pub event_type: String,
    /// Producing service; authoritative over anything in the payload
    #[serde(deserialize_with = "nullable::string")]
    pub source_service: String,
    pub payload: Option<AuditPayload>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Audit data carried inside an envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditPayload {
    #[serde(deserialize_with = "nullable::string")]
    pub merchant_id: String,
    #[serde(deserialize_with = "nullable::string")]
    pub user_id: String,
    #[serde(deserialize_with = "nullable::string")]
    pub action: String,
    #[serde(deserialize_with = "nullable::string")]
    pub entity_type: String,
    #[serde(deserialize_with = "nullable::string")]
    pub entity_id: String,
    pub details: Option<Details>,
    #[serde(deserialize_with = "nullable::string")]
    pub ip_address: String,
    #[serde(deserialize_with = "nullable::string")]
    pub user_agent: String,
    #[serde(deserialize_with = "nullable::string")]
    pub store_id: String,
    #[serde(deserialize_with = "nullable::string")]
    pub session_id: String,
    pub old_value: Option<Details>,
    pub new_value: Option<Details>,
    #[serde(deserialize_with = "nullable::string")]
    pub result: String,
    #[serde(deserialize_with = "nullable::string")]
    pub error_message: String,
    #[serde(deserialize_with = "nullable::string")]
    pub severity: String,
    #[serde(deserialize_with = "nullable::string")]
    pub correlation_id: String,
    pub duration_ms: Option<i64>,
}

impl AuditEnvelope {
    /// Decode an envelope from raw message bytes
    ///
    /// # Errors
    /// Returns `DomainError::MalformedEvent` if the bytes are not a JSON
    /// object of the expected shape.
    pub fn decode(bytes: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::MalformedEvent(e.to_string()))
    }

    /// Action named in the payload, if any
    pub fn action(&self) -> &str {
        self.payload.as_ref().map_or("", |p| p.action.as_str())
    }

    /// Normalize into ingestion input, taking `source_service` from the envelope
    pub fn into_input(self) -> NormalizedAuditInput {
        let payload = self.payload.unwrap_or_default();
        NormalizedAuditInput {
            merchant_id: payload.merchant_id,
            user_id: payload.user_id,
            action: payload.action,
            entity_type: payload.entity_type,
            entity_id: payload.entity_id,
            details: payload.details.unwrap_or_default(),
            ip_address: payload.ip_address,
            user_agent: payload.user_agent,
            store_id: payload.store_id,
            session_id: payload.session_id,
            old_value: payload.old_value.unwrap_or_default(),
            new_value: payload.new_value.unwrap_or_default(),
            result: payload.result,
            error_message: payload.error_message,
            severity: payload.severity,
            source_service: self.source_service,
            correlation_id: payload.correlation_id,
            duration_ms: payload.duration_ms,
        }
    }
}
