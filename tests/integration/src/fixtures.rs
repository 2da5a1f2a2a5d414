//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Audit log collection path
pub const AUDIT_LOGS: &str = "/api/v1/audit-logs";

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Merchant id no other test (or earlier run) writes to
pub fn unique_merchant() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("merchant-{nanos}-{}", unique_suffix())
}

/// Minimal create request body
pub fn create_body(merchant_id: &str, action: &str) -> Value {
    json!({
        "merchant_id": merchant_id,
        "action": action,
        "entity_type": "order",
        "entity_id": format!("order-{}", unique_suffix()),
    })
}

/// Stream envelope as producing services publish it
pub fn envelope(source_service: &str, payload: Value) -> Value {
    json!({
        "event_id": format!("evt-{}", unique_suffix()),
        "event_type": "audit",
        "source_service": source_service,
        "timestamp": Utc::now(),
        "payload": payload,
    })
}

/// Stored audit log as returned by the API
#[derive(Debug, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub merchant_id: String,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: serde_json::Map<String, Value>,
    pub ip_address: String,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
    pub result: String,
    pub severity: String,
    pub source_service: String,
    pub correlation_id: Option<String>,
    pub duration_ms: Option<i64>,
}

/// One page of results
#[derive(Debug, Deserialize)]
pub struct AuditLogPage {
    pub logs: Vec<AuditLog>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
