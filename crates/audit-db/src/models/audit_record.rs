//! Audit record database model

use audit_core::Details;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

/// Database model for the audit_logs table
#[derive(Debug, Clone, FromRow)]
pub struct AuditRecordModel {
    pub id: String,
    pub merchant_id: String,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Json<Details>,
    pub ip_address: String,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
    /// Empty when absent
    pub store_id: String,
    pub session_id: String,
    pub old_value: Option<Json<Details>>,
    pub new_value: Option<Json<Details>>,
    /// Lowercase enum text
    pub result: String,
    pub error_message: String,
    pub severity: String,
    pub source_service: String,
    pub correlation_id: String,
    pub duration_ms: Option<i64>,
}

/// Column list shared by every SELECT on audit_logs
pub(crate) const AUDIT_RECORD_COLUMNS: &str = r#"id, merchant_id, user_id, action, entity_type, entity_id, details,
    ip_address, user_agent, "timestamp", store_id, session_id, old_value, new_value,
    result, error_message, severity, source_service, correlation_id, duration_ms"#;
