//! Audit record entity <-> model mapper

use audit_core::{AuditRecord, AuditResult, Details, RecordId, Severity};
use sqlx::types::Json;

use crate::models::AuditRecordModel;

/// Convert AuditRecordModel to AuditRecord entity
impl From<AuditRecordModel> for AuditRecord {
    fn from(model: AuditRecordModel) -> Self {
        AuditRecord {
            id: RecordId::new(model.id),
            merchant_id: model.merchant_id,
            user_id: model.user_id,
            action: model.action,
            entity_type: model.entity_type,
            entity_id: model.entity_id,
            details: model.details.0,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            timestamp: model.timestamp,
            store_id: non_empty(model.store_id),
            session_id: non_empty(model.session_id),
            old_value: model.old_value.map(|Json(v)| v).filter(|v| !v.is_empty()),
            new_value: model.new_value.map(|Json(v)| v).filter(|v| !v.is_empty()),
            result: AuditResult::from_raw(&model.result),
            error_message: non_empty(model.error_message),
            severity: Severity::from_raw(&model.severity),
            source_service: model.source_service,
            correlation_id: non_empty(model.correlation_id),
            duration_ms: model.duration_ms,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Borrowed column values for inserting an AuditRecord
pub struct AuditRecordInsert<'a> {
    pub id: &'a str,
    pub merchant_id: &'a str,
    pub user_id: &'a str,
    pub action: &'a str,
    pub entity_type: &'a str,
    pub entity_id: &'a str,
    pub details: Json<&'a Details>,
    pub ip_address: &'a str,
    pub user_agent: &'a str,
    pub store_id: &'a str,
    pub session_id: &'a str,
    pub old_value: Option<Json<&'a Details>>,
    pub new_value: Option<Json<&'a Details>>,
    pub result: &'static str,
    pub error_message: &'a str,
    pub severity: &'static str,
    pub source_service: &'a str,
    pub correlation_id: &'a str,
}

impl<'a> AuditRecordInsert<'a> {
    pub fn new(record: &'a AuditRecord) -> Self {
        Self {
            id: record.id.as_str(),
            merchant_id: &record.merchant_id,
            user_id: &record.user_id,
            action: &record.action,
            entity_type: &record.entity_type,
            entity_id: &record.entity_id,
            details: Json(&record.details),
            ip_address: &record.ip_address,
            user_agent: &record.user_agent,
            store_id: record.store_id.as_deref().unwrap_or_default(),
            session_id: record.session_id.as_deref().unwrap_or_default(),
            old_value: record.old_value.as_ref().map(Json),
            new_value: record.new_value.as_ref().map(Json),
            result: record.result.as_str(),
            error_message: record.error_message.as_deref().unwrap_or_default(),
            severity: record.severity.as_str(),
            source_service: &record.source_service,
            correlation_id: record.correlation_id.as_deref().unwrap_or_default(),
        }
    }
}
