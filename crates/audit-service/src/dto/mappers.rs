//! Conversions between DTOs and domain types

use audit_core::{AuditRecord, NormalizedAuditInput};

use super::requests::{CreateAuditLogRequest, RequestMetadata};
use super::responses::AuditLogResponse;

// ============================================================================
// Ingestion
// ============================================================================

impl CreateAuditLogRequest {
    /// Normalize a direct request; non-empty metadata wins over the body
    pub fn into_input(self, metadata: RequestMetadata) -> NormalizedAuditInput {
        NormalizedAuditInput {
            merchant_id: prefer(metadata.merchant_id, self.merchant_id),
            user_id: prefer(metadata.user_id, self.user_id),
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            details: self.details.unwrap_or_default(),
            ip_address: prefer(metadata.ip_address, self.ip_address),
            user_agent: prefer(metadata.user_agent, self.user_agent),
            store_id: self.store_id,
            session_id: self.session_id,
            old_value: self.old_value.unwrap_or_default(),
            new_value: self.new_value.unwrap_or_default(),
            result: self.result,
            error_message: self.error_message,
            severity: self.severity,
            source_service: self.source_service,
            correlation_id: self.correlation_id,
            duration_ms: self.duration_ms,
        }
    }
}

fn prefer(metadata: Option<String>, body: String) -> String {
    metadata.filter(|v| !v.is_empty()).unwrap_or(body)
}

// ============================================================================
// Audit Log Mappers
// ============================================================================

impl From<AuditRecord> for AuditLogResponse {
    fn from(record: AuditRecord) -> Self {
        Self {
            id: record.id.into_inner(),
            merchant_id: record.merchant_id,
            user_id: record.user_id,
            action: record.action,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            details: record.details,
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            timestamp: record.timestamp,
            store_id: record.store_id,
            session_id: record.session_id,
            old_value: record.old_value,
            new_value: record.new_value,
            result: record.result,
            error_message: record.error_message,
            severity: record.severity,
            source_service: record.source_service,
            correlation_id: record.correlation_id,
            duration_ms: record.duration_ms,
        }
    }
}
