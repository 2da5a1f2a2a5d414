//! Request DTOs for API endpoints
//!
//! Audit ingestion is permissive: every field of a create request is
//! optional and empty values are stored as-is.

use audit_core::{AuditResult, Details, DomainError, FilterCriteria, Severity};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use super::nullable;

// ============================================================================
// Audit Log Requests
// ============================================================================

/// Direct ingestion request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateAuditLogRequest {
    #[serde(deserialize_with = "nullable::string")]
    pub merchant_id: String,
    #[serde(deserialize_with = "nullable::string")]
    pub user_id: String,
    #[serde(deserialize_with = "nullable::string")]
    pub action: String,
    #[serde(alias = "entity", deserialize_with = "nullable::string")]
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
    pub source_service: String,
    #[serde(deserialize_with = "nullable::string")]
    pub correlation_id: String,
    pub duration_ms: Option<i64>,
}

/// Caller context taken from the transport rather than the body
///
/// Non-empty values replace the matching body fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    pub merchant_id: Option<String>,
    pub user_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Audit log search parameters
///
/// Enumerated filters arrive as text; unknown values are rejected rather
/// than silently matching nothing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListAuditLogsQuery {
    pub merchant_id: Option<String>,
    pub user_id: Option<String>,
    #[serde(alias = "entity")]
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub action: Option<String>,
    pub store_id: Option<String>,
    pub severity: Option<String>,
    pub result: Option<String>,
    pub source_service: Option<String>,
    pub correlation_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,

    #[validate(range(min = 1, message = "page_size must be positive"))]
    pub page_size: Option<i64>,
}

impl ListAuditLogsQuery {
    /// Convert into filter criteria
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEnumValue` for an unknown severity or result.
    pub fn into_criteria(self) -> Result<FilterCriteria, DomainError> {
        Ok(FilterCriteria {
            severity: parse_enum::<Severity>(self.severity)?,
            result: parse_enum::<AuditResult>(self.result)?,
            merchant_id: self.merchant_id,
            user_id: self.user_id,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            action: self.action,
            store_id: self.store_id,
            source_service: self.source_service,
            correlation_id: self.correlation_id,
            start_date: self.start_date,
            end_date: self.end_date,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

fn parse_enum<T>(raw: Option<String>) -> Result<Option<T>, DomainError>
where
    T: std::str::FromStr<Err = audit_core::ParseEnumError>,
{
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .parse()
            .map(Some)
            .map_err(|e: audit_core::ParseEnumError| DomainError::InvalidEnumValue {
                kind: e.kind,
                value: e.value,
            }),
        _ => Ok(None),
    }
}
