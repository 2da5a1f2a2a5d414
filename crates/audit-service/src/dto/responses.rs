//! Response DTOs for API endpoints

use audit_core::{AuditResult, Details, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;

// ============================================================================
// Audit Log Responses
// ============================================================================

/// A stored audit record
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogResponse {
    pub id: String,
    pub merchant_id: String,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Details,
    pub ip_address: String,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Details>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Details>,
    pub result: AuditResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub severity: Severity,
    pub source_service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

/// One page of search results
#[derive(Debug, Clone, Serialize)]
pub struct ListAuditLogsResponse {
    pub logs: Vec<AuditLogResponse>,
    /// Matching records across all pages
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health check status for each dependency
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    pub store: String,
    pub stream: String,
}

impl ReadinessResponse {
    /// `stream_healthy` is `None` when no stream consumer is configured
    pub fn ready(store_healthy: bool, stream_healthy: Option<bool>) -> Self {
        let all_healthy = store_healthy && stream_healthy.unwrap_or(true);
        Self {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                store: status_label(store_healthy).to_string(),
                stream: stream_healthy.map_or("disabled", status_label).to_string(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

fn status_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}
