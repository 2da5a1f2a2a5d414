//! Audit log handlers
//!
//! Endpoints for recording and searching audit records.

use audit_service::{AuditService, CreateAuditLogRequest, ListAuditLogsQuery, ListAuditLogsResponse};
use axum::{extract::State, Json};

use crate::extractors::{JsonBody, RequestMeta, ValidatedQuery};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Record an audit entry
///
/// POST /api/v1/audit-logs
pub async fn create_audit_log(
    State(state): State<AppState>,
    RequestMeta(metadata): RequestMeta,
    JsonBody(request): JsonBody<CreateAuditLogRequest>,
) -> ApiResult<NoContent> {
    let service = AuditService::new(state.service_context());
    service.create_audit_log(request.into_input(metadata)).await?;
    Ok(NoContent)
}

/// Search audit entries, newest first
///
/// GET /api/v1/audit-logs
///
/// The `x-merchant-id` header, when present, replaces any `merchant_id`
/// query parameter.
pub async fn list_audit_logs(
    State(state): State<AppState>,
    RequestMeta(metadata): RequestMeta,
    ValidatedQuery(mut query): ValidatedQuery<ListAuditLogsQuery>,
) -> ApiResult<Json<ListAuditLogsResponse>> {
    if let Some(merchant_id) = metadata.merchant_id {
        query.merchant_id = Some(merchant_id);
    }

    let criteria = query.into_criteria()?;
    let service = AuditService::new(state.service_context());
    let response = service.list_audit_logs(criteria).await?;
    Ok(Json(response))
}
