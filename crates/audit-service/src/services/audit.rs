//! Audit log service
//!
//! Single entry point for ingestion (HTTP and stream alike) and for
//! filtered queries.

use audit_core::{build_filter, AuditRecord, FilterCriteria, NormalizedAuditInput, RecordId};
use tracing::{error, info, instrument};

use crate::dto::{AuditLogResponse, ListAuditLogsResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Audit log service
pub struct AuditService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuditService<'a> {
    /// Create a new AuditService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Persist one audit record
    ///
    /// Assigns a fresh id and the ingestion timestamp. Nothing in the input
    /// is validated.
    #[instrument(skip(self, input), fields(action = %input.action, source = %input.source_service))]
    pub async fn create_audit_log(&self, input: NormalizedAuditInput) -> ServiceResult<RecordId> {
        let record = AuditRecord::create(input, self.ctx.id_generator(), self.ctx.clock());

        if let Err(e) = self.ctx.store().insert(&record).await {
            error!(error = %e, record_id = %record.id, "Failed to store audit record");
            return Err(e.into());
        }

        info!(
            record_id = %record.id,
            merchant_id = %record.merchant_id,
            action = %record.action,
            entity_type = %record.entity_type,
            "Audit log created"
        );

        Ok(record.id)
    }

    /// Search audit records, newest first
    #[instrument(skip(self, criteria))]
    pub async fn list_audit_logs(
        &self,
        criteria: FilterCriteria,
    ) -> ServiceResult<ListAuditLogsResponse> {
        let query = build_filter(&criteria)?;
        let (records, total) = self.ctx.store().find_filtered(&query).await?;

        Ok(ListAuditLogsResponse {
            logs: records.into_iter().map(AuditLogResponse::from).collect(),
            total,
            page: query.page.page,
            page_size: query.page.page_size,
        })
    }

    /// Check that the store answers
    pub async fn store_healthy(&self) -> bool {
        self.ctx.store().health_check().await.is_ok()
    }
}
