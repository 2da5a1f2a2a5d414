//! PostgreSQL implementation of AuditStore

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, instrument};

use audit_core::{AuditRecord, AuditStore, RecordFilter, StoreQuery, StoreResult};

use crate::mappers::AuditRecordInsert;
use crate::models::{AuditRecordModel, AUDIT_RECORD_COLUMNS};
use crate::pool::ensure_schema;

use super::error::{map_db_error, map_insert_error};

/// PostgreSQL implementation of AuditStore
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    /// Create a new PgAuditStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the audit_logs table and indexes if they do not exist
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        ensure_schema(&self.pool).await.map_err(map_db_error)
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Append `WHERE ...` for a filter; every value is a bind parameter
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &RecordFilter) {
    builder.push(" WHERE TRUE");

    for condition in &filter.conditions {
        builder
            .push(" AND ")
            .push(condition.field.column())
            .push(" = ")
            .push_bind(condition.value.clone());
    }

    if let Some(start) = filter.time_range.start {
        builder.push(r#" AND "timestamp" >= "#).push_bind(start);
    }
    if let Some(end) = filter.time_range.end {
        builder.push(r#" AND "timestamp" <= "#).push_bind(end);
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    #[instrument(skip(self, record), fields(id = %record.id, action = %record.action))]
    async fn insert(&self, record: &AuditRecord) -> StoreResult<()> {
        let row = AuditRecordInsert::new(record);

        sqlx::query(
            r#"
            INSERT INTO audit_logs (
                id, merchant_id, user_id, action, entity_type, entity_id, details,
                ip_address, user_agent, "timestamp", store_id, session_id, old_value, new_value,
                result, error_message, severity, source_service, correlation_id, duration_ms
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(row.id)
        .bind(row.merchant_id)
        .bind(row.user_id)
        .bind(row.action)
        .bind(row.entity_type)
        .bind(row.entity_id)
        .bind(row.details)
        .bind(row.ip_address)
        .bind(row.user_agent)
        .bind(record.timestamp)
        .bind(row.store_id)
        .bind(row.session_id)
        .bind(row.old_value)
        .bind(row.new_value)
        .bind(row.result)
        .bind(row.error_message)
        .bind(row.severity)
        .bind(row.source_service)
        .bind(row.correlation_id)
        .bind(record.duration_ms)
        .execute(&self.pool)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_filtered(&self, query: &StoreQuery) -> StoreResult<(Vec<AuditRecord>, i64)> {
        let mut select = QueryBuilder::<Postgres>::new("SELECT ");
        select.push(AUDIT_RECORD_COLUMNS).push(" FROM audit_logs");
        push_filter(&mut select, &query.filter);
        select
            .push(r#" ORDER BY "timestamp" DESC, id DESC LIMIT "#)
            .push_bind(query.page.limit())
            .push(" OFFSET ")
            .push_bind(query.page.skip());

        let rows = select
            .build_query_as::<AuditRecordModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        // Separate statement; may drift from the page under concurrent inserts
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_logs");
        push_filter(&mut count, query.count_filter());

        let total: i64 = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        debug!(returned = rows.len(), total, "Audit records fetched");

        Ok((rows.into_iter().map(AuditRecord::from).collect(), total))
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("PostgreSQL pool closed");
    }
}
