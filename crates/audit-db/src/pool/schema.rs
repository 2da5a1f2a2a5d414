//! Table and index definitions for the audit trail
//!
//! Every statement is idempotent, so the schema can be applied on each startup.

use sqlx::PgPool;
use tracing::info;

/// DDL for the `audit_logs` table and its query indexes
///
/// Optional text columns hold `''` rather than NULL so that exact-match
/// filters behave the same as in the in-memory store.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS audit_logs (
    id              TEXT PRIMARY KEY,
    merchant_id     TEXT NOT NULL DEFAULT '',
    user_id         TEXT NOT NULL DEFAULT '',
    action          TEXT NOT NULL DEFAULT '',
    entity_type     TEXT NOT NULL DEFAULT '',
    entity_id       TEXT NOT NULL DEFAULT '',
    details         JSONB NOT NULL DEFAULT '{}'::jsonb,
    ip_address      TEXT NOT NULL DEFAULT '',
    user_agent      TEXT NOT NULL DEFAULT '',
    "timestamp"     TIMESTAMPTZ NOT NULL,
    store_id        TEXT NOT NULL DEFAULT '',
    session_id      TEXT NOT NULL DEFAULT '',
    old_value       JSONB,
    new_value       JSONB,
    result          TEXT NOT NULL DEFAULT 'success',
    error_message   TEXT NOT NULL DEFAULT '',
    severity        TEXT NOT NULL DEFAULT 'info',
    source_service  TEXT NOT NULL DEFAULT '',
    correlation_id  TEXT NOT NULL DEFAULT '',
    duration_ms     BIGINT
);

CREATE INDEX IF NOT EXISTS idx_audit_logs_timestamp
    ON audit_logs ("timestamp" DESC, id DESC);
CREATE INDEX IF NOT EXISTS idx_audit_logs_merchant_timestamp
    ON audit_logs (merchant_id, "timestamp" DESC);
CREATE INDEX IF NOT EXISTS idx_audit_logs_entity
    ON audit_logs (entity_type, entity_id);
CREATE INDEX IF NOT EXISTS idx_audit_logs_correlation
    ON audit_logs (correlation_id);
"#;

/// Apply [`SCHEMA`] to the database
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("audit_logs schema ensured");
    Ok(())
}
