//! # audit-db
//!
//! Store gateway implementations for the [`AuditStore`](audit_core::AuditStore) port.
//!
//! ## Overview
//!
//! - Connection pool management and idempotent schema setup
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - `PgAuditStore` (PostgreSQL, JSONB context columns)
//! - `MemoryAuditStore` (process-local, used for tests and local runs)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use audit_common::DatabaseConfig;
//! use audit_db::{create_pool, PgAuditStore, PgPoolConfig};
//!
//! async fn example(db: &DatabaseConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PgPoolConfig::from(db)).await?;
//!     let store = PgAuditStore::new(pool);
//!     store.ensure_schema().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, PgPool, PgPoolConfig};
pub use repositories::{MemoryAuditStore, PgAuditStore};
