//! Store gateway trait (port)
//!
//! The domain layer defines what it needs from persistence, and the
//! infrastructure layer provides the implementation. Implementations must
//! be safe for concurrent inserts and finds without external locking.

use async_trait::async_trait;

use crate::entities::AuditRecord;
use crate::error::DomainError;
use crate::query::StoreQuery;

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist one record as a single atomic write
    async fn insert(&self, record: &AuditRecord) -> StoreResult<()>;

    /// Fetch one page of matching records, newest first, plus the total match count
    ///
    /// The page and the count come from two separate reads. Under concurrent
    /// inserts the count may be slightly ahead of or behind the page.
    async fn find_filtered(&self, query: &StoreQuery) -> StoreResult<(Vec<AuditRecord>, i64)>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> StoreResult<()>;

    /// Release connections; called once at shutdown
    async fn close(&self) {}
}
