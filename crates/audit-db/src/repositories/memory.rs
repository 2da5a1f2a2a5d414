//! In-memory implementation of AuditStore
//!
//! Holds every record in a process-local vector. Contents are lost when the
//! process exits. Used for tests and for running without PostgreSQL.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::instrument;

use audit_core::{newest_first, AuditRecord, AuditStore, StoreQuery, StoreResult};

/// In-memory implementation of AuditStore
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Copy of every stored record, in insertion order
    pub fn snapshot(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    #[instrument(skip(self, record), fields(id = %record.id))]
    async fn insert(&self, record: &AuditRecord) -> StoreResult<()> {
        self.records.write().push(record.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_filtered(&self, query: &StoreQuery) -> StoreResult<(Vec<AuditRecord>, i64)> {
        let mut matching: Vec<AuditRecord> = self
            .records
            .read()
            .iter()
            .filter(|record| query.filter.matches(record))
            .cloned()
            .collect();

        let total = i64::try_from(matching.len()).unwrap_or(i64::MAX);
        matching.sort_by(newest_first);

        let skip = usize::try_from(query.page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(0);
        let page = matching.into_iter().skip(skip).take(limit).collect();

        Ok((page, total))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
