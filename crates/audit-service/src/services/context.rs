//! Service context - dependency container for services
//!
//! Holds the store gateway plus the id and time sources used at ingestion.
//! Built once at startup and shared by the HTTP handlers and the stream listener.

use std::sync::Arc;

use audit_core::{AuditStore, Clock, IdGenerator, SystemClock, UuidGenerator};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn AuditStore>,
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        store: Arc<dyn AuditStore>,
        id_generator: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            id_generator,
            clock,
        }
    }

    /// Get the audit store
    pub fn store(&self) -> &dyn AuditStore {
        self.store.as_ref()
    }

    /// Get the record id generator
    pub fn id_generator(&self) -> &dyn IdGenerator {
        self.id_generator.as_ref()
    }

    /// Get the ingestion clock
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("store", &"AuditStore")
            .field("id_generator", &"IdGenerator")
            .field("clock", &"Clock")
            .finish()
    }
}

/// Builder for creating ServiceContext
///
/// The store is required. Ids default to UUID v4 and time to [`SystemClock`].
#[derive(Default)]
pub struct ServiceContextBuilder {
    store: Option<Arc<dyn AuditStore>>,
    id_generator: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(mut self, store: Arc<dyn AuditStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn id_generator(mut self, id_generator: Arc<dyn IdGenerator>) -> Self {
        self.id_generator = Some(id_generator);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if the store is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.store
                .ok_or_else(|| super::error::ServiceError::validation("store is required"))?,
            self.id_generator.unwrap_or_else(|| Arc::new(UuidGenerator)),
            self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
        ))
    }
}
