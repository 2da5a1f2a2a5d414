//! Application state
//!
//! Shared by every handler: the service context, the loaded configuration,
//! and the stream consumer when one is running.

use std::sync::Arc;

use audit_common::AppConfig;
use audit_service::ServiceContext;
use audit_stream::RedisStreamSource;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// Stream consumer, checked by the readiness check
    stream: Option<Arc<RedisStreamSource>>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            stream: None,
        }
    }

    /// Attach the running stream consumer
    pub fn with_stream(mut self, stream: Arc<RedisStreamSource>) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the stream consumer, if the listener is enabled
    pub fn stream(&self) -> Option<&Arc<RedisStreamSource>> {
        self.stream.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("config", &"AppConfig")
            .field("stream", &self.stream.is_some())
            .finish()
    }
}
