//! Server setup and initialization
//!
//! Wires the store, the stream listener, and the HTTP server together and
//! tears them down in order on shutdown.

mod shutdown;

use std::sync::Arc;

use audit_common::{AppConfig, AppError, StoreBackend, StreamConfig};
use audit_core::{AuditStore, StreamSource};
use audit_db::{create_pool, MemoryAuditStore, PgAuditStore, PgPoolConfig};
use audit_service::{AuditListener, ServiceContextBuilder};
use audit_stream::{RedisPool, RedisPoolConfig, RedisStreamSource, StreamConsumerConfig};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

pub use shutdown::shutdown_signal;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
///
/// Connects the configured store and, when a stream is configured, the
/// stream consumer. The listener itself is started by [`run`].
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let store = connect_store(&config.store).await?;

    let service_context = ServiceContextBuilder::new()
        .store(store)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let stream = match &config.stream {
        Some(stream_config) => Some(connect_stream(stream_config).await?),
        None => None,
    };

    let state = AppState::new(service_context, config);
    Ok(match stream {
        Some(source) => state.with_stream(source),
        None => state,
    })
}

async fn connect_store(backend: &StoreBackend) -> Result<Arc<dyn AuditStore>, AppError> {
    match backend {
        StoreBackend::Postgres(db) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PgPoolConfig::from(db))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;

            let store = PgAuditStore::new(pool);
            store.ensure_schema().await?;
            info!("PostgreSQL connection established");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory audit store; records are lost on restart");
            Ok(Arc::new(MemoryAuditStore::new()))
        }
    }
}

async fn connect_stream(config: &StreamConfig) -> Result<Arc<RedisStreamSource>, AppError> {
    info!(stream = %config.stream_key, "Connecting to Redis stream...");
    let pool = RedisPool::new(RedisPoolConfig::from(config))
        .map_err(|e| AppError::Stream(e.to_string()))?;

    let source = RedisStreamSource::connect(pool, StreamConsumerConfig::from(config))
        .await
        .map_err(|e| AppError::Stream(e.to_string()))?;

    Ok(Arc::new(source))
}

/// Start the stream listener if a stream consumer is attached
pub fn spawn_listener(state: &AppState, cancel: &CancellationToken) -> Option<JoinHandle<()>> {
    let Some(source) = state.stream() else {
        warn!("REDIS_URL not set; stream listener disabled");
        return None;
    };

    let listener = AuditListener::new(source.clone(), state.service_context().clone());
    Some(tokio::spawn(listener.run(cancel.clone())))
}

/// Run the HTTP server until `shutdown` completes
pub async fn run_server<F>(app: Router, addr: &str, shutdown: F) -> Result<(), AppError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    if let Ok(local) = listener.local_addr() {
        info!("Server listening on http://{}", local);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete service with configuration
///
/// On SIGINT/SIGTERM: drain HTTP requests, cancel and join the listener,
/// close the stream consumer, then close the store.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_app_state(config).await?;
    let addr = state.config().api.address();
    let shutdown_timeout = state.config().shutdown_timeout;

    let cancel = CancellationToken::new();
    let listener_handle = spawn_listener(&state, &cancel);

    let app = create_app(state.clone());
    let served = run_server(app, &addr, shutdown_signal()).await;

    info!("HTTP server stopped; shutting down background work");
    cancel.cancel();

    if let Some(handle) = listener_handle {
        match tokio::time::timeout(shutdown_timeout, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Stream listener task failed"),
            Err(_) => warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Stream listener did not stop in time"
            ),
        }
    }

    if let Some(source) = state.stream() {
        if let Err(e) = source.close().await {
            warn!(error = %e, "Failed to close stream consumer");
        }
    }

    state.service_context().store().close().await;
    info!("Shutdown complete");

    served
}
