//! Route definitions
//!
//! API routes are mounted under /api/v1; health checks sit at the root.

use axum::{routing::get, Router};

use crate::handlers::{audit_logs, health};
use crate::state::AppState;

/// Create the main API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .merge(health_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().route(
        "/audit-logs",
        get(audit_logs::list_audit_logs).post(audit_logs::create_audit_log),
    )
}
