//! # audit-api
//!
//! REST API server built with Axum. Also hosts the stream listener task
//! and owns process startup and shutdown.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, spawn_listener};
pub use state::AppState;
