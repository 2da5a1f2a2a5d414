//! Database connection pool management

mod postgres;
mod schema;

pub use postgres::{create_pool, PgPoolConfig};
pub use schema::{ensure_schema, SCHEMA};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
