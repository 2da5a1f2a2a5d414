//! Audit API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p audit-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use audit_common::{init_tracing_for, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = init_tracing_for(config.app.env) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        port = config.api.port,
        store = config.store.name(),
        stream = config.stream.is_some(),
        "Configuration loaded"
    );

    if let Err(e) = audit_api::run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
