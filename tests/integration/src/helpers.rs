//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests,
//! and checking which external services are available.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use audit_api::{create_app, create_app_state, spawn_listener};
use audit_common::AppConfig;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Test server instance that manages lifecycle
///
/// Dropping the server cancels the stream listener (if any) and aborts the
/// HTTP task.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server backed by the in-memory store
    pub async fn start() -> Result<Self> {
        Self::start_with_config(config_from(&[("AUDIT_STORE", "memory")])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;

        let cancel = CancellationToken::new();
        // The listener task ends when `cancel` fires
        let _listener = spawn_listener(&state, &cancel);

        let app = create_app(state);

        // Ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            cancel,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn with_headers(builder: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
        headers
            .iter()
            .fold(builder, |builder, (name, value)| builder.header(*name, *value))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.get_with_headers(path, &[]).await
    }

    /// Make a GET request with extra headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let request = Self::with_headers(self.client.get(&url), headers);
        Ok(request.send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        self.post_with_headers(path, body, &[]).await
    }

    /// Make a POST request with JSON body and extra headers
    pub async fn post_with_headers<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        headers: &[(&str, &str)],
    ) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        let request = Self::with_headers(self.client.post(&url).json(body), headers);
        Ok(request.send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Build a configuration from explicit variables, ignoring the process environment
pub fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Read an optional service URL from the environment (and `.env`)
pub fn env_url(name: &str) -> Option<String> {
    dotenvy::dotenv().ok();
    match std::env::var(name) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("Skipping test: {name} not set");
            None
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
