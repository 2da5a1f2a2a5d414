//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub store: StoreBackend,
    /// Event stream settings; `None` disables the stream listener
    pub stream: Option<StreamConfig>,
    /// Upper bound on waiting for background tasks during shutdown
    pub shutdown_timeout: Duration,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which store gateway implementation backs the service
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Postgres(DatabaseConfig),
    /// Process-local store; contents are lost on restart
    Memory,
}

impl StoreBackend {
    /// Short name used in logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Event stream (Redis Streams consumer group) configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub redis_url: String,
    pub stream_key: String,
    pub group: String,
    /// Consumer name within the group; must stay the same across restarts
    /// so entries left pending by a previous run are read again
    pub consumer: String,
    pub block_ms: u64,
    /// Entries idle this long on another consumer are claimed on connect
    pub claim_idle_ms: u64,
}

// Default value functions
fn default_app_name() -> String {
    "audit-service".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_stream_key() -> String {
    "system.audit".to_string()
}

fn default_stream_group() -> String {
    "audit-service-group".to_string()
}

/// `audit-service-<HOSTNAME>`, or `audit-service` when no hostname is set
fn default_stream_consumer(hostname: Option<String>) -> String {
    hostname.map_or_else(
        || "audit-service".to_string(),
        |host| format!("audit-service-{host}"),
    )
}

fn default_block_ms() -> u64 {
    5000
}

fn default_claim_idle_ms() -> u64 {
    60_000
}

fn default_shutdown_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or a value does not parse
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// # Errors
    /// Same as [`AppConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let env = match var("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => default_env(),
        };

        let store = match var("AUDIT_STORE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("postgres") => StoreBackend::Postgres(DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_or(&var, "DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            }),
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::InvalidValue("AUDIT_STORE", other.to_string())),
        };

        let stream = match var("REDIS_URL") {
            Some(redis_url) => Some(StreamConfig {
                redis_url,
                stream_key: var("AUDIT_STREAM_KEY").unwrap_or_else(default_stream_key),
                group: var("AUDIT_STREAM_GROUP").unwrap_or_else(default_stream_group),
                consumer: var("AUDIT_STREAM_CONSUMER")
                    .unwrap_or_else(|| default_stream_consumer(var("HOSTNAME"))),
                block_ms: parse_or(&var, "AUDIT_STREAM_BLOCK_MS", default_block_ms)?,
                claim_idle_ms: parse_or(&var, "AUDIT_STREAM_CLAIM_IDLE_MS", default_claim_idle_ms)?,
            }),
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: var("API_HOST").unwrap_or_else(default_host),
                port: parse_or(&var, "API_PORT", default_port)?,
            },
            store,
            stream,
            shutdown_timeout: Duration::from_secs(parse_or(
                &var,
                "SHUTDOWN_TIMEOUT_SECS",
                default_shutdown_timeout_secs,
            )?),
        })
    }
}

fn parse_or<T, V>(var: &V, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    T: FromStr,
    V: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
