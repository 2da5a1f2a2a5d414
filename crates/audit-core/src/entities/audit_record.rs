//! Audit record entity - one immutable entry in the audit trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::{Clock, IdGenerator, RecordId};

/// Free-form key/value context attached to a record
///
/// Keys are strings; values are any JSON value (string, number, bool,
/// null, nested object or array).
pub type Details = serde_json::Map<String, serde_json::Value>;

/// Error when parsing an enumerated audit field from text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Outcome of the audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditResult {
    #[default]
    Success,
    Failure,
    Partial,
}

impl AuditResult {
    /// Lowercase wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Partial => "partial",
        }
    }

    /// Coerce raw caller input into a result
    ///
    /// Empty input becomes the default (`success`). Unknown values are also
    /// coerced to the default so a record is never rejected for this field.
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        raw.parse().unwrap_or_else(|e: ParseEnumError| {
            tracing::warn!(value = %e.value, "Unknown audit result, using default");
            Self::default()
        })
    }
}

impl FromStr for AuditResult {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "partial" => Ok(Self::Partial),
            _ => Err(ParseEnumError {
                kind: "result",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AuditResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importance of the audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Lowercase wire/storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }

    /// Coerce raw caller input into a severity (empty or unknown -> `info`)
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        raw.parse().unwrap_or_else(|e: ParseEnumError| {
            tracing::warn!(value = %e.value, "Unknown audit severity, using default");
            Self::default()
        })
    }
}

impl FromStr for Severity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseEnumError {
                kind: "severity",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw audit input, shared by every ingestion path
///
/// Fields may be empty. Nothing here is validated: empty `action` or
/// `entity_type` values are persisted as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedAuditInput {
    pub merchant_id: String,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Details,
    pub ip_address: String,
    pub user_agent: String,
    pub store_id: String,
    pub session_id: String,
    pub old_value: Details,
    pub new_value: Details,
    pub result: String,
    pub error_message: String,
    pub severity: String,
    pub source_service: String,
    pub correlation_id: String,
    /// Elapsed time of the audited action; `0` and `None` both mean unset
    pub duration_ms: Option<i64>,
}

/// Audit record entity
///
/// Created once at ingestion and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub id: RecordId,
    pub merchant_id: String,
    pub user_id: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: String,
    pub details: Details,
    pub ip_address: String,
    pub user_agent: String,
    pub timestamp: DateTime<Utc>,
    pub store_id: Option<String>,
    pub session_id: Option<String>,
    pub old_value: Option<Details>,
    pub new_value: Option<Details>,
    pub result: AuditResult,
    pub error_message: Option<String>,
    pub severity: Severity,
    pub source_service: String,
    pub correlation_id: Option<String>,
    pub duration_ms: Option<i64>,
}

impl AuditRecord {
    /// Build the canonical record for a fresh ingestion
    ///
    /// The identifier and timestamp come from the injected generator and
    /// clock; `result` and `severity` fall back to their defaults when unset.
    pub fn create(input: NormalizedAuditInput, ids: &dyn IdGenerator, clock: &dyn Clock) -> Self {
        Self {
            id: ids.generate(),
            merchant_id: input.merchant_id,
            user_id: input.user_id,
            action: input.action,
            entity_type: input.entity_type,
            entity_id: input.entity_id,
            details: input.details,
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            timestamp: clock.now(),
            store_id: non_empty(input.store_id),
            session_id: non_empty(input.session_id),
            old_value: non_empty_map(input.old_value),
            new_value: non_empty_map(input.new_value),
            result: AuditResult::from_raw(&input.result),
            error_message: non_empty(input.error_message),
            severity: Severity::from_raw(&input.severity),
            source_service: input.source_service,
            correlation_id: non_empty(input.correlation_id),
            duration_ms: input.duration_ms.filter(|ms| *ms != 0),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty_map(value: Details) -> Option<Details> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
