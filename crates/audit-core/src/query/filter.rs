//! Store query types
//!
//! A [`StoreQuery`] is what the store gateway executes: a conjunctive
//! [`RecordFilter`] (used for both the page fetch and the total count)
//! and a [`PageRequest`].

use chrono::{DateTime, Utc};
use std::cmp::Ordering;

use crate::entities::AuditRecord;

/// Record fields that support exact-match filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    MerchantId,
    UserId,
    EntityType,
    EntityId,
    Action,
    StoreId,
    Severity,
    Result,
    SourceService,
    CorrelationId,
}

impl FilterField {
    /// Column / document key name in the store
    pub const fn column(&self) -> &'static str {
        match self {
            Self::MerchantId => "merchant_id",
            Self::UserId => "user_id",
            Self::EntityType => "entity_type",
            Self::EntityId => "entity_id",
            Self::Action => "action",
            Self::StoreId => "store_id",
            Self::Severity => "severity",
            Self::Result => "result",
            Self::SourceService => "source_service",
            Self::CorrelationId => "correlation_id",
        }
    }

    /// Value of this field on a record, as stored (absent optionals are empty)
    pub fn value_of<'a>(&self, record: &'a AuditRecord) -> &'a str {
        match self {
            Self::MerchantId => &record.merchant_id,
            Self::UserId => &record.user_id,
            Self::EntityType => &record.entity_type,
            Self::EntityId => &record.entity_id,
            Self::Action => &record.action,
            Self::StoreId => record.store_id.as_deref().unwrap_or_default(),
            Self::Severity => record.severity.as_str(),
            Self::Result => record.result.as_str(),
            Self::SourceService => &record.source_service,
            Self::CorrelationId => record.correlation_id.as_deref().unwrap_or_default(),
        }
    }
}

/// Exact match of one field against a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub field: FilterField,
    pub value: String,
}

impl FieldMatch {
    /// Create a new FieldMatch
    pub fn new(field: FilterField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }

    /// Check a record against this condition
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.field.value_of(record) == self.value
    }
}

/// Inclusive bounds over the record timestamp
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeRange {
    /// `timestamp >= start`
    pub start: Option<DateTime<Utc>>,
    /// `timestamp <= end`
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    /// Check if neither bound is set
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Check if an instant falls within the range
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| instant >= start) && self.end.is_none_or(|end| instant <= end)
    }
}

/// Conjunction of field matches and a time range
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub conditions: Vec<FieldMatch>,
    pub time_range: TimeRange,
}

impl RecordFilter {
    /// Check if the filter imposes no constraint at all
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.time_range.is_unbounded()
    }

    /// Check a record against every condition
    pub fn matches(&self, record: &AuditRecord) -> bool {
        self.time_range.contains(record.timestamp)
            && self.conditions.iter().all(|condition| condition.matches(record))
    }
}

/// Offset pagination (1-based page number)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Number of matching records to skip
    #[inline]
    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Maximum number of records to return
    #[inline]
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Query executed by the store gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    pub filter: RecordFilter,
    pub page: PageRequest,
}

impl StoreQuery {
    /// The filter used for the total count (same conditions, no pagination)
    pub fn count_filter(&self) -> &RecordFilter {
        &self.filter
    }
}

/// Result ordering: most recent first, ties broken by descending id
///
/// Use as a comparator with `sort_by`.
pub fn newest_first(a: &AuditRecord, b: &AuditRecord) -> Ordering {
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| b.id.cmp(&a.id))
}
