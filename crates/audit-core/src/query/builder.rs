//! Query filter builder
//!
//! Turns a sparse set of optional criteria into a [`StoreQuery`]. Only
//! criteria with a non-empty value constrain the result; an omitted
//! criterion never means "field must be absent".

use chrono::{DateTime, Utc};

use crate::entities::{AuditResult, Severity};
use crate::error::DomainError;

use super::filter::{FieldMatch, FilterField, PageRequest, RecordFilter, StoreQuery, TimeRange};

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Largest page a single query may return
pub const MAX_PAGE_SIZE: i64 = 500;

/// Caller-supplied search criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub merchant_id: Option<String>,
    pub user_id: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub action: Option<String>,
    pub store_id: Option<String>,
    pub severity: Option<Severity>,
    pub result: Option<AuditResult>,
    pub source_service: Option<String>,
    pub correlation_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Build the store query for a set of criteria
///
/// Pagination rules: a missing or `< 1` page becomes page 1; a missing page
/// size becomes [`DEFAULT_PAGE_SIZE`]; a page size above [`MAX_PAGE_SIZE`]
/// is clamped.
///
/// # Errors
/// Returns `DomainError::InvalidPagination` if `page_size <= 0`.
pub fn build_filter(criteria: &FilterCriteria) -> Result<StoreQuery, DomainError> {
    let text_criteria = [
        (FilterField::MerchantId, &criteria.merchant_id),
        (FilterField::UserId, &criteria.user_id),
        (FilterField::EntityType, &criteria.entity_type),
        (FilterField::EntityId, &criteria.entity_id),
        (FilterField::Action, &criteria.action),
        (FilterField::StoreId, &criteria.store_id),
        (FilterField::SourceService, &criteria.source_service),
        (FilterField::CorrelationId, &criteria.correlation_id),
    ];

    let mut conditions: Vec<FieldMatch> = text_criteria
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some(FieldMatch::new(field, v)),
            _ => None,
        })
        .collect();

    if let Some(severity) = criteria.severity {
        conditions.push(FieldMatch::new(FilterField::Severity, severity.as_str()));
    }
    if let Some(result) = criteria.result {
        conditions.push(FieldMatch::new(FilterField::Result, result.as_str()));
    }

    let filter = RecordFilter {
        conditions,
        time_range: TimeRange {
            start: criteria.start_date,
            end: criteria.end_date,
        },
    };

    Ok(StoreQuery {
        filter,
        page: page_request(criteria.page, criteria.page_size)?,
    })
}

fn page_request(page: Option<i64>, page_size: Option<i64>) -> Result<PageRequest, DomainError> {
    let page_size = match page_size {
        None => DEFAULT_PAGE_SIZE,
        Some(size) if size <= 0 => {
            return Err(DomainError::InvalidPagination(format!(
                "page_size must be positive, got {size}"
            )));
        }
        Some(size) => size.min(MAX_PAGE_SIZE),
    };

    Ok(PageRequest {
        page: page.unwrap_or(1).max(1),
        page_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_criteria_imposes_no_constraint() {
        let query = build_filter(&FilterCriteria::default()).unwrap();
        assert!(query.filter.is_empty());
        assert_eq!(query.page, PageRequest { page: 1, page_size: DEFAULT_PAGE_SIZE });
    }

    #[test]
    fn test_empty_strings_are_ignored() {
        let criteria = FilterCriteria {
            merchant_id: Some(String::new()),
            action: Some("login".to_string()),
            ..Default::default()
        };
        let query = build_filter(&criteria).unwrap();

        assert_eq!(
            query.filter.conditions,
            vec![FieldMatch::new(FilterField::Action, "login")]
        );
    }

    #[test]
    fn test_all_fields_applied() {
        let criteria = FilterCriteria {
            merchant_id: Some("m1".to_string()),
            user_id: Some("u1".to_string()),
            entity_type: Some("order".to_string()),
            entity_id: Some("o-9".to_string()),
            action: Some("order.create".to_string()),
            store_id: Some("s1".to_string()),
            severity: Some(Severity::Critical),
            result: Some(AuditResult::Failure),
            source_service: Some("pos".to_string()),
            correlation_id: Some("trace-1".to_string()),
            ..Default::default()
        };
        let query = build_filter(&criteria).unwrap();

        assert_eq!(query.filter.conditions.len(), 10);
        assert!(query
            .filter
            .conditions
            .contains(&FieldMatch::new(FilterField::Severity, "critical")));
        assert!(query
            .filter
            .conditions
            .contains(&FieldMatch::new(FilterField::Result, "failure")));
    }

    #[test]
    fn test_date_range_bounds() {
        let only_start = build_filter(&FilterCriteria {
            start_date: Some(ts(2)),
            ..Default::default()
        })
        .unwrap();
        assert!(only_start.filter.time_range.contains(ts(2)));
        assert!(only_start.filter.time_range.contains(ts(20)));
        assert!(!only_start.filter.time_range.contains(ts(1)));

        let only_end = build_filter(&FilterCriteria {
            end_date: Some(ts(5)),
            ..Default::default()
        })
        .unwrap();
        assert!(only_end.filter.time_range.contains(ts(5)));
        assert!(!only_end.filter.time_range.contains(ts(6)));

        let both = build_filter(&FilterCriteria {
            start_date: Some(ts(2)),
            end_date: Some(ts(5)),
            ..Default::default()
        })
        .unwrap();
        assert!(both.filter.time_range.contains(ts(2)));
        assert!(both.filter.time_range.contains(ts(5)));
        assert!(!both.filter.time_range.contains(ts(1)));
        assert!(!both.filter.time_range.contains(ts(6)));
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let query = build_filter(&FilterCriteria {
            start_date: Some(ts(5)),
            end_date: Some(ts(2)),
            ..Default::default()
        })
        .unwrap();

        for day in 1..=7 {
            assert!(!query.filter.time_range.contains(ts(day)));
        }
    }

    #[test]
    fn test_pagination_skip_and_limit() {
        let query = build_filter(&FilterCriteria {
            page: Some(3),
            page_size: Some(10),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.page.skip(), 20);
        assert_eq!(query.page.limit(), 10);
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        for page in [0, -4] {
            let query = build_filter(&FilterCriteria {
                page: Some(page),
                page_size: Some(10),
                ..Default::default()
            })
            .unwrap();
            assert_eq!(query.page.page, 1);
            assert_eq!(query.page.skip(), 0);
        }
    }

    #[test]
    fn test_non_positive_page_size_rejected() {
        for size in [0, -1] {
            let err = build_filter(&FilterCriteria {
                page_size: Some(size),
                ..Default::default()
            })
            .unwrap_err();
            assert!(matches!(err, DomainError::InvalidPagination(_)));
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_oversized_page_clamped() {
        let query = build_filter(&FilterCriteria {
            page_size: Some(10_000),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.page.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn test_count_filter_matches_page_filter() {
        let query = build_filter(&FilterCriteria {
            action: Some("login".to_string()),
            page: Some(2),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(query.count_filter(), &query.filter);
    }
}
