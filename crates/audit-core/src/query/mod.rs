//! Query module - filter construction and store query types

mod builder;
mod filter;

pub use builder::{build_filter, FilterCriteria, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use filter::{
    newest_first, FieldMatch, FilterField, PageRequest, RecordFilter, StoreQuery, TimeRange,
};
