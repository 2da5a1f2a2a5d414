//! Axum extractors for request handling
//!
//! Custom extractors for request metadata, JSON bodies, and validated queries.

mod json;
mod metadata;
mod query;

pub use json::JsonBody;
pub use metadata::{RequestMeta, FORWARDED_FOR_HEADER, MERCHANT_ID_HEADER, USER_ID_HEADER};
pub use query::ValidatedQuery;
