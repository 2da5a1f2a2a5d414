//! Request metadata extractor
//!
//! Reads caller context from headers set by the gateway in front of the
//! service. Blank headers are treated as absent.

use std::convert::Infallible;

use audit_service::RequestMetadata;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use axum_extra::{headers::UserAgent, TypedHeader};

/// Tenant the caller acts for
pub const MERCHANT_ID_HEADER: &str = "x-merchant-id";
/// Authenticated user
pub const USER_ID_HEADER: &str = "x-user-id";
/// Proxy chain; the first hop is the client address
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Caller metadata taken from request headers
#[derive(Debug, Clone, Default)]
pub struct RequestMeta(pub RequestMetadata);

#[async_trait]
impl<S> FromRequestParts<S> for RequestMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = TypedHeader::<UserAgent>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(agent)| agent.as_str().to_string())
            .filter(|agent| !agent.is_empty());

        Ok(RequestMeta(metadata_from_headers(&parts.headers, user_agent)))
    }
}

fn metadata_from_headers(headers: &HeaderMap, user_agent: Option<String>) -> RequestMetadata {
    RequestMetadata {
        merchant_id: header_text(headers, MERCHANT_ID_HEADER),
        user_id: header_text(headers, USER_ID_HEADER),
        ip_address: header_text(headers, FORWARDED_FOR_HEADER).and_then(|chain| first_hop(&chain)),
        user_agent,
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn first_hop(chain: &str) -> Option<String> {
    chain
        .split(',')
        .next()
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(ToString::to_string)
}
