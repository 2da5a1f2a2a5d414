//! API Integration Tests
//!
//! Run against a real server on an ephemeral port, backed by the in-memory
//! store. No external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use std::collections::HashSet;

use integration_tests::{
    assert_json, assert_status, create_body, unique_merchant, AuditLogPage, ErrorResponse,
    TestServer, AUDIT_LOGS,
};
use reqwest::StatusCode;
use serde_json::json;

async fn create(server: &TestServer, body: &serde_json::Value) {
    let response = server.post(AUDIT_LOGS, body).await.expect("Request failed");
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
}

async fn list(server: &TestServer, query: &str) -> AuditLogPage {
    let response = server
        .get(&format!("{AUDIT_LOGS}?{query}"))
        .await
        .expect("Request failed");
    assert_json(response, StatusCode::OK).await.unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["stream"], "disabled");
}

// ============================================================================
// Ingestion Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_find_login() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();

    create(
        &server,
        &json!({
            "merchant_id": merchant,
            "user_id": "u-1",
            "action": "login",
            "entity_type": "session",
            "details": {"method": "password", "attempts": 1},
            "duration_ms": 35
        }),
    )
    .await;

    let page = list(&server, &format!("merchant_id={merchant}&action=login")).await;
    assert_eq!(page.total, 1);
    let log = &page.logs[0];
    assert!(!log.id.is_empty());
    assert_eq!(log.user_id, "u-1");
    assert_eq!(log.entity_type, "session");
    assert_eq!(log.details["method"], "password");
    assert_eq!(log.result, "success");
    assert_eq!(log.severity, "info");
    assert_eq!(log.duration_ms, Some(35));
}

#[tokio::test]
async fn test_empty_body_is_accepted() {
    let server = TestServer::start().await.expect("Failed to start server");
    create(&server, &json!({})).await;

    let page = list(&server, "").await;
    assert_eq!(page.total, 1);
    assert_eq!(page.logs[0].action, "");
}

#[tokio::test]
async fn test_headers_override_body() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();

    let mut body = create_body("body-merchant", "update");
    body["ip_address"] = json!("10.9.9.9");
    let response = server
        .post_with_headers(
            AUDIT_LOGS,
            &body,
            &[
                ("x-merchant-id", merchant.as_str()),
                ("x-user-id", "header-user"),
                ("x-forwarded-for", "198.51.100.4, 10.0.0.1"),
                ("user-agent", "backoffice/3.0"),
            ],
        )
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let page = list(&server, &format!("merchant_id={merchant}")).await;
    assert_eq!(page.total, 1);
    let log = &page.logs[0];
    assert_eq!(log.merchant_id, merchant);
    assert_eq!(log.user_id, "header-user");
    assert_eq!(log.ip_address, "198.51.100.4");
    assert_eq!(log.user_agent, "backoffice/3.0");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server
        .client
        .post(format!("{}{AUDIT_LOGS}", server.base_url()))
        .header("content-type", "application/json")
        .body("{\"action\":")
        .send()
        .await
        .unwrap();

    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_REQUEST_BODY");
}

// ============================================================================
// Query Tests
// ============================================================================

#[tokio::test]
async fn test_pagination_covers_all_records_once() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();

    for _ in 0..25 {
        create(&server, &create_body(&merchant, "scan")).await;
    }

    let mut seen = HashSet::new();
    for page_number in 1..=3 {
        let page = list(
            &server,
            &format!("merchant_id={merchant}&page={page_number}&page_size=10"),
        )
        .await;
        assert_eq!(page.total, 25);
        assert_eq!(page.page, page_number);
        assert_eq!(page.page_size, 10);

        let expected = if page_number == 3 { 5 } else { 10 };
        assert_eq!(page.logs.len(), expected);

        for pair in page.logs.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        for log in page.logs {
            assert!(seen.insert(log.id), "record returned twice");
        }
    }
    assert_eq!(seen.len(), 25);

    let beyond = list(&server, &format!("merchant_id={merchant}&page=4&page_size=10")).await;
    assert!(beyond.logs.is_empty());
    assert_eq!(beyond.total, 25);
}

#[tokio::test]
async fn test_page_size_bounds() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server
        .get(&format!("{AUDIT_LOGS}?page_size=0"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let page = list(&server, "page_size=100000&page=-3").await;
    assert_eq!(page.page_size, 500);
    assert_eq!(page.page, 1);
}

#[tokio::test]
async fn test_filter_by_severity_and_result() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();

    let mut critical = create_body(&merchant, "refund");
    critical["severity"] = json!("critical");
    critical["result"] = json!("failure");
    critical["error_message"] = json!("card declined");
    create(&server, &critical).await;
    create(&server, &create_body(&merchant, "refund")).await;

    let page = list(&server, &format!("merchant_id={merchant}&severity=critical")).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.logs[0].result, "failure");

    let page = list(&server, &format!("merchant_id={merchant}&result=success")).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.logs[0].severity, "info");

    let response = server
        .get(&format!("{AUDIT_LOGS}?severity=catastrophic"))
        .await
        .unwrap();
    let error: ErrorResponse = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.error.code, "INVALID_ENUM_VALUE");
}

#[tokio::test]
async fn test_unknown_severity_on_ingest_defaults() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();

    let mut body = create_body(&merchant, "sync");
    body["severity"] = json!("loud");
    create(&server, &body).await;

    let page = list(&server, &format!("merchant_id={merchant}")).await;
    assert_eq!(page.logs[0].severity, "info");
}

#[tokio::test]
async fn test_date_range() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();
    create(&server, &create_body(&merchant, "export")).await;

    let page = list(
        &server,
        &format!("merchant_id={merchant}&start_date=2000-01-01T00:00:00Z&end_date=2999-01-01T00:00:00Z"),
    )
    .await;
    assert_eq!(page.total, 1);

    let inverted = list(
        &server,
        &format!("merchant_id={merchant}&start_date=2999-01-01T00:00:00Z&end_date=2000-01-01T00:00:00Z"),
    )
    .await;
    assert_eq!(inverted.total, 0);
    assert!(inverted.logs.is_empty());
}

#[tokio::test]
async fn test_merchant_header_scopes_query() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mine = unique_merchant();
    let theirs = unique_merchant();

    create(&server, &create_body(&mine, "view")).await;
    create(&server, &create_body(&theirs, "view")).await;

    let response = server
        .get_with_headers(
            &format!("{AUDIT_LOGS}?merchant_id={theirs}"),
            &[("x-merchant-id", mine.as_str())],
        )
        .await
        .unwrap();
    let page: AuditLogPage = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.logs[0].merchant_id, mine);
}

#[tokio::test]
async fn test_repeated_query_is_stable() {
    let server = TestServer::start().await.expect("Failed to start server");
    let merchant = unique_merchant();
    for _ in 0..5 {
        create(&server, &create_body(&merchant, "print")).await;
    }

    let query = format!("merchant_id={merchant}&page_size=3");
    let first: Vec<String> = list(&server, &query).await.logs.into_iter().map(|l| l.id).collect();
    let second: Vec<String> = list(&server, &query).await.logs.into_iter().map(|l| l.id).collect();
    assert_eq!(first, second);
}
