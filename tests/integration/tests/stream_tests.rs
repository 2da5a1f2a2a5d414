//! Redis Streams end-to-end tests
//!
//! Publishes envelopes onto a fresh stream and waits for the listener to
//! store them. Skipped unless REDIS_URL is set:
//!
//! ```bash
//! export REDIS_URL="redis://127.0.0.1:6379"
//! cargo test -p integration-tests --test stream_tests
//! ```

use std::time::Duration;

use audit_stream::{RedisPool, RedisPoolConfig, StreamPublisher};
use integration_tests::{
    assert_json, config_from, env_url, envelope, unique_merchant, unique_suffix, AuditLogPage,
    TestServer, AUDIT_LOGS,
};
use reqwest::StatusCode;
use serde_json::json;

struct StreamFixture {
    server: TestServer,
    publisher: StreamPublisher,
}

async fn start_stream_server() -> Option<StreamFixture> {
    let redis_url = env_url("REDIS_URL")?;
    let stream_key = format!("test.audit.e2e.{}.{}", std::process::id(), unique_suffix());

    let config = config_from(&[
        ("AUDIT_STORE", "memory"),
        ("REDIS_URL", redis_url.as_str()),
        ("AUDIT_STREAM_KEY", stream_key.as_str()),
        ("AUDIT_STREAM_BLOCK_MS", "200"),
    ])
    .expect("Invalid config");
    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");

    let pool = RedisPool::new(RedisPoolConfig {
        url: redis_url,
        max_connections: 2,
    })
    .expect("Failed to create Redis pool");

    Some(StreamFixture {
        server,
        publisher: StreamPublisher::new(pool, stream_key),
    })
}

/// Poll the query API until `expected` records exist for the merchant
async fn wait_for_records(server: &TestServer, merchant: &str, expected: i64) -> AuditLogPage {
    for _ in 0..50 {
        let response = server
            .get(&format!("{AUDIT_LOGS}?merchant_id={merchant}"))
            .await
            .unwrap();
        let page: AuditLogPage = assert_json(response, StatusCode::OK).await.unwrap();
        if page.total >= expected {
            return page;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("records for {merchant} never arrived");
}

#[tokio::test]
async fn test_stream_event_is_stored() {
    let Some(fixture) = start_stream_server().await else {
        return;
    };
    let merchant = unique_merchant();

    let event = envelope(
        "inventory",
        json!({
            "merchant_id": merchant,
            "action": "stock_adjust",
            "entity_type": "product",
            "entity_id": "sku-1",
            "source_service": "spoofed",
            "severity": "warning"
        }),
    );
    fixture.publisher.publish(&event).await.expect("publish failed");

    let page = wait_for_records(&fixture.server, &merchant, 1).await;
    let log = &page.logs[0];
    assert_eq!(log.source_service, "inventory");
    assert_eq!(log.action, "stock_adjust");
    assert_eq!(log.severity, "warning");
}

#[tokio::test]
async fn test_malformed_event_does_not_stall_listener() {
    let Some(fixture) = start_stream_server().await else {
        return;
    };
    let merchant = unique_merchant();

    fixture
        .publisher
        .publish_raw(b"{definitely not json")
        .await
        .expect("publish failed");
    fixture
        .publisher
        .publish(&envelope("pos", json!({"merchant_id": merchant, "action": "void"})))
        .await
        .expect("publish failed");

    let page = wait_for_records(&fixture.server, &merchant, 1).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.logs[0].action, "void");
}

#[tokio::test]
async fn test_readiness_reports_stream() {
    let Some(fixture) = start_stream_server().await else {
        return;
    };

    let response = fixture.server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["checks"]["stream"], "healthy");
}
