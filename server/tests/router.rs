//! End-to-end tests of the composed router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::http::{StatusCode, header};
use axum_test::TestServer;
use backoffice_auth::AuthConfig;
use backoffice_core::{Method, TransportFailure};
use backoffice_runtime::metrics::MetricsServer;
use backoffice_server::{app, metrics_router};
use backoffice_testing::StubTransport;
use backoffice_web::CORRELATION_ID_HEADER;
use serde_json::{Value, json};
use std::sync::Arc;

fn server(transport: &StubTransport) -> TestServer {
    TestServer::new(app(
        transport.clone(),
        AuthConfig::new().with_login_redirect("/orders"),
    ))
    .unwrap()
}

#[tokio::test]
async fn test_health_has_correlation_id() {
    let server = server(&StubTransport::new());

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.headers().contains_key(CORRELATION_ID_HEADER));
}

#[tokio::test]
async fn test_every_view_is_routed() {
    let transport = StubTransport::new();
    for view in ["products", "customers", "orders", "analytics"] {
        transport.respond_ok(Method::Get, &format!("/{view}"), 200, json!({"data": []}));
    }
    let server = server(&transport);

    for view in ["products", "customers", "orders", "analytics"] {
        let response = server.get(&format!("/{view}")).await;
        assert_eq!(response.status_code(), StatusCode::OK, "view {view}");
    }
    assert_eq!(transport.request_count(), 4);
}

#[tokio::test]
async fn test_login_then_list() {
    let transport = StubTransport::new();
    transport
        .respond_ok(Method::Post, "/auth/login", 200, json!({"token": "tok"}))
        .respond_ok(Method::Get, "/orders", 200, json!({"data": []}));
    let server = server(&transport);

    let login = server.post("/login").form(&[("email", "a@b.c"), ("password", "pw")]).await;
    assert_eq!(login.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(
        login.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        "/orders"
    );

    let list = server.get("/orders?per_page=25").await;
    assert_eq!(list.status_code(), StatusCode::OK);
    let body: Value = list.json();
    assert_eq!(body["pagination"], json!({"page": 1, "per_page": 25}));
}

#[tokio::test]
async fn test_remote_outage_is_bad_gateway() {
    let transport = StubTransport::new();
    transport.respond_err(Method::Get, "/customers", TransportFailure::network());
    let server = server(&transport);

    let response = server.get("/customers").await;

    assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_metrics_endpoint_without_recorder_is_empty() {
    let metrics = Arc::new(MetricsServer::new("127.0.0.1:0".parse().unwrap()));
    let server = TestServer::new(metrics_router(metrics)).unwrap();

    let response = server.get("/metrics").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "");
}
