//! Integration tests for the liveness, readiness and metrics endpoints.
//!
//! The root endpoint test runs the real server on a random port; the rest
//! drive the router directly.

mod common;

use axum::{body::Body, http::Request, http::StatusCode};
use classifier_service::services::providers::mock::MockTextProvider;
use classifier_service::services::providers::ProviderError;
use classifier_service::startup::Application;
use common::{router_with, send, test_config};
use reqwest::Client;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Spawn the application on a random port and return the port number.
async fn spawn_app(provider: MockTextProvider) -> u16 {
    let app = Application::build_with_provider(test_config(false), Arc::new(provider))
        .await
        .expect("Failed to build application");

    let port = app.port();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn root_reports_alive_even_when_provider_fails() {
    let port = spawn_app(MockTextProvider::failing(ProviderError::Unauthorized(
        "bad key".to_string(),
    )))
    .await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        json!({"status": "Alive", "message": "Budget Backend is running!"})
    );
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = router_with(Arc::new(MockTextProvider::with_response("{}")));

    let (status, _, body) = send(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "classifier-service");
}

#[tokio::test]
async fn readiness_follows_provider_health() {
    let ready = router_with(Arc::new(MockTextProvider::with_response("{}")));
    let (status, _, _) = send(ready, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);

    let not_ready = router_with(Arc::new(MockTextProvider::failing(
        ProviderError::NotConfigured("no key".to_string()),
    )));
    let (status, _, _) = send(not_ready, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn metrics_exposes_classification_counters() {
    let app = router_with(Arc::new(MockTextProvider::with_response(r#"{"0": "b"}"#)));

    let _ = send(
        app.clone(),
        common::classify_request(&json!({
            "transaction_descriptions": ["a"],
            "categories": ["b"]
        })),
    )
    .await;

    let response = tower::util::ServiceExt::oneshot(app, get("/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("classify_requests_total"));
}
