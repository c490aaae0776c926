//! Shared helpers for classifier-service integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use classifier_service::config::{
    ClassificationConfig, ClassifierConfig, CorsConfig, GoogleConfig, ModelConfig,
    DEFAULT_ALLOWED_ORIGINS, DEFAULT_GEMINI_API_BASE, DEFAULT_MODEL,
};
use classifier_service::services::providers::TextProvider;
use classifier_service::startup::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const ALLOWED_ORIGIN: &str = "https://shriyabi.github.io";
pub const FOREIGN_ORIGIN: &str = "https://evil.example";

pub fn test_config(strict_output: bool) -> ClassifierConfig {
    ClassifierConfig {
        common: service_core::config::Config { port: 0 },
        google: GoogleConfig {
            api_key: None,
            api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            request_timeout_secs: 5,
        },
        models: ModelConfig {
            classification_model: DEFAULT_MODEL.to_string(),
        },
        cors: CorsConfig {
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
        },
        classification: ClassificationConfig { strict_output },
    }
}

pub fn router_with(provider: Arc<dyn TextProvider>) -> Router {
    build_router(AppState::new(test_config(false), provider)).expect("Failed to build router")
}

pub fn strict_router_with(provider: Arc<dyn TextProvider>) -> Router {
    build_router(AppState::new(test_config(true), provider)).expect("Failed to build router")
}

pub fn classify_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/classify")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Send `request` through `app` and decode the body as JSON (Null if empty
/// or not JSON).
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("Request failed");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}
