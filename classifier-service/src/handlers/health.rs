use crate::dtos::RootStatus;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use service_core::error::AppError;

/// Liveness payload for `GET /`. Never consults the provider.
pub async fn root() -> Json<RootStatus> {
    Json(RootStatus::alive())
}

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "classifier-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check endpoint for K8s readiness probes.
pub async fn readiness_check(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .classifier
        .provider()
        .health_check()
        .await
        .map(|_| StatusCode::OK)
        .map_err(|e| {
            tracing::warn!(error = %e, "Provider not ready");
            AppError::ServiceUnavailable
        })
}
