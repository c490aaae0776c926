//! Errors surfaced by `POST /classify`.

use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Prefix of every classification failure message returned to clients.
pub const FAILURE_PREFIX: &str = "AI Classification Failed: ";

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to build prompt: {0}")]
    Prompt(#[source] serde_json::Error),

    #[error("{0}")]
    Transport(ProviderError),

    #[error("{0}")]
    Authentication(ProviderError),

    #[error("{0}")]
    Upstream(ProviderError),

    #[error("model returned invalid JSON: {0}")]
    MalformedOutput(#[source] serde_json::Error),

    #[error("model output does not match request: {0}")]
    InvalidOutput(String),
}

impl ClassifyError {
    /// Stable discriminator included in the error body and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifyError::Prompt(_) => "prompt",
            ClassifyError::Transport(_) => "transport",
            ClassifyError::Authentication(_) => "authentication",
            ClassifyError::Upstream(_) => "upstream",
            ClassifyError::MalformedOutput(_) => "malformed_output",
            ClassifyError::InvalidOutput(_) => "invalid_output",
        }
    }

    /// Client-facing message.
    pub fn detail(&self) -> String {
        format!("{}{}", FAILURE_PREFIX, self)
    }
}

impl From<ProviderError> for ClassifyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NetworkError(_) => ClassifyError::Transport(err),
            ProviderError::NotConfigured(_) | ProviderError::Unauthorized(_) => {
                ClassifyError::Authentication(err)
            }
            ProviderError::RateLimited
            | ProviderError::ContentFiltered
            | ProviderError::EmptyResponse
            | ProviderError::ApiError(_) => ClassifyError::Upstream(err),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassifyErrorBody {
    pub detail: String,
    pub kind: &'static str,
}

impl IntoResponse for ClassifyError {
    fn into_response(self) -> Response {
        // Every failure kind shares one status; `kind` tells them apart.
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ClassifyErrorBody {
                detail: self.detail(),
                kind: self.kind(),
            }),
        )
            .into_response()
    }
}
