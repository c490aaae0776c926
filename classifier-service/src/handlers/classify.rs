use crate::dtos::ClassifyRequest;
use crate::error::ClassifyError;
use crate::services::metrics;
use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

/// Map each transaction description to one of the caller's categories.
pub async fn classify_transactions(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<Value>, ClassifyError> {
    let description_count = request.transaction_descriptions.len();

    tracing::info!(
        descriptions = description_count,
        categories = request.categories.len(),
        "Classifying transactions"
    );

    match state.classifier.classify(&request).await {
        Ok(mapping) => {
            metrics::record_classify_request("success", description_count);
            Ok(Json(mapping))
        }
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "AI classification failed");
            metrics::record_classify_request(e.kind(), description_count);
            Err(e)
        }
    }
}
