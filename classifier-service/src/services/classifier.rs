//! Classification request path: prompt, one provider call, parse.

use crate::dtos::ClassifyRequest;
use crate::error::ClassifyError;
use crate::services::metrics;
use crate::services::prompt::{build_prompt, UNCATEGORIZED};
use crate::services::providers::{GenerationParams, TextProvider};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Turns a [`ClassifyRequest`] into the model's index → category mapping.
#[derive(Clone)]
pub struct Classifier {
    provider: Arc<dyn TextProvider>,
    strict_output: bool,
}

impl Classifier {
    pub fn new(provider: Arc<dyn TextProvider>, strict_output: bool) -> Self {
        Self {
            provider,
            strict_output,
        }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// Classify every description in `request`.
    ///
    /// The parsed model output is returned as-is unless strict output is
    /// enabled, in which case its shape is checked against the request.
    pub async fn classify(&self, request: &ClassifyRequest) -> Result<Value, ClassifyError> {
        let prompt = build_prompt(&request.transaction_descriptions, &request.categories)
            .map_err(ClassifyError::Prompt)?;

        let start = Instant::now();
        let result = self
            .provider
            .generate(&prompt, &GenerationParams::json())
            .await;
        metrics::record_provider_latency(
            self.provider.name(),
            self.provider.model(),
            start.elapsed().as_secs_f64(),
        );

        let response = result.map_err(|e| {
            metrics::record_provider_error(self.provider.name(), e.error_type());
            ClassifyError::from(e)
        })?;

        tracing::debug!(
            model = %self.provider.model(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "Received classification from provider"
        );

        let value = parse_model_output(&response.text)?;

        if self.strict_output {
            validate_mapping(&value, request)?;
        }

        Ok(value)
    }
}

/// Parse the model's raw text as JSON without interpreting its shape.
pub fn parse_model_output(text: &str) -> Result<Value, ClassifyError> {
    serde_json::from_str(text).map_err(ClassifyError::MalformedOutput)
}

/// Check that `value` is an object whose keys index into the request's
/// descriptions and whose values are supplied categories or the sentinel.
pub fn validate_mapping(value: &Value, request: &ClassifyRequest) -> Result<(), ClassifyError> {
    let map = value.as_object().ok_or_else(|| {
        ClassifyError::InvalidOutput("expected a JSON object of index to category".to_string())
    })?;

    let count = request.transaction_descriptions.len();

    for (key, category) in map {
        // Keys must be canonical so that two keys never name one description
        let canonical_index = matches!(
            key.parse::<usize>(),
            Ok(index) if index < count && index.to_string() == *key
        );
        if !canonical_index {
            return Err(ClassifyError::InvalidOutput(format!(
                "key '{}' is not an index below {}",
                key, count
            )));
        }

        let name = category.as_str().ok_or_else(|| {
            ClassifyError::InvalidOutput(format!("value for key '{}' is not a string", key))
        })?;

        if name != UNCATEGORIZED && !request.categories.iter().any(|c| c == name) {
            return Err(ClassifyError::InvalidOutput(format!(
                "category '{}' for key '{}' is not in the supplied list",
                name, key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::providers::ProviderError;
    use serde_json::json;

    fn request(descriptions: &[&str], categories: &[&str]) -> ClassifyRequest {
        ClassifyRequest {
            transaction_descriptions: descriptions.iter().map(|s| s.to_string()).collect(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn parse_accepts_any_json() {
        assert_eq!(parse_model_output("[1, 2]").unwrap(), json!([1, 2]));
        assert_eq!(parse_model_output("{}").unwrap(), json!({}));
    }

    #[test]
    fn parse_rejects_non_json() {
        let err = parse_model_output("Sure! Here is your mapping").unwrap_err();
        assert_eq!(err.kind(), "malformed_output");
    }

    #[test]
    fn validate_accepts_categories_and_sentinel() {
        let req = request(&["a", "b"], &["Food"]);
        assert!(validate_mapping(&json!({"0": "Food", "1": "Uncategorized"}), &req).is_ok());
    }

    #[test]
    fn validate_allows_missing_indices() {
        let req = request(&["a", "b", "c"], &["Food"]);
        assert!(validate_mapping(&json!({"1": "Food"}), &req).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_and_non_numeric_keys() {
        let req = request(&["a"], &["Food"]);
        assert!(validate_mapping(&json!({"1": "Food"}), &req).is_err());
        assert!(validate_mapping(&json!({"first": "Food"}), &req).is_err());
    }

    #[test]
    fn validate_rejects_non_canonical_index_keys() {
        let req = request(&["a", "b"], &["Food"]);
        for key in ["+0", "00", "01", " 1"] {
            let err = validate_mapping(&json!({ key: "Food" }), &req).unwrap_err();
            assert_eq!(err.kind(), "invalid_output", "key {:?} was accepted", key);
        }
        assert!(validate_mapping(&json!({"0": "Food", "1": "Food"}), &req).is_ok());
    }

    #[test]
    fn validate_rejects_unknown_category_and_non_string_value() {
        let req = request(&["a"], &["Food"]);
        assert!(validate_mapping(&json!({"0": "Travel"}), &req).is_err());
        assert!(validate_mapping(&json!({"0": 3}), &req).is_err());
    }

    #[test]
    fn validate_rejects_non_object() {
        let req = request(&["a"], &["Food"]);
        let err = validate_mapping(&json!(["Food"]), &req).unwrap_err();
        assert_eq!(err.kind(), "invalid_output");
    }

    #[tokio::test]
    async fn classify_sends_prompt_and_returns_parsed_output() {
        let provider = Arc::new(MockTextProvider::with_response(r#"{"0": "Coffee"}"#));
        let classifier = Classifier::new(provider.clone(), false);

        let value = classifier
            .classify(&request(&["STARBUCKS"], &["Coffee"]))
            .await
            .unwrap();

        assert_eq!(value, json!({"0": "Coffee"}));
        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("STARBUCKS"));
    }

    #[tokio::test]
    async fn classify_maps_provider_failure() {
        let provider = Arc::new(MockTextProvider::failing(ProviderError::RateLimited));
        let classifier = Classifier::new(provider, false);

        let err = classifier
            .classify(&request(&["a"], &["b"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "upstream");
    }

    #[tokio::test]
    async fn strict_mode_rejects_unknown_category() {
        let provider = Arc::new(MockTextProvider::with_response(r#"{"0": "Travel"}"#));
        let classifier = Classifier::new(provider, true);

        let err = classifier
            .classify(&request(&["a"], &["Food"]))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "invalid_output");
    }
}
