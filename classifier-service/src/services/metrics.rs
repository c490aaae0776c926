//! Prometheus metrics for classifier-service.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

struct Metrics {
    registry: Registry,
    classify_requests: IntCounterVec,
    classify_descriptions: IntCounter,
    provider_latency: HistogramVec,
    provider_errors: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    if METRICS.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    // Outcome: success or a ClassifyError kind
    let classify_requests = IntCounterVec::new(
        Opts::new("classify_requests_total", "Total classification requests"),
        &["outcome"],
    )?;

    let classify_descriptions = IntCounter::new(
        "classify_descriptions_total",
        "Total transaction descriptions submitted for classification",
    )?;

    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "genai_provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )?;

    let provider_errors = IntCounterVec::new(
        Opts::new("genai_provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    )?;

    registry.register(Box::new(classify_requests.clone()))?;
    registry.register(Box::new(classify_descriptions.clone()))?;
    registry.register(Box::new(provider_latency.clone()))?;
    registry.register(Box::new(provider_errors.clone()))?;

    if METRICS
        .set(Metrics {
            registry,
            classify_requests,
            classify_descriptions,
            provider_latency,
            provider_errors,
        })
        .is_ok()
    {
        tracing::info!("Prometheus metrics initialized");
    }

    Ok(())
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let Some(metrics) = METRICS.get() else {
        tracing::error!("Metrics registry not initialized");
        return "# Metrics registry not initialized\n".to_string();
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    if let Err(e) = encoder.encode(&metrics.registry.gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

/// Record a finished classification request.
pub fn record_classify_request(outcome: &str, description_count: usize) {
    if let Some(metrics) = METRICS.get() {
        metrics.classify_requests.with_label_values(&[outcome]).inc();
        metrics
            .classify_descriptions
            .inc_by(description_count as u64);
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .provider_latency
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(metrics) = METRICS.get() {
        metrics
            .provider_errors
            .with_label_values(&[provider, error_type])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_values_show_up_in_exposition() {
        init_metrics().unwrap();
        init_metrics().unwrap();

        record_classify_request("success", 3);
        record_provider_error("mock", "rate_limited");

        let text = get_metrics();
        assert!(text.contains("classify_requests_total{outcome=\"success\"}"));
        assert!(text.contains("genai_provider_errors_total"));
    }
}
