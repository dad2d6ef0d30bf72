//! Logging and Prometheus metrics

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use sofra_core::ModelStatus;
use std::time::Duration;
use tracing::info;

pub const REQUESTS_TOTAL: &str = "sofra_requests_total";
pub const PREDICTIONS_TOTAL: &str = "sofra_predictions_total";
pub const INFERENCE_LATENCY_US: &str = "sofra_inference_latency_us";
pub const MODEL_READY: &str = "sofra_model_ready";

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sofra_server=debug,sofra_classifiers=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("sofra_server=info,sofra_classifiers=info,tower_http=warn")
        })
    };

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Install the Prometheus recorder and return handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(REQUESTS_TOTAL, "Total number of requests by endpoint");
    metrics::describe_counter!(
        PREDICTIONS_TOTAL,
        "Total number of prediction requests by outcome"
    );
    metrics::describe_histogram!(
        INFERENCE_LATENCY_US,
        metrics::Unit::Microseconds,
        "Decode plus inference latency in microseconds"
    );
    metrics::describe_gauge!(MODEL_READY, "1 when the classifier is loaded, 0 otherwise");

    info!("Metrics exporter initialized");
    Ok(handle)
}

pub fn record_request(endpoint: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

pub fn record_prediction(outcome: &'static str) {
    metrics::counter!(PREDICTIONS_TOTAL, "outcome" => outcome).increment(1);
}

pub fn record_inference_latency(latency: Duration) {
    metrics::histogram!(INFERENCE_LATENCY_US).record(latency.as_micros() as f64);
}

pub fn record_model_status(status: ModelStatus) {
    let ready = if status.is_ready() { 1.0 } else { 0.0 };
    metrics::gauge!(MODEL_READY).set(ready);
}
