use metrics_exporter_prometheus::PrometheusHandle;
use sofra_classifiers::ClassifierHandle;
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::gateway::InferenceGateway;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Front of the process-wide classifier
    pub gateway: Arc<InferenceGateway>,

    /// Prometheus handle for rendering `/metrics`
    pub metrics_handle: Option<PrometheusHandle>,

    /// Request body cap applied to every route
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &ServiceConfig, handle: Arc<ClassifierHandle>) -> Self {
        Self {
            gateway: Arc::new(InferenceGateway::new(handle, config.inference.top_k)),
            metrics_handle: None,
            max_upload_bytes: config.server.max_upload_bytes,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
