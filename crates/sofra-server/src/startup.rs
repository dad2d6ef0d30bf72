//! One-shot classifier initialization

use sofra_classifiers::{ClassifierHandle, ModelConfig, SharedClassifier, VitClassifier};
use sofra_core::{Error, ModelStatus, Result};
use std::sync::Arc;
use tracing::{error, info};

/// Run `load` once on the blocking pool and record the result in `handle`.
///
/// Never fails: a load error or a panicking loader leaves the handle
/// `Failed` and the server keeps starting in degraded mode.
pub async fn initialize_classifier<F>(handle: Arc<ClassifierHandle>, load: F) -> ModelStatus
where
    F: FnOnce() -> Result<SharedClassifier> + Send + 'static,
{
    let worker_handle = Arc::clone(&handle);
    let status = match tokio::task::spawn_blocking(move || worker_handle.initialize(load)).await {
        Ok(status) => status,
        Err(e) => {
            error!("Model loader task aborted: {}", e);
            handle.initialize(|| Err(Error::internal(format!("model loader aborted: {e}"))))
        }
    };

    crate::telemetry::record_model_status(status);
    status
}

/// Load the configured ViT model into `handle`
pub async fn load_model(handle: Arc<ClassifierHandle>, config: &ModelConfig) -> ModelStatus {
    let config = config.clone();
    info!("Loading model '{}'...", config.describe());

    initialize_classifier(handle, move || {
        let classifier = VitClassifier::load(&config)?;
        Ok(Arc::new(classifier) as SharedClassifier)
    })
    .await
}
