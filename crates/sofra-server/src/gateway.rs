//! Inference gateway
//!
//! Adapts uploads to the shared classifier: readiness check, declared
//! content-type check, decode, classify, then normalize the top candidate.

use bytes::Bytes;
use sofra_classifiers::{
    decode_image, normalize_label, round_score, ClassificationResult, ClassifierHandle,
    SharedClassifier,
};
use sofra_core::{Error, ModelStatus, PredictionResult, StatusResponse};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::error::GatewayError;
use crate::telemetry;

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Raw payload
    pub bytes: Bytes,

    /// Client-declared media type; never verified against the bytes
    pub content_type: Option<String>,

    /// Original file name, for logs only
    pub file_name: Option<String>,
}

impl ImageUpload {
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.map(str::to_string),
            file_name: None,
        }
    }

    /// Whether the declared content-type is `image/*`
    pub fn declares_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false)
    }
}

/// Request-handling front of the process-wide classifier
pub struct InferenceGateway {
    handle: Arc<ClassifierHandle>,
    top_k: usize,
}

impl InferenceGateway {
    pub fn new(handle: Arc<ClassifierHandle>, top_k: usize) -> Self {
        Self { handle, top_k }
    }

    pub fn status(&self) -> ModelStatus {
        self.handle.status()
    }

    pub fn status_response(&self) -> StatusResponse {
        StatusResponse::for_status(self.status())
    }

    /// The classifier if the handle is `Ready`, otherwise service-unavailable
    pub fn ensure_ready(&self) -> Result<SharedClassifier, GatewayError> {
        self.handle.classifier().ok_or_else(|| {
            warn!(
                "Rejecting prediction: model status is {}",
                self.handle.status()
            );
            GatewayError::ServiceUnavailable
        })
    }

    /// Run the full prediction contract for one upload
    pub async fn predict(&self, upload: ImageUpload) -> Result<PredictionResult, GatewayError> {
        let classifier = self.ensure_ready()?;

        if !upload.declares_image() {
            warn!(
                "Rejecting upload {:?} with content-type {:?}",
                upload.file_name, upload.content_type
            );
            return Err(GatewayError::InvalidInput(format!(
                "expected an image/* content type, got {}",
                upload.content_type.as_deref().unwrap_or("none")
            )));
        }

        info!(
            "Running prediction on {:?} ({} bytes)",
            upload.file_name,
            upload.bytes.len()
        );

        let start = Instant::now();
        let candidates = self
            .classify(classifier, upload.bytes)
            .await
            .map_err(|e| {
                error!("Prediction failed: {}", e);
                GatewayError::Processing(e)
            })?;
        let latency = start.elapsed();
        telemetry::record_inference_latency(latency);
        debug!("Prediction candidates: {:?}", candidates);

        let top = candidates.into_iter().next().ok_or_else(|| {
            error!("Classifier returned no candidates");
            GatewayError::Processing(Error::inference("classifier returned no candidates"))
        })?;

        let result = PredictionResult {
            food_name: normalize_label(&top.label),
            score: round_score(top.score),
        };
        info!(
            "Predicted '{}' with score {} in {}ms",
            result.food_name,
            result.score,
            latency.as_millis()
        );

        Ok(result)
    }

    /// Decode and classify on the blocking pool
    async fn classify(
        &self,
        classifier: SharedClassifier,
        bytes: Bytes,
    ) -> sofra_core::Result<Vec<ClassificationResult>> {
        let top_k = self.top_k;

        tokio::task::spawn_blocking(move || {
            let image = decode_image(&bytes)?;
            classifier.classify(&image, top_k)
        })
        .await
        .map_err(|e| Error::internal(format!("inference worker failed: {e}")))?
    }
}
