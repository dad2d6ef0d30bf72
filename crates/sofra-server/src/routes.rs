//! HTTP routes and handlers

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use sofra_core::{PredictionResult, StatusResponse};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::GatewayError;
use crate::gateway::ImageUpload;
use crate::state::AppState;
use crate::telemetry;

/// Multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(status))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/predict", post(predict))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API status and model availability
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    telemetry::record_request("status");
    Json(state.gateway.status_response())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

/// Predict the dish in an uploaded photo
async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResult>, GatewayError> {
    telemetry::record_request("predict");

    let result = run_prediction(&state, multipart).await;
    match &result {
        Ok(_) => telemetry::record_prediction("ok"),
        Err(e) => telemetry::record_prediction(e.outcome()),
    }

    result.map(Json)
}

async fn run_prediction(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<PredictionResult, GatewayError> {
    // Readiness first: an unavailable model wins over any payload problem
    state.gateway.ensure_ready()?;

    let multipart = multipart.map_err(|e| {
        warn!("Rejecting non-multipart prediction request: {}", e);
        GatewayError::InvalidInput(format!("expected a multipart/form-data body ({e})"))
    })?;

    let upload = read_upload(multipart, state.max_upload_bytes).await?;
    state.gateway.predict(upload).await
}

/// Pull the `file` field out of the multipart body
async fn read_upload(mut multipart: Multipart, limit: usize) -> Result<ImageUpload, GatewayError> {
    let malformed = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!("Upload rejected: body exceeds {} bytes", limit);
            return GatewayError::PayloadTooLarge(limit);
        }
        warn!("Malformed multipart body: {}", e);
        GatewayError::InvalidInput(format!("malformed multipart body ({e})"))
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(malformed)?;

        return Ok(ImageUpload {
            bytes,
            content_type,
            file_name,
        });
    }

    Err(GatewayError::InvalidInput(format!(
        "missing '{UPLOAD_FIELD}' field"
    )))
}

async fn fallback() -> GatewayError {
    GatewayError::NotFound
}
