//! Request-time errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failure of a single request
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Classifier handle is not `Ready`
    #[error("model service is not available")]
    ServiceUnavailable,

    /// Client sent something that is not an image upload
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upload exceeds `server.max_upload_bytes`
    #[error("upload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),

    /// Decode or inference failed; the cause stays server-side
    #[error("processing failed: {0}")]
    Processing(#[source] sofra_core::Error),

    /// Unknown route
    #[error("not found")]
    NotFound,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Value of `error.type` in the response body
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "service_unavailable",
            Self::InvalidInput(_) | Self::PayloadTooLarge(_) => "invalid_request_error",
            Self::Processing(_) => "server_error",
            Self::NotFound => "not_found",
        }
    }

    /// Label for the `sofra_predictions_total` counter
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "unavailable",
            Self::InvalidInput(_) | Self::PayloadTooLarge(_) => "invalid_input",
            Self::Processing(_) | Self::NotFound => "processing_error",
        }
    }

    /// Message safe to show to callers
    pub fn public_message(&self) -> String {
        match self {
            Self::ServiceUnavailable => {
                "The model service is currently unavailable. Please check the server logs."
                    .to_string()
            }
            Self::InvalidInput(detail) => format!("Please upload a valid image file: {detail}"),
            Self::PayloadTooLarge(limit) => format!("Uploads are limited to {limit} bytes"),
            Self::Processing(_) => {
                "An unexpected error occurred while processing the image.".to_string()
            }
            Self::NotFound => "Not found".to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "message": self.public_message(),
                "type": self.error_type(),
            }
        });

        (self.status_code(), Json(body)).into_response()
    }
}
