//! Core types for Sofra

use serde::{Deserialize, Serialize};
use std::fmt;

/// Welcome line returned by the status endpoint
pub const WELCOME_MESSAGE: &str = "Welcome to the Turkish Food Recognition API!";

/// Lifecycle state of the process-wide classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    /// Construction not yet attempted or still in progress
    Unset,
    /// Classifier is loaded and usable
    Ready,
    /// Construction failed; terminal for the process lifetime
    Failed,
}

impl ModelStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Human-readable availability line for the status endpoint
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Ready => "ready and running",
            Self::Unset | Self::Failed => "model failed to load, check logs",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub model_status: String,
}

impl StatusResponse {
    /// Build the status payload for the given handle state
    pub fn for_status(status: ModelStatus) -> Self {
        Self {
            message: WELCOME_MESSAGE.to_string(),
            model_status: status.describe().to_string(),
        }
    }
}

/// Body of a successful `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Normalized, title-cased dish name
    pub food_name: String,

    /// Confidence rounded to 4 decimal places (0.0-1.0)
    pub score: f64,
}
