//! Error types for Sofra

/// Result type alias using Sofra's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Sofra operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model could not be fetched, parsed or materialized
    #[error("model load error: {0}")]
    ModelLoad(String),

    /// Uploaded bytes are not a decodable image
    #[error("image decode error: {0}")]
    Decode(String),

    /// Forward pass or post-processing failed
    #[error("inference error: {0}")]
    Inference(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
