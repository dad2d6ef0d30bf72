//! Sofra Server
//!
//! HTTP gateway exposing the Turkish food recognition model.
//!
//! - `GET /` reports whether the model loaded
//! - `POST /predict` classifies an uploaded photo
//! - `GET /health` and `GET /metrics` for operations
//!
//! The model is loaded once at startup. A failed load is logged and the
//! server keeps running, answering predictions with 503.

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod startup;
pub mod state;
pub mod telemetry;

pub use cli::Cli;
pub use config::ServiceConfig;
pub use error::GatewayError;
pub use gateway::{ImageUpload, InferenceGateway};
pub use routes::create_router;
pub use state::AppState;
