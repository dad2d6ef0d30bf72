//! Sofra Core
//!
//! Types and error handling shared by the Sofra food recognition crates.
//!
//! This crate provides:
//! - The core `Error` type and `Result` alias
//! - Wire types returned by the HTTP surface
//! - The `ModelStatus` lifecycle enum for the process-wide classifier

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ModelStatus, PredictionResult, StatusResponse, WELCOME_MESSAGE};
