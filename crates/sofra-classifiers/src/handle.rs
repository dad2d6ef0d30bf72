//! Process-wide, initialize-once classifier handle
//!
//! The handle moves from `Unset` to either `Ready` or `Failed` exactly once.
//! `Failed` is terminal: there is no retry until the process restarts.
//! Readers never block on each other; the only write is the single
//! initialization.

use crate::classifier::ImageClassifier;
use sofra_core::{ModelStatus, Result};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};

/// Shared, thread-safe classifier reference
pub type SharedClassifier = Arc<dyn ImageClassifier>;

enum Slot {
    Ready(SharedClassifier),
    Failed(String),
}

/// Tri-state holder for the loaded classifier
pub struct ClassifierHandle {
    slot: OnceLock<Slot>,
}

impl ClassifierHandle {
    /// Create an `Unset` handle
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Create a handle that is already `Ready`
    pub fn ready(classifier: SharedClassifier) -> Self {
        let handle = Self::new();
        let _ = handle.slot.set(Slot::Ready(classifier));
        handle
    }

    /// Create a handle that is already `Failed`
    pub fn failed(reason: impl Into<String>) -> Self {
        let handle = Self::new();
        let _ = handle.slot.set(Slot::Failed(reason.into()));
        handle
    }

    /// Run `load` once and record the outcome.
    ///
    /// Errors are logged and swallowed: the handle ends up `Failed` and the
    /// caller keeps running. Later calls never invoke their loader and just
    /// report the recorded state.
    pub fn initialize<F>(&self, load: F) -> ModelStatus
    where
        F: FnOnce() -> Result<SharedClassifier>,
    {
        let mut attempted = false;

        let slot = self.slot.get_or_init(|| {
            attempted = true;
            match load() {
                Ok(classifier) => {
                    info!("Model loaded successfully: {}", classifier.name());
                    Slot::Ready(classifier)
                }
                Err(e) => {
                    error!("MODEL FAILED TO LOAD: {}", e);
                    error!(
                        "Check that the model identifier is spelled correctly and that the repository is public"
                    );
                    Slot::Failed(e.to_string())
                }
            }
        });

        if !attempted {
            warn!("Classifier already initialized; ignoring repeated load attempt");
        }

        slot.status()
    }

    /// Current lifecycle state
    pub fn status(&self) -> ModelStatus {
        self.slot
            .get()
            .map(Slot::status)
            .unwrap_or(ModelStatus::Unset)
    }

    /// The classifier, only when `Ready`
    pub fn classifier(&self) -> Option<SharedClassifier> {
        match self.slot.get() {
            Some(Slot::Ready(classifier)) => Some(Arc::clone(classifier)),
            _ => None,
        }
    }

    /// Load error message, only when `Failed`
    pub fn failure(&self) -> Option<&str> {
        match self.slot.get() {
            Some(Slot::Failed(reason)) => Some(reason),
            _ => None,
        }
    }
}

impl Slot {
    fn status(&self) -> ModelStatus {
        match self {
            Slot::Ready(_) => ModelStatus::Ready,
            Slot::Failed(_) => ModelStatus::Failed,
        }
    }
}

impl Default for ClassifierHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("status", &self.status())
            .field("failure", &self.failure())
            .finish()
    }
}
