//! Sofra Classifiers
//!
//! Image classifiers for Turkish food recognition.
//!
//! - `ImageClassifier` is the narrow seam the HTTP layer depends on
//! - `VitClassifier` runs a Hugging Face ViT checkpoint on Candle
//! - `ClassifierHandle` holds the single process-wide classifier and its
//!   `Unset`/`Ready`/`Failed` lifecycle
//!
//! Inference is pinned to the CPU unless configured otherwise.

pub mod classifier;
pub mod handle;
pub mod labels;
pub mod model_loader;
pub mod preprocess;
pub mod vit;

pub use classifier::{rank_scores, ClassificationResult, ImageClassifier};
pub use handle::{ClassifierHandle, SharedClassifier};
pub use labels::{normalize_label, round_score};
pub use model_loader::{
    DeviceType, ModelConfig, ModelFiles, ModelSource, DEFAULT_MODEL_ID, DEFAULT_REVISION,
};
pub use preprocess::{decode_image, ImageSize, PreprocessConfig};
pub use vit::VitClassifier;
