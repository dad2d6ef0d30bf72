//! Classifier trait and common types

use image::DynamicImage;
use sofra_core::Result;

/// Trait for all image classifiers
///
/// `classify` is blocking and CPU-bound; async callers are expected to run
/// it on the blocking thread pool.
pub trait ImageClassifier: Send + Sync {
    /// Classify the given image, returning at most `top_k` candidates
    /// ordered from most to least likely
    fn classify(&self, image: &DynamicImage, top_k: usize) -> Result<Vec<ClassificationResult>>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// A single ranked candidate
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Raw model label, e.g. `iskender_kebap`
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f32,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Pair per-class probabilities with their labels and keep the `top_k` best.
///
/// Classes without a label fall back to `LABEL_<index>`.
pub fn rank_scores(scores: &[f32], labels: &[String], top_k: usize) -> Vec<ClassificationResult> {
    let mut ranked: Vec<ClassificationResult> = scores
        .iter()
        .enumerate()
        .map(|(idx, &score)| {
            let label = labels
                .get(idx)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{idx}"));
            ClassificationResult { label, score }
        })
        .collect();

    // Stable sort keeps class order for ties
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(top_k.max(1));
    ranked
}
