//! Vision Transformer classifier loaded from Hugging Face artifacts

use crate::classifier::{rank_scores, ClassificationResult, ImageClassifier};
use crate::model_loader::{ModelConfig, ModelFiles};
use crate::preprocess::PreprocessConfig;
use candle_core::{DType, Device, D};
use candle_nn::VarBuilder;
use candle_transformers::models::vit;
use image::DynamicImage;
use serde::Deserialize;
use sofra_core::{Error, Result};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

/// Fields of `config.json` needed before building the network
#[derive(Debug, Deserialize)]
struct ArchitectureHeader {
    model_type: String,

    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// ViT image classifier running on Candle
pub struct VitClassifier {
    name: String,
    model: vit::Model,
    device: Device,
    labels: Vec<String>,
    preprocess: PreprocessConfig,
}

impl VitClassifier {
    /// Fetch artifacts and build the network. Blocking.
    pub fn load(config: &ModelConfig) -> Result<Self> {
        let name = config.describe();
        let files = ModelFiles::resolve(&config.source)?;
        let device = config.device.create()?;

        let raw_config = std::fs::read_to_string(&files.config).map_err(|e| {
            Error::model_load(format!("Failed to read {}: {e}", files.config.display()))
        })?;
        let header: ArchitectureHeader = serde_json::from_str(&raw_config)
            .map_err(|e| Error::model_load(format!("Failed to parse model config: {e}")))?;

        if header.model_type != "vit" {
            return Err(Error::model_load(format!(
                "Unsupported architecture '{}', expected 'vit'",
                header.model_type
            )));
        }

        let labels = labels_from_id2label(&header.id2label)?;
        let vit_config: vit::Config = serde_json::from_str(&raw_config)
            .map_err(|e| Error::model_load(format!("Failed to parse ViT config: {e}")))?;

        let preprocess = match &files.preprocessor {
            Some(path) => PreprocessConfig::from_file(path).map_err(|e| {
                Error::model_load(format!("Failed to parse image processor config: {e}"))
            })?,
            None => PreprocessConfig::default(),
        };

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)
                .map_err(|e| Error::model_load(format!("Failed to load weights: {e}")))?
        };

        let model = vit::Model::new(&vit_config, labels.len(), vb)
            .map_err(|e| Error::model_load(format!("Failed to build ViT model: {e}")))?;

        info!(
            "Loaded ViT classifier '{}' with {} labels on {:?}",
            name,
            labels.len(),
            device
        );

        Ok(Self {
            name,
            model,
            device,
            labels,
            preprocess,
        })
    }

    fn probabilities(&self, image: &DynamicImage) -> candle_core::Result<Vec<f32>> {
        let input = self.preprocess.to_tensor(image, &self.device)?;
        let logits = self.model.forward(&input)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()
    }
}

impl ImageClassifier for VitClassifier {
    fn classify(&self, image: &DynamicImage, top_k: usize) -> Result<Vec<ClassificationResult>> {
        let start = Instant::now();

        let probs = self
            .probabilities(image)
            .map_err(|e| Error::inference(format!("ViT forward pass failed: {e}")))?;
        let ranked = rank_scores(&probs, &self.labels, top_k);

        debug!(
            "Classified image in {}us: {:?}",
            start.elapsed().as_micros(),
            ranked
        );
        Ok(ranked)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Order `id2label` entries by numeric class id.
///
/// Ids must be exactly `0..n`; a gap would silently misalign labels.
pub fn labels_from_id2label(id2label: &HashMap<String, String>) -> Result<Vec<String>> {
    if id2label.is_empty() {
        return Err(Error::model_load("Model config has no id2label mapping"));
    }

    let mut entries = id2label
        .iter()
        .map(|(id, label)| {
            id.parse::<usize>()
                .map(|id| (id, label.clone()))
                .map_err(|_| Error::model_load(format!("Invalid class id '{id}' in id2label")))
        })
        .collect::<Result<Vec<_>>>()?;
    entries.sort_by_key(|(id, _)| *id);

    for (expected, (id, _)) in entries.iter().enumerate() {
        if *id != expected {
            return Err(Error::model_load(format!(
                "id2label is not contiguous: missing class id {expected}"
            )));
        }
    }

    Ok(entries.into_iter().map(|(_, label)| label).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_loader::ModelConfig;

    fn id2label(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_labels_sorted_numerically() {
        let map = id2label(&[
            ("10", "lahmacun"),
            ("2", "baklava"),
            ("0", "adana_kebap"),
            ("1", "ayran"),
            ("3", "borek"),
            ("4", "cig_kofte"),
            ("5", "doner"),
            ("6", "dolma"),
            ("7", "hunkar_begendi"),
            ("8", "iskender_kebap"),
            ("9", "kuru_fasulye"),
        ]);
        let labels = labels_from_id2label(&map).unwrap();
        assert_eq!(labels.len(), 11);
        assert_eq!(labels[0], "adana_kebap");
        assert_eq!(labels[2], "baklava");
        assert_eq!(labels[10], "lahmacun");
    }

    #[test]
    fn test_labels_reject_gaps() {
        let map = id2label(&[("0", "manti"), ("2", "pide")]);
        assert!(labels_from_id2label(&map).is_err());
    }

    #[test]
    fn test_labels_reject_non_numeric_ids() {
        let map = id2label(&[("zero", "manti")]);
        assert!(labels_from_id2label(&map).is_err());
    }

    #[test]
    fn test_labels_reject_empty() {
        assert!(labels_from_id2label(&HashMap::new()).is_err());
    }

    #[test]
    fn test_load_rejects_non_vit_architecture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"model_type": "resnet", "id2label": {"0": "pilav"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("model.safetensors"), b"").unwrap();

        let err = VitClassifier::load(&ModelConfig::from_local(dir.path()))
            .err()
            .expect("resnet config must be rejected");
        assert!(err.to_string().contains("resnet"));
    }

    #[test]
    fn test_load_rejects_corrupt_weights() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{
                "model_type": "vit",
                "hidden_size": 8,
                "num_hidden_layers": 1,
                "num_attention_heads": 2,
                "intermediate_size": 16,
                "hidden_act": "gelu",
                "layer_norm_eps": 1e-12,
                "image_size": 32,
                "patch_size": 16,
                "num_channels": 3,
                "qkv_bias": true,
                "id2label": {"0": "pilav", "1": "sutlac"}
            }"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("model.safetensors"), b"not safetensors").unwrap();

        let err = VitClassifier::load(&ModelConfig::from_local(dir.path()))
            .err()
            .expect("garbage weights must be rejected");
        assert!(matches!(err, Error::ModelLoad(_)));
    }
}
