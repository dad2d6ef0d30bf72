//! Model source resolution and device selection for Candle classifiers

use candle_core::Device;
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::{Deserialize, Serialize};
use sofra_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Hugging Face repository of the Turkish food recognizer
pub const DEFAULT_MODEL_ID: &str = "Enesb06/turk-yemek-tanima-v1";

/// Revision fetched when none is configured
pub const DEFAULT_REVISION: &str = "main";

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "model.safetensors";
const PREPROCESSOR_FILE: &str = "preprocessor_config.json";

/// Configuration for loading an image classification model
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Where the model artifacts come from
    #[serde(default)]
    pub source: ModelSource,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceType,
}

impl ModelConfig {
    /// Create a new model configuration from a local model directory
    pub fn from_local(path: impl Into<PathBuf>) -> Self {
        Self {
            source: ModelSource::Local { path: path.into() },
            ..Default::default()
        }
    }

    /// Create a new model configuration from Hugging Face
    pub fn from_hf(repo: impl Into<String>) -> Self {
        Self {
            source: ModelSource::HuggingFace {
                repo: repo.into(),
                revision: DEFAULT_REVISION.to_string(),
            },
            ..Default::default()
        }
    }

    /// Set device
    pub fn with_device(mut self, device: DeviceType) -> Self {
        self.device = device;
        self
    }

    /// Set Hugging Face revision
    pub fn with_revision(mut self, rev: impl Into<String>) -> Self {
        if let ModelSource::HuggingFace { revision, .. } = &mut self.source {
            *revision = rev.into();
        }
        self
    }

    /// Short identifier for logs
    pub fn describe(&self) -> String {
        match &self.source {
            ModelSource::Local { path } => path.display().to_string(),
            ModelSource::HuggingFace { repo, revision } => format!("{repo}@{revision}"),
        }
    }
}

/// Source location for model artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ModelSource {
    /// Directory on the local file system
    Local { path: PathBuf },

    /// Download from Hugging Face Hub
    HuggingFace {
        repo: String,
        #[serde(default = "default_revision")]
        revision: String,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        Self::HuggingFace {
            repo: DEFAULT_MODEL_ID.to_string(),
            revision: default_revision(),
        }
    }
}

fn default_revision() -> String {
    DEFAULT_REVISION.to_string()
}

/// Device type for inference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    /// CPU inference (always available)
    #[default]
    Cpu,
    /// CUDA GPU inference (if compiled in)
    Cuda { index: usize },
    /// Metal (Apple Silicon)
    Metal { index: usize },
}

impl DeviceType {
    /// Create the Candle device
    pub fn create(self) -> Result<Device> {
        match self {
            Self::Cpu => Ok(Device::Cpu),
            Self::Cuda { index } => Device::new_cuda(index)
                .map_err(|e| Error::model_load(format!("Failed to create CUDA device: {e}"))),
            Self::Metal { index } => Device::new_metal(index)
                .map_err(|e| Error::model_load(format!("Failed to create Metal device: {e}"))),
        }
    }
}

/// Resolved on-disk model artifacts
#[derive(Debug, Clone)]
pub struct ModelFiles {
    /// `config.json` with architecture and `id2label`
    pub config: PathBuf,

    /// SafeTensors weights
    pub weights: PathBuf,

    /// Optional image processor settings
    pub preprocessor: Option<PathBuf>,
}

impl ModelFiles {
    /// Locate (and download if needed) the artifacts for a source
    pub fn resolve(source: &ModelSource) -> Result<Self> {
        match source {
            ModelSource::Local { path } => Self::from_dir(path),
            ModelSource::HuggingFace { repo, revision } => Self::from_hub(repo, revision),
        }
    }

    fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::model_load(format!(
                "Model directory not found: {}",
                dir.display()
            )));
        }

        let require = |name: &str| -> Result<PathBuf> {
            let path = dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(Error::model_load(format!(
                    "Missing {} in {}",
                    name,
                    dir.display()
                )))
            }
        };

        let preprocessor = dir.join(PREPROCESSOR_FILE);
        Ok(Self {
            config: require(CONFIG_FILE)?,
            weights: require(WEIGHTS_FILE)?,
            preprocessor: preprocessor.is_file().then_some(preprocessor),
        })
    }

    fn from_hub(repo_id: &str, revision: &str) -> Result<Self> {
        info!("Fetching model from Hugging Face: {} @ {}", repo_id, revision);

        let api = Api::new()
            .map_err(|e| Error::model_load(format!("Failed to initialize HF API: {e}")))?;

        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let fetch = |name: &str| -> Result<PathBuf> {
            debug!("Downloading {}", name);
            repo.get(name).map_err(|e| {
                Error::model_load(format!("Failed to download {name} from {repo_id}: {e}"))
            })
        };

        let config = fetch(CONFIG_FILE)?;
        let weights = fetch(WEIGHTS_FILE)?;
        let preprocessor = match repo.get(PREPROCESSOR_FILE) {
            Ok(path) => Some(path),
            Err(e) => {
                debug!("No {} in {}: {}", PREPROCESSOR_FILE, repo_id, e);
                None
            }
        };

        Ok(Self {
            config,
            weights,
            preprocessor,
        })
    }
}
