//! Trained model artifact
//!
//! Loads and validates the multinomial logistic regression parameters
//! produced by the offline trainer.
//!
//! Artifact layout (JSON):
//!
//! ```json
//! {
//!   "version": 1,
//!   "feature_names": ["length", "upper", "..."],
//!   "classes": ["very_weak", "weak", "strong"],
//!   "weights": [[...], [...], [...]],
//!   "intercepts": [0.0, 0.0, 0.0],
//!   "scaler": { "mean": [...], "scale": [...] }
//! }
//! ```
//!
//! `weights` and `intercepts` are in `classes` order; `scaler` is optional.

use crate::features::FEATURE_NAMES;
use crate::label::StrengthLabel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Artifact format version understood by this crate.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read model file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },
    #[error("Model features {found:?} do not match extractor features {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Model classes must be each strength label exactly once, got {0:?}")]
    InvalidClasses(Vec<StrengthLabel>),
    #[error("{what} has length {found}, expected {expected}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        found: usize,
    },
    #[error("{0} contains a non-finite value")]
    NonFinite(String),
    #[error("Scaler scale[{index}] must be positive, got {value}")]
    InvalidScale { index: usize, value: f64 },
}

/// Per-feature standardization statistics captured at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Serialized form of a [`TrainedModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub feature_names: Vec<String>,
    pub classes: Vec<StrengthLabel>,
    pub weights: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
}

/// Validated, immutable classifier parameters.
///
/// Rows are stored in [`StrengthLabel::ALL`] order regardless of the class
/// order in the artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    weights: [Vec<f64>; StrengthLabel::COUNT],
    intercepts: [f64; StrengthLabel::COUNT],
    scaler: Option<Scaler>,
}

impl TrainedModel {
    /// Validates an artifact against the extractor's feature layout.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        if artifact.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                expected: MODEL_FORMAT_VERSION,
                found: artifact.version,
            });
        }

        if artifact.feature_names.iter().map(String::as_str).ne(FEATURE_NAMES) {
            return Err(ModelError::FeatureMismatch {
                expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                found: artifact.feature_names,
            });
        }
        let arity = FEATURE_NAMES.len();

        let mut sorted = artifact.classes.clone();
        sorted.sort();
        if sorted != StrengthLabel::ALL {
            return Err(ModelError::InvalidClasses(artifact.classes));
        }

        check_len("weights", StrengthLabel::COUNT, artifact.weights.len())?;
        check_len("intercepts", StrengthLabel::COUNT, artifact.intercepts.len())?;
        for (class, row) in artifact.classes.iter().zip(&artifact.weights) {
            check_len(&format!("weights[{class}]"), arity, row.len())?;
            check_finite(&format!("weights[{class}]"), row)?;
        }
        check_finite("intercepts", &artifact.intercepts)?;

        if let Some(scaler) = &artifact.scaler {
            check_len("scaler.mean", arity, scaler.mean.len())?;
            check_len("scaler.scale", arity, scaler.scale.len())?;
            check_finite("scaler.mean", &scaler.mean)?;
            check_finite("scaler.scale", &scaler.scale)?;
            if let Some((index, &value)) =
                scaler.scale.iter().enumerate().find(|(_, s)| **s <= 0.0)
            {
                return Err(ModelError::InvalidScale { index, value });
            }
        }

        let mut weights: [Vec<f64>; StrengthLabel::COUNT] = Default::default();
        let mut intercepts = [0.0; StrengthLabel::COUNT];
        for ((class, row), bias) in artifact
            .classes
            .iter()
            .zip(artifact.weights)
            .zip(artifact.intercepts)
        {
            weights[class.index()] = row;
            intercepts[class.index()] = bias;
        }

        Ok(Self {
            weights,
            intercepts,
            scaler: artifact.scaler,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        Self::from_artifact(artifact)
    }

    /// Loads and validates a model artifact file.
    ///
    /// # Errors
    ///
    /// Any failure is fatal: there is no fallback model.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Model load FAILED: FileNotFound {:?}", path);
            return Err(ModelError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let model = Self::from_json(&content);

        #[cfg(feature = "tracing")]
        {
            match &model {
                Ok(m) => tracing::info!(
                    "Model loaded: {} features, scaler={} from {:?}",
                    m.arity(),
                    m.scaler.is_some(),
                    path
                ),
                Err(e) => tracing::error!("Model load FAILED: {} ({:?})", e, path),
            }
        }

        model
    }

    /// Loads the model named by `PWD_MODEL_PATH` (default
    /// `./assets/model.json`).
    pub fn load() -> Result<Self, ModelError> {
        Self::from_path(model_path())
    }

    /// Number of features the model was fitted on.
    pub fn arity(&self) -> usize {
        self.weights[0].len()
    }

    pub fn weights(&self, label: StrengthLabel) -> &[f64] {
        &self.weights[label.index()]
    }

    pub fn intercept(&self, label: StrengthLabel) -> f64 {
        self.intercepts[label.index()]
    }

    pub fn scaler(&self) -> Option<&Scaler> {
        self.scaler.as_ref()
    }

    /// Serializable form, classes in [`StrengthLabel::ALL`] order.
    pub fn to_artifact(&self) -> ModelArtifact {
        ModelArtifact {
            version: MODEL_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: StrengthLabel::ALL.to_vec(),
            weights: self.weights.to_vec(),
            intercepts: self.intercepts.to_vec(),
            scaler: self.scaler.clone(),
        }
    }
}

/// Returns the model artifact path.
///
/// Priority:
/// 1. Environment variable `PWD_MODEL_PATH`
/// 2. Default path `./assets/model.json`
pub fn model_path() -> PathBuf {
    std::env::var_os("PWD_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./assets/model.json"))
}

fn check_len(what: &str, expected: usize, found: usize) -> Result<(), ModelError> {
    if expected != found {
        return Err(ModelError::ShapeMismatch {
            what: what.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn check_finite(what: &str, values: &[f64]) -> Result<(), ModelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ModelError::NonFinite(what.to_string()))
    }
}
