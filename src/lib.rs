//! Password strength classification library
//!
//! Extracts lexical features from a password and scores them with a
//! pre-trained multinomial logistic regression model, yielding one of
//! `very_weak`, `weak` or `strong` plus per-class probabilities.
//!
//! # Features
//!
//! - `async` (default): Enables delivery of analyses over a tokio channel
//! - `tracing`: Enables logging via tracing crate
//! - `cli`: Builds the `pwd-strength-ml` terminal front end
//!
//! # Environment Variables
//!
//! - `PWD_MODEL_PATH`: Path to the model artifact
//!   (default: `./assets/model.json`)
//! - `PWD_DENYLIST_PATH`: Optional denylist file, one token per line
//!   (default: built-in list)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_strength_ml::{Analyzer, StrengthLabel};
//! use secrecy::SecretString;
//!
//! // Load model and denylist (call once at startup)
//! let analyzer = Analyzer::from_env().expect("Failed to load model");
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! let result = analyzer.analyze(&password).expect("model/extractor mismatch");
//!
//! println!("Strength: {} ({})", result.label, result.label.color().name());
//! println!("Confidence: {:.2}", result.confidence());
//! ```

mod classifier;
mod denylist;
mod evaluator;
mod features;
mod label;
mod model;
mod rules;

// Public API
pub use classifier::{PredictError, predict, softmax};
pub use denylist::{DEFAULT_TOKENS, Denylist, DenylistError, denylist_path};
pub use evaluator::{Analyzer, StartupError};
pub use features::{
    CharClass, Composition, FEATURE_COUNT, FEATURE_NAMES, FeatureExtractor, FeatureVector,
    extract,
};
pub use label::{DisplayColor, ParseLabelError, PredictionResult, StrengthLabel};
pub use model::{MODEL_FORMAT_VERSION, ModelArtifact, ModelError, Scaler, TrainedModel, model_path};
pub use rules::{OverrideRule, OverrideRules, StrongPolicy};

#[cfg(feature = "async")]
pub use evaluator::analyze_tx;
