//! Password strength analyzer - runs extraction, classification and overrides.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

use crate::classifier::{PredictError, predict};
use crate::denylist::{Denylist, DenylistError};
use crate::features::{FeatureExtractor, FeatureVector};
use crate::label::PredictionResult;
use crate::model::{ModelError, TrainedModel};
use crate::rules::OverrideRules;

/// Failure to build an [`Analyzer`]. The process must not serve analyses.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Model initialization failed: {0}")]
    Model(#[from] ModelError),
    #[error("Denylist initialization failed: {0}")]
    Denylist(#[from] DenylistError),
}

/// Immutable analysis context: the loaded model, the feature extractor
/// with its denylist and the optional override rules.
///
/// Cheap to clone; the model is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Analyzer {
    model: Arc<TrainedModel>,
    extractor: FeatureExtractor,
    rules: Option<OverrideRules>,
}

impl Analyzer {
    pub fn new(model: TrainedModel, denylist: Denylist) -> Self {
        Self::with_shared_model(Arc::new(model), denylist)
    }

    pub fn with_shared_model(model: Arc<TrainedModel>, denylist: Denylist) -> Self {
        Self {
            model,
            extractor: FeatureExtractor::new(denylist),
            rules: None,
        }
    }

    /// Enables the override rules.
    pub fn with_rules(mut self, rules: OverrideRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Builds an analyzer from `PWD_MODEL_PATH` and `PWD_DENYLIST_PATH`.
    ///
    /// # Errors
    ///
    /// Returns error if the model artifact or the configured denylist
    /// cannot be loaded. There is no fallback model.
    pub fn from_env() -> Result<Self, StartupError> {
        let model = TrainedModel::load()?;
        let denylist = Denylist::from_env()?;
        Ok(Self::new(model, denylist))
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }

    pub fn denylist(&self) -> &Denylist {
        self.extractor.denylist()
    }

    pub fn rules(&self) -> Option<&OverrideRules> {
        self.rules.as_ref()
    }

    pub fn extract(&self, password: &SecretString) -> FeatureVector {
        self.extractor.extract(password)
    }

    /// Classifies a password.
    ///
    /// # Returns
    /// The model's probabilities and the final label. When an override rule
    /// fires the label may differ from the most probable class.
    pub fn analyze(&self, password: &SecretString) -> Result<PredictionResult, PredictError> {
        let features = self.extractor.extract(password);
        let mut result = predict(&features, &self.model)?;

        if let Some(rules) = &self.rules {
            let (label, _rule) = rules.apply(password.expose_secret(), &features, result.label);
            #[cfg(feature = "tracing")]
            {
                if let Some(rule) = _rule {
                    tracing::debug!("Override {:?}: {} -> {}", rule, result.label, label);
                }
            }
            result.label = label;
        }

        Ok(result)
    }
}

/// Async version that sends the analysis result via channel.
#[cfg(feature = "async")]
pub async fn analyze_tx(
    analyzer: &Analyzer,
    password: &SecretString,
    tx: mpsc::Sender<Result<PredictionResult, PredictError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("analysis is about to start...");

    let result = analyzer.analyze(password);

    if let Err(_e) = tx.send(result).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password analysis result: {}", _e);
    }
}


#[cfg(all(test, feature = "async"))]
mod async_tests {
    use super::*;
    use crate::label::StrengthLabel;
    use std::path::Path;

    fn analyzer() -> Analyzer {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/model.json");
        Analyzer::new(TrainedModel::from_path(path).unwrap(), Denylist::default())
    }

    #[tokio::test]
    async fn test_analyze_tx() {
        let (tx, mut rx) = mpsc::channel(1);
        let pwd = SecretString::new("123456".to_string().into());

        analyze_tx(&analyzer(), &pwd, tx).await;

        let result = rx.recv().await.expect("Should receive analysis");
        assert_eq!(result.unwrap().label, StrengthLabel::VeryWeak);
    }

    #[tokio::test]
    async fn test_analyze_tx_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let pwd = SecretString::new("Tr0ub4dor&3xQ!".to_string().into());

        // must not panic when the receiver is gone
        analyze_tx(&analyzer(), &pwd, tx).await;
    }

    #[tokio::test]
    async fn test_analyzer_shared_across_tasks() {
        let analyzer = std::sync::Arc::new(analyzer());
        let (tx, mut rx) = mpsc::channel(4);

        for pwd in ["123456", "Tr0ub4dor&3xQ!"] {
            let analyzer = analyzer.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let pwd = SecretString::new(pwd.to_string().into());
                analyze_tx(&analyzer, &pwd, tx).await;
            });
        }
        drop(tx);

        let mut labels = Vec::new();
        while let Some(result) = rx.recv().await {
            labels.push(result.unwrap().label);
        }
        labels.sort();
        assert_eq!(labels, vec![StrengthLabel::VeryWeak, StrengthLabel::Strong]);
    }
}
