//! Strength classifier - multinomial logistic regression inference.

use crate::features::FeatureVector;
use crate::label::{PredictionResult, StrengthLabel};
use crate::model::TrainedModel;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredictError {
    /// The model and the extractor disagree on the feature layout.
    /// Load-time validation should make this unreachable.
    #[error("Feature arity mismatch: model expects {expected}, got {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Classifies a feature vector with a loaded model.
///
/// Standardizes with the model's scaler (if any), scores each class
/// linearly, applies softmax and returns the most probable label.
/// Equal maxima resolve to the weaker label.
pub fn predict(
    features: &FeatureVector,
    model: &TrainedModel,
) -> Result<PredictionResult, PredictError> {
    predict_values(&features.to_array(), model)
}

pub(crate) fn predict_values(
    values: &[f64],
    model: &TrainedModel,
) -> Result<PredictionResult, PredictError> {
    if values.len() != model.arity() {
        #[cfg(feature = "tracing")]
        tracing::error!(
            "Feature arity mismatch: model expects {}, got {}",
            model.arity(),
            values.len()
        );
        return Err(PredictError::ArityMismatch {
            expected: model.arity(),
            found: values.len(),
        });
    }

    let x: Vec<f64> = match model.scaler() {
        Some(scaler) => values
            .iter()
            .zip(scaler.mean.iter().zip(&scaler.scale))
            .map(|(v, (mean, scale))| (v - mean) / scale)
            .collect(),
        None => values.to_vec(),
    };

    let mut logits = [0.0; StrengthLabel::COUNT];
    for label in StrengthLabel::ALL {
        logits[label.index()] = dot(model.weights(label), &x) + model.intercept(label);
    }
    let probabilities = softmax(logits);

    Ok(PredictionResult {
        label: argmax(&probabilities),
        probabilities,
    })
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Numerically stable softmax: the max logit is subtracted before
/// exponentiating so the largest term is exactly `exp(0) = 1`.
pub fn softmax<const N: usize>(logits: [f64; N]) -> [f64; N] {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps = logits.map(|z| (z - max).exp());
    let sum: f64 = exps.iter().sum();
    exps.map(|e| e / sum)
}

/// Most probable label; scans weakest first and only replaces on a
/// strictly greater probability.
fn argmax(probabilities: &[f64; StrengthLabel::COUNT]) -> StrengthLabel {
    let mut best = StrengthLabel::VeryWeak;
    for label in StrengthLabel::ALL {
        if probabilities[label.index()] > probabilities[best.index()] {
            best = label;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denylist::Denylist;
    use crate::features::{FEATURE_COUNT, extract};
    use crate::model::tests::artifact;
    use crate::model::{ModelArtifact, TrainedModel};
    use proptest::prelude::*;
    use secrecy::SecretString;

    fn model_from(artifact: ModelArtifact) -> TrainedModel {
        TrainedModel::from_artifact(artifact).expect("valid artifact")
    }

    fn reference_model() -> TrainedModel {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/model.json");
        TrainedModel::from_path(path).expect("reference artifact")
    }

    fn assert_distribution(result: &PredictionResult) {
        let sum: f64 = result.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6, "sum = {sum}");
        for p in result.probabilities {
            assert!((0.0..=1.0).contains(&p), "p = {p}");
        }
    }

    #[test]
    fn test_softmax_uniform() {
        let p = softmax([2.0, 2.0, 2.0]);
        for v in p {
            assert!((v - 1.0 / 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_softmax_does_not_overflow() {
        let p = softmax([1000.0, 999.0, -1000.0]);
        assert!(p.iter().all(|v| v.is_finite()));
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(p[0] > p[1] && p[1] > p[2]);
    }

    #[test]
    fn test_argmax_tie_prefers_weaker_label() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), StrengthLabel::VeryWeak);
        assert_eq!(argmax(&[0.1, 0.45, 0.45]), StrengthLabel::Weak);
        assert_eq!(argmax(&[1.0 / 3.0; 3]), StrengthLabel::VeryWeak);
        assert_eq!(argmax(&[0.1, 0.2, 0.7]), StrengthLabel::Strong);
    }

    #[test]
    fn test_all_zero_model_ties_to_very_weak() {
        let mut a = artifact();
        a.weights = vec![vec![0.0; FEATURE_COUNT]; 3];
        a.intercepts = vec![0.0; 3];
        let model = model_from(a);
        let result = predict_values(&[3.0; FEATURE_COUNT], &model).unwrap();
        assert_eq!(result.label, StrengthLabel::VeryWeak);
        assert_distribution(&result);
    }

    #[test]
    fn test_scaler_is_applied() {
        let mut a = artifact();
        a.weights = vec![
            vec![0.0; FEATURE_COUNT],
            vec![0.0; FEATURE_COUNT],
            {
                let mut row = vec![0.0; FEATURE_COUNT];
                row[0] = 1.0;
                row
            },
        ];
        a.intercepts = vec![0.0; 3];
        if let Some(s) = a.scaler.as_mut() {
            s.mean[0] = 10.0;
            s.scale[0] = 2.0;
        }
        let model = model_from(a);

        // length 10 standardizes to 0, every logit is 0
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 10.0;
        let result = predict_values(&values, &model).unwrap();
        assert!((result.probability(StrengthLabel::Strong) - 1.0 / 3.0).abs() < 1e-12);

        // length 14 standardizes to 2
        values[0] = 14.0;
        let result = predict_values(&values, &model).unwrap();
        let e2 = 2.0f64.exp();
        assert!((result.probability(StrengthLabel::Strong) - e2 / (e2 + 2.0)).abs() < 1e-12);
        assert_eq!(result.label, StrengthLabel::Strong);
    }

    #[test]
    fn test_arity_mismatch_is_reported() {
        let model = model_from(artifact());
        assert_eq!(
            predict_values(&[1.0; 4], &model),
            Err(PredictError::ArityMismatch { expected: FEATURE_COUNT, found: 4 })
        );
    }

    #[test]
    fn test_reference_model_end_to_end() {
        let model = reference_model();
        let denylist = Denylist::default();
        let classify = |pwd: &str| {
            let features = extract(&SecretString::new(pwd.to_string().into()), &denylist);
            predict(&features, &model).unwrap()
        };

        let weak = classify("123456");
        assert_eq!(weak.label, StrengthLabel::VeryWeak);
        assert_distribution(&weak);

        let strong = classify("Tr0ub4dor&3xQ!");
        assert_eq!(strong.label, StrengthLabel::Strong);
        assert_distribution(&strong);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let model = reference_model();
        let features = extract(
            &SecretString::new("Monkey12!".to_string().into()),
            &Denylist::default(),
        );
        assert_eq!(predict(&features, &model), predict(&features, &model));
    }

    proptest! {
        #[test]
        fn predict_yields_a_distribution(pwd in any::<String>()) {
            let model = reference_model();
            let features = crate::features::extract_str(&pwd, &Denylist::default());
            let result = predict(&features, &model).unwrap();
            let sum: f64 = result.probabilities.iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-6);
            prop_assert!(result.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
            prop_assert_eq!(result.confidence(), result.probabilities.iter().copied().fold(0.0, f64::max));
        }

        #[test]
        fn softmax_sums_to_one(logits in proptest::array::uniform3(-500.0f64..500.0)) {
            let p = softmax(logits);
            prop_assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }
}
