//! Policy overrides layered on top of the model label.
//!
//! Short passwords and exact common passwords are pinned to `VeryWeak`
//! before the model label is consulted; a password meeting the strong
//! policy is pinned to `Strong` after it. Probabilities are left untouched.

use crate::features::FeatureVector;
use crate::label::StrengthLabel;

/// Which override fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRule {
    TooShort,
    ExactCommon,
    StrongPolicy,
}

/// Composition that is always rated strong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrongPolicy {
    pub min_length: usize,
    pub min_digits: usize,
    pub min_special: usize,
    pub min_upper: usize,
    pub min_lower: usize,
}

impl Default for StrongPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_digits: 2,
            min_special: 1,
            min_upper: 1,
            min_lower: 1,
        }
    }
}

impl StrongPolicy {
    pub fn is_met(&self, f: &FeatureVector) -> bool {
        f.length >= self.min_length
            && f.digits >= self.min_digits
            && f.special >= self.min_special
            && f.upper >= self.min_upper
            && f.lower >= self.min_lower
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRules {
    /// Shorter passwords are always `VeryWeak`.
    pub min_length: usize,
    /// Exact (case-insensitive) matches are always `VeryWeak`.
    pub exact_weak: Vec<String>,
    /// `None` disables the strong override.
    pub strong_policy: Option<StrongPolicy>,
}

impl Default for OverrideRules {
    fn default() -> Self {
        Self {
            min_length: 6,
            exact_weak: ["password", "12345", "qwerty", "abc123"]
                .map(String::from)
                .to_vec(),
            strong_policy: Some(StrongPolicy::default()),
        }
    }
}

impl OverrideRules {
    /// Checks run before the model label is considered.
    pub fn pre_check(&self, password: &str, features: &FeatureVector) -> Option<OverrideRule> {
        if features.length < self.min_length {
            return Some(OverrideRule::TooShort);
        }
        let lowered = password.to_lowercase();
        if self.exact_weak.iter().any(|w| w.to_lowercase() == lowered) {
            return Some(OverrideRule::ExactCommon);
        }
        None
    }

    /// Checks run after the model label is known.
    pub fn post_check(&self, features: &FeatureVector) -> Option<OverrideRule> {
        match &self.strong_policy {
            Some(policy) if policy.is_met(features) => Some(OverrideRule::StrongPolicy),
            _ => None,
        }
    }

    /// Final label for `model_label`, plus the rule that changed it, if any.
    pub fn apply(
        &self,
        password: &str,
        features: &FeatureVector,
        model_label: StrengthLabel,
    ) -> (StrengthLabel, Option<OverrideRule>) {
        if let Some(rule) = self.pre_check(password, features) {
            return (StrengthLabel::VeryWeak, Some(rule));
        }
        if let Some(rule) = self.post_check(features) {
            return (StrengthLabel::Strong, Some(rule));
        }
        (model_label, None)
    }
}
