//! Strength labels, their display colors and the prediction result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Ordinal strength tier: `VeryWeak < Weak < Strong`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Strong,
}

impl StrengthLabel {
    /// All labels, weakest first. This is also the tie-break priority.
    pub const ALL: [StrengthLabel; 3] = [Self::VeryWeak, Self::Weak, Self::Strong];

    /// Number of classes.
    pub const COUNT: usize = Self::ALL.len();

    /// Position in [`StrengthLabel::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::VeryWeak => 0,
            Self::Weak => 1,
            Self::Strong => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryWeak => "very_weak",
            Self::Weak => "weak",
            Self::Strong => "strong",
        }
    }

    pub fn color(self) -> DisplayColor {
        match self {
            Self::VeryWeak => DisplayColor::Red,
            Self::Weak => DisplayColor::Orange,
            Self::Strong => DisplayColor::Green,
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown strength label: {0}")]
pub struct ParseLabelError(pub String);

impl FromStr for StrengthLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| ParseLabelError(s.to_string()))
    }
}

/// Color cue shown next to a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayColor {
    Red,
    Orange,
    Green,
}

impl DisplayColor {
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Green => "green",
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#ff6b6b",
            Self::Orange => "#ffa94d",
            Self::Green => "#6bcf7f",
        }
    }

    /// 256-color ANSI foreground escape.
    pub fn ansi(self) -> &'static str {
        match self {
            Self::Red => "\x1b[38;5;203m",
            Self::Orange => "\x1b[38;5;215m",
            Self::Green => "\x1b[38;5;114m",
        }
    }
}

/// Output of one classification.
///
/// `probabilities` is indexed by [`StrengthLabel::index`] and sums to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub label: StrengthLabel,
    pub probabilities: [f64; StrengthLabel::COUNT],
}

impl PredictionResult {
    pub fn probability(&self, label: StrengthLabel) -> f64 {
        self.probabilities[label.index()]
    }

    /// Probability of the reported label.
    pub fn confidence(&self) -> f64 {
        self.probability(self.label)
    }

    /// `(label, probability)` pairs, weakest first.
    pub fn iter(&self) -> impl Iterator<Item = (StrengthLabel, f64)> + '_ {
        StrengthLabel::ALL
            .into_iter()
            .map(|label| (label, self.probability(label)))
    }
}
