//! Password feature extraction
//!
//! Each section computes one aspect of the password; [`extract`] assembles
//! them into a [`FeatureVector`] in the order recorded in [`FEATURE_NAMES`].
//! A model artifact must list exactly these names in exactly this order.

mod composition;
mod pattern;

pub use composition::{CharClass, Composition, composition_section};
pub use pattern::common_pattern_section;

use crate::denylist::Denylist;
use secrecy::{ExposeSecret, SecretString};

/// Number of features emitted per password.
pub const FEATURE_COUNT: usize = 10;

/// Feature names in emitted order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "length",
    "upper",
    "lower",
    "digits",
    "special",
    "digit_ratio",
    "special_ratio",
    "upper_ratio",
    "lower_ratio",
    "common_pattern",
];

/// Lexical features of one password.
///
/// Ephemeral: never persisted and never logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub length: usize,
    pub upper: usize,
    pub lower: usize,
    pub digits: usize,
    pub special: usize,
    pub digit_ratio: f64,
    pub special_ratio: f64,
    pub upper_ratio: f64,
    pub lower_ratio: f64,
    pub has_common_pattern: bool,
}

impl FeatureVector {
    /// Numeric encoding in [`FEATURE_NAMES`] order.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.length as f64,
            self.upper as f64,
            self.lower as f64,
            self.digits as f64,
            self.special as f64,
            self.digit_ratio,
            self.special_ratio,
            self.upper_ratio,
            self.lower_ratio,
            if self.has_common_pattern { 1.0 } else { 0.0 },
        ]
    }

    pub fn composition(&self) -> Composition {
        Composition {
            length: self.length,
            upper: self.upper,
            lower: self.lower,
            digits: self.digits,
            special: self.special,
        }
    }
}

/// Extracts the feature vector of `password` against `denylist`.
///
/// Total: never fails, the empty password yields the zero vector.
pub fn extract(password: &SecretString, denylist: &Denylist) -> FeatureVector {
    extract_str(password.expose_secret(), denylist)
}

pub(crate) fn extract_str(pwd: &str, denylist: &Denylist) -> FeatureVector {
    let c = composition_section(pwd);
    FeatureVector {
        length: c.length,
        upper: c.upper,
        lower: c.lower,
        digits: c.digits,
        special: c.special,
        digit_ratio: c.ratio(c.digits),
        special_ratio: c.ratio(c.special),
        upper_ratio: c.ratio(c.upper),
        lower_ratio: c.ratio(c.lower),
        has_common_pattern: common_pattern_section(pwd, denylist),
    }
}

/// Feature extractor bound to an injected denylist.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    denylist: Denylist,
}

impl FeatureExtractor {
    pub fn new(denylist: Denylist) -> Self {
        Self { denylist }
    }

    pub fn extract(&self, password: &SecretString) -> FeatureVector {
        extract(password, &self.denylist)
    }

    pub fn denylist(&self) -> &Denylist {
        &self.denylist
    }
}
