//! Character composition - counts uppercase, lowercase, digits and special chars.

/// Bucket a single character falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Upper,
    Lower,
    Digit,
    Special,
}

impl CharClass {
    /// Classifies a character into exactly one bucket.
    ///
    /// Checked in order: uppercase, lowercase, numeral. Whitespace,
    /// punctuation, symbols and caseless letters are all `Special`.
    pub fn of(c: char) -> Self {
        if c.is_uppercase() {
            Self::Upper
        } else if c.is_lowercase() {
            Self::Lower
        } else if c.is_numeric() {
            Self::Digit
        } else {
            Self::Special
        }
    }
}

/// Per-class character counts of one password.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composition {
    pub length: usize,
    pub upper: usize,
    pub lower: usize,
    pub digits: usize,
    pub special: usize,
}

impl Composition {
    /// Number of distinct classes present (0 to 4).
    pub fn variety(&self) -> usize {
        [self.upper, self.lower, self.digits, self.special]
            .iter()
            .filter(|&&n| n > 0)
            .count()
    }

    /// `count / length`, or 0 for an empty password.
    pub fn ratio(&self, count: usize) -> f64 {
        count as f64 / self.length.max(1) as f64
    }
}

/// Counts character classes in a single pass.
pub fn composition_section(password: &str) -> Composition {
    password.chars().fold(Composition::default(), |mut acc, c| {
        acc.length += 1;
        match CharClass::of(c) {
            CharClass::Upper => acc.upper += 1,
            CharClass::Lower => acc.lower += 1,
            CharClass::Digit => acc.digits += 1,
            CharClass::Special => acc.special += 1,
        }
        acc
    })
}
