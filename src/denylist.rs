//! Denylist management module
//!
//! Holds the weak substrings searched by the feature extractor.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Tokens used when no denylist file is configured.
pub const DEFAULT_TOKENS: [&str; 6] = ["123", "password", "qwerty", "abc", "111", "000"];

#[derive(Error, Debug)]
pub enum DenylistError {
    #[error("Denylist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read denylist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Denylist file is empty")]
    EmptyFile,
}

/// Finite list of lowercase substrings considered inherently weak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denylist {
    tokens: Vec<String>,
}

impl Default for Denylist {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS)
    }
}

impl Denylist {
    /// Builds a denylist from arbitrary tokens.
    ///
    /// Tokens are trimmed and lowercased; blanks and duplicates are dropped,
    /// first occurrence wins.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut list: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.as_ref().trim().to_lowercase();
            if !token.is_empty() && seen.insert(token.clone()) {
                list.push(token);
            }
        }
        Self { tokens: list }
    }

    /// Loads a denylist from a file with one token per line.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File contains no tokens
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DenylistError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Denylist load FAILED: FileNotFound {:?}", path);
            return Err(DenylistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let list = Self::new(content.lines());

        if list.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Denylist load FAILED: Empty file {:?}", path);
            return Err(DenylistError::EmptyFile);
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Denylist loaded: {} tokens from {:?}", list.len(), path);

        Ok(list)
    }

    /// Loads the denylist named by `PWD_DENYLIST_PATH`, or the default
    /// tokens when the variable is unset.
    pub fn from_env() -> Result<Self, DenylistError> {
        match denylist_path() {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    /// Case-insensitive substring search; stops at the first hit.
    pub fn matches(&self, password: &str) -> bool {
        if self.tokens.is_empty() {
            return false;
        }
        let lowered = password.to_lowercase();
        self.tokens.iter().any(|token| lowered.contains(token.as_str()))
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Returns the denylist file path from `PWD_DENYLIST_PATH`, if set.
pub fn denylist_path() -> Option<PathBuf> {
    std::env::var_os("PWD_DENYLIST_PATH").map(PathBuf::from)
}
