use std::fmt;

use thiserror::Error;

/// Raised by the normalizer's validation gate when a raw resume does not match the
/// expected shape. Every violation found is collected before failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeValidationError {
    pub violations: Vec<String>,
}

impl ResumeValidationError {
    pub fn new(violations: Vec<String>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for ResumeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resume schema validation failed:")?;
        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ResumeValidationError {}

/// Engine-level error type.
///
/// Business outcomes of the mapper (no match, blacklisted, low confidence) are never
/// errors; only malformed input and bad option values end up here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ResumeValidationError),

    #[error("Unknown selection strategy: {0}")]
    UnknownStrategy(String),

    #[error("Unknown role profile: {0}")]
    UnknownProfile(String),

    #[error("Unknown canonical field: {0}")]
    UnknownCanonicalField(String),

    #[error("Fuzzy threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
