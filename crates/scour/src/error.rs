//! Error types for the scour library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scour operations.
///
/// Every variant here is fatal for the call that produced it. Per-rule issues
/// that do not stop an application pass are reported as
/// [`RuleWarning`](crate::apply::RuleWarning) instead.
#[derive(Debug, Error)]
pub enum ScourError {
    /// A rule source or data source does not exist.
    #[error("Not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted rule set violates the rule schema.
    #[error("Malformed rule set: {0}")]
    MalformedRuleSet(String),

    /// A rule pattern is not a valid regular expression.
    #[error("Invalid pattern '{pattern}' in rule {rule_id}: {source}")]
    PatternCompile {
        rule_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A replacement template cannot be used with its pattern.
    #[error("Invalid replacement '{replacement}' in rule {rule_id}: {message}")]
    InvalidReplacement {
        rule_id: String,
        replacement: String,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Columns of differing lengths were combined into one table.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    ShapeMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The rule generator failed to produce a rule set.
    #[error("Rule generator error: {0}")]
    Generator(String),
}

impl ScourError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ScourError::NotFound { path }
        } else {
            ScourError::Io { path, source }
        }
    }
}

/// Result type alias for scour operations.
pub type Result<T> = std::result::Result<T, ScourError>;
