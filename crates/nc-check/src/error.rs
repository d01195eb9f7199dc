//! Error types for the nc-check facade.

use cf_validator::ValidatorError;
use coverage::CoverageError;
use nc_common::NcError;
use thiserror::Error;

/// Errors that stop a check run.
#[derive(Debug, Error)]
pub enum CheckError {
    // === Configuration Errors ===
    #[error("At least one check must be enabled.")]
    NoChecksEnabled,

    #[error("Unsupported check '{0}'. Supported checks: compliance, ocean_cover, time_cover.")]
    UnsupportedCheck(String),

    #[error("Unsupported report format '{0}'. Supported formats: json, yaml, summary.")]
    UnsupportedFormat(String),

    #[error("conflicting options: {0}")]
    ConflictingOptions(String),

    #[error("configuration error: {0}")]
    Config(String),

    // === Check Errors ===
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error(transparent)]
    Dataset(#[from] NcError),

    // === Output Errors ===
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CheckError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a ConflictingOptions error.
    pub fn conflicting(msg: impl Into<String>) -> Self {
        Self::ConflictingOptions(msg.into())
    }
}

impl From<serde_json::Error> for CheckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for CheckError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using CheckError.
pub type NcCheckResult<T> = Result<T, CheckError>;
