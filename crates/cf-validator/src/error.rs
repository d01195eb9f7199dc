//! Error types for metadata validation.

use nc_common::NcError;
use thiserror::Error;

/// Failure reported by a conformance engine that could not run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct EngineError {
    /// Short error category, reported as `checker_error.type`.
    pub kind: String,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Errors that stop a validation call.
///
/// Convention problems in the dataset are findings, not errors; these
/// variants cover configuration mistakes and collaborators that failed.
#[derive(Debug, Error)]
pub enum ValidatorError {
    // === Configuration Errors ===
    #[error("At least one convention must be selected.")]
    NoConventions,

    #[error("Unsupported conventions: {invalid}. Supported conventions: {supported}.")]
    UnsupportedConvention { invalid: String, supported: String },

    #[error("configuration error: {0}")]
    Config(String),

    // === Collaborator Errors ===
    #[error("conformance engine failed: {0}")]
    Engine(#[from] EngineError),

    #[error("standard-name table error: {0}")]
    StandardNameTable(String),

    #[error(transparent)]
    Dataset(#[from] NcError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ValidatorError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a StandardNameTable error.
    pub fn standard_name_table(msg: impl Into<String>) -> Self {
        Self::StandardNameTable(msg.into())
    }
}

impl From<quick_xml::Error> for ValidatorError {
    fn from(err: quick_xml::Error) -> Self {
        Self::StandardNameTable(err.to_string())
    }
}

/// Result type alias using ValidatorError.
pub type ValidatorResult<T> = Result<T, ValidatorError>;
