//! Error types for the dataset model.

use thiserror::Error;

/// Result type alias using NcError.
pub type NcResult<T> = Result<T, NcError>;

/// Errors raised while building or loading a dataset snapshot.
///
/// Convention and coverage problems are never reported through this type;
/// they become findings. These errors only describe a snapshot that cannot
/// be represented consistently.
#[derive(Debug, Error)]
pub enum NcError {
    // === Structure Errors ===
    #[error("Dimension '{dim}' has size {expected} but variable '{variable}' uses size {found}")]
    DimensionMismatch {
        dim: String,
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error("Variable '{name}' declares {dims} dimensions but a shape of rank {rank}")]
    RankMismatch {
        name: String,
        dims: usize,
        rank: usize,
    },

    #[error("Variable '{name}' has {found} values but its shape holds {expected}")]
    ShapeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Variable already exists: {0}")]
    DuplicateVariable(String),

    // === Value Errors ===
    #[error("Invalid time units: {0}")]
    InvalidTimeUnits(String),

    // === Snapshot Errors ===
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NcError {
    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(
        dim: impl Into<String>,
        variable: impl Into<String>,
        expected: usize,
        found: usize,
    ) -> Self {
        Self::DimensionMismatch {
            dim: dim.into(),
            variable: variable.into(),
            expected,
            found,
        }
    }
}
