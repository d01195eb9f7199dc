//! Error types for coverage analysis.

use thiserror::Error;

/// Input problems that make a coverage check impossible.
///
/// Coverage defects in the data are reported as check results, never as
/// errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    // === Coordinate Errors ===
    #[error("Could not infer longitude/latitude coordinates. Pass `lon_name` and `lat_name`.")]
    CoordinatesNotInferred,

    #[error("Coordinate '{0}' not found.")]
    CoordinateNotFound(String),

    #[error("Coordinate '{0}' must be 1D.")]
    CoordinateNotOneDimensional(String),

    #[error("Coordinate '{0}' must have numeric values.")]
    NonNumericCoordinate(String),

    // === Variable Errors ===
    #[error("Data variable '{0}' not found.")]
    VariableNotFound(String),

    #[error("Data variable '{variable}' must include lon dim '{lon_dim}' and lat dim '{lat_dim}'.")]
    MissingGridDims {
        variable: String,
        lon_dim: String,
        lat_dim: String,
    },

    #[error("Could not infer ocean variable. Provide `var_name` for a variable that has lat/lon dimensions.")]
    NoGriddedVariable,

    #[error("Dataset has no data variables to check.")]
    NoDataVariables,

    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoverageError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a MissingGridDims error.
    pub fn missing_grid_dims(
        variable: impl Into<String>,
        lon_dim: impl Into<String>,
        lat_dim: impl Into<String>,
    ) -> Self {
        Self::MissingGridDims {
            variable: variable.into(),
            lon_dim: lon_dim.into(),
            lat_dim: lat_dim.into(),
        }
    }
}

/// Result type alias using CoverageError.
pub type CoverageResult<T> = Result<T, CoverageError>;
