//! CF metadata validation for labeled datasets.
//!
//! Checks a [`LabeledDataset`](nc_common::LabeledDataset) against the CF
//! metadata convention and a few secondary conventions, and can produce a
//! normalized copy with the safe fixes applied.
//!
//! # Architecture
//!
//! ```text
//! check_dataset_compliant(ds, options)
//!      │
//!      ├─► 'cf' selected?
//!      │         │
//!      │         ├─► external ConformanceEngine (optional)
//!      │         │         └─► on failure: heuristic checks + checker_error
//!      │         │
//!      │         └─► standard-name suggestions
//!      │
//!      ├─► secondary checks (cf attribute case, ferret _FillValue)
//!      │
//!      └─► Report { findings by scope, counts, notes, suggestions }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cf_validator::{check_dataset_compliant, ComplianceOptions, StandardNames};
//!
//! let report = check_dataset_compliant(&ds, &ComplianceOptions::default(), None, &StandardNames::Disabled)?;
//! println!("{} errors", report.counts().error);
//! ```

pub mod config;
pub mod conventions;
pub mod engine;
pub mod error;
pub mod fix;
pub mod heuristic;
pub mod references;
pub mod report;
pub mod standard_names;

// Re-export commonly used types at crate root
pub use config::{format_cf_version, ComplianceOptions, DEFAULT_CF_VERSION};
pub use conventions::{normalize_conventions, parse_conventions, Convention, SUPPORTED_CONVENTIONS};
pub use engine::{check_dataset_compliant, run_compliance, ConformanceEngine, HeuristicEngine};
pub use error::{EngineError, ValidatorError, ValidatorResult};
pub use fix::make_compliant;
pub use heuristic::heuristic_check_dataset;
pub use report::{
    CheckerError, Counts, EngineStatus, Finding, FindingScope, Report, Severity, Suggestions,
    UnitsCheck, UnitsStatus, VariableSuggestion,
};
pub use standard_names::{
    augment_with_suggestions, CacheStats, StandardNameCache, StandardNameEntry, StandardNameTable,
    StandardNames, XmlStandardNameTable,
};
