//! One entry point for every dataset check.
//!
//! Wraps the CF validator and the coverage analyzer around a borrowed
//! [`LabeledDataset`](nc_common::LabeledDataset) and combines their results
//! into a [`FullReport`] with a per-check pass/warn/fail summary.
//!
//! # Architecture
//!
//! ```text
//!                  DatasetCheck<'a>  (&'a LabeledDataset)
//!                         │
//!      ┌──────────────┬───┴──────────┬──────────────┐
//!      ▼              ▼              ▼              ▼
//!  compliance   make_compliant   ocean_cover    time_cover
//!  (cf-validator)                (coverage)     (coverage)
//!      │                             │              │
//!      └─────────────► all() ◄───────┴──────────────┘
//!                        │
//!                        ▼
//!                   FullReport ──► render(json | yaml | summary)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use nc_check::{DatasetCheck, CheckOptions, ReportFormat, render};
//!
//! let ds = LabeledDataset::from_json_str(&snapshot)?;
//! let mut cache = StandardNameCache::default();
//! let full = DatasetCheck::new(&ds).all(&CheckOptions::default(), &mut cache)?;
//! print!("{}", render(&full, ReportFormat::Summary)?);
//! ```

pub mod error;
pub mod facade;
pub mod options;
pub mod output;
pub mod summary;

// Re-export commonly used types at crate root
pub use error::{CheckError, NcCheckResult};
pub use facade::DatasetCheck;
pub use options::{CheckName, CheckOptions, ChecksEnabled};
pub use output::{render, validate_output, write_report, ReportFormat, Summarize};
pub use summary::{CheckSummary, CoverageOutcome, FullReport, Reports, RunSummary, SummaryStatus};
