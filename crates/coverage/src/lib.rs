//! Coverage sanity checks for gridded ocean and time-series data.
//!
//! Three checks run over a variable's missing-value mask:
//!
//! - **Edge of map**: longitude columns missing in every sampled time slice
//! - **Land/ocean offset**: land reference points should be masked and
//!   ocean points should hold data (global grids only)
//! - **Time missing**: time slices with no valid element at all
//!
//! # Architecture
//!
//! ```text
//! check_ocean_cover(ds, config)            check_time_cover(ds, config)
//!      │                                        │
//!      ├─► resolve lon/lat coordinates          ├─► every data variable
//!      ├─► pick gridded variables               │
//!      │                                        ▼
//!      ▼                                   time_missing_check
//! per variable: edge_of_map_check               │
//!               land_ocean_check                │
//!      │                                        │
//!      └──────────► AggregateReport ◄───────────┘
//! ```

pub mod analyzer;
pub mod axes;
pub mod config;
pub mod edge;
pub mod error;
pub mod land_ocean;
pub mod report;
pub mod time_missing;

// Re-export commonly used types at crate root
pub use analyzer::{check_ocean_cover, check_time_cover};
pub use config::{CoverageConfig, ReferencePoint, GLOBAL_MIN_LAT_SPAN, GLOBAL_MIN_LON_SPAN};
pub use error::{CoverageError, CoverageResult};
pub use report::{
    AggregateReport, CheckKind, CheckResult, CheckStatus, CoverageReport, EdgeOfMapResult,
    GridInfo, LandOceanResult, PointMismatch, TimeMissingResult,
};
