//! Coverage report shapes.

use std::collections::BTreeMap;
use std::fmt;

use nc_common::{LongitudeConvention, Range, ValueRange};
use serde::Serialize;

/// Outcome of one coverage check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// The check was disabled.
    Skipped,
    /// Land/ocean alignment needs a global grid.
    SkippedNonGlobal,
    /// The variable has no time dimension.
    SkippedNoTime,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skipped => "skipped",
            Self::SkippedNonGlobal => "skipped_non_global",
            Self::SkippedNoTime => "skipped_no_time",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail)
    }

    fn from_failed(failed: bool) -> Self {
        if failed {
            Self::Fail
        } else {
            Self::Pass
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The individual coverage checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    EdgeOfMap,
    LandOceanOffset,
    TimeMissing,
}

impl CheckKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EdgeOfMap => "edge_of_map",
            Self::LandOceanOffset => "land_ocean_offset",
            Self::TimeMissing => "time_missing",
        }
    }
}

/// Persistent missing longitude bands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeOfMapResult {
    pub enabled: bool,
    pub status: CheckStatus,
    pub sampled_time_indices: Vec<usize>,
    pub missing_longitude_count: usize,
    pub missing_longitudes: Vec<f64>,
    pub missing_longitude_ranges: Vec<ValueRange>,
}

impl EdgeOfMapResult {
    pub(crate) fn new(
        sampled_time_indices: Vec<usize>,
        missing_longitudes: Vec<f64>,
        missing_longitude_ranges: Vec<ValueRange>,
    ) -> Self {
        Self {
            enabled: true,
            status: CheckStatus::from_failed(!missing_longitudes.is_empty()),
            sampled_time_indices,
            missing_longitude_count: missing_longitudes.len(),
            missing_longitudes,
            missing_longitude_ranges,
        }
    }
}

/// A reference point whose masking disagrees with expectations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointMismatch {
    pub point: String,
    pub requested_lat: f64,
    /// Requested longitude, normalized to the grid's convention.
    pub requested_lon: f64,
    pub actual_lat: f64,
    pub actual_lon: f64,
    pub expected_missing: bool,
    pub observed_missing: bool,
}

/// Land/ocean mask alignment against reference points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandOceanResult {
    pub enabled: bool,
    pub status: CheckStatus,
    pub mismatch_count: usize,
    pub land_points_checked: usize,
    pub ocean_points_checked: usize,
    pub land_mismatches: Vec<PointMismatch>,
    pub ocean_mismatches: Vec<PointMismatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Note attached when the grid is regional.
pub const NON_GLOBAL_NOTE: &str =
    "Skipped land/ocean sanity check because grid does not appear global.";

impl LandOceanResult {
    pub(crate) fn checked(
        land_points_checked: usize,
        ocean_points_checked: usize,
        land_mismatches: Vec<PointMismatch>,
        ocean_mismatches: Vec<PointMismatch>,
    ) -> Self {
        let mismatch_count = land_mismatches.len() + ocean_mismatches.len();
        Self {
            enabled: true,
            status: CheckStatus::from_failed(mismatch_count > 0),
            mismatch_count,
            land_points_checked,
            ocean_points_checked,
            land_mismatches,
            ocean_mismatches,
            note: None,
        }
    }

    pub(crate) fn skipped(status: CheckStatus, note: Option<&str>) -> Self {
        Self {
            enabled: true,
            status,
            mismatch_count: 0,
            land_points_checked: 0,
            ocean_points_checked: 0,
            land_mismatches: Vec::new(),
            ocean_mismatches: Vec::new(),
            note: note.map(str::to_string),
        }
    }
}

/// Fully missing time slices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeMissingResult {
    pub enabled: bool,
    pub status: CheckStatus,
    pub missing_slice_count: usize,
    pub missing_slice_ranges: Vec<Range>,
}

/// Result of one check; a disabled check serializes as
/// `{"enabled": false, "status": "skipped"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CheckResult {
    Disabled { enabled: bool, status: CheckStatus },
    EdgeOfMap(EdgeOfMapResult),
    LandOcean(LandOceanResult),
    TimeMissing(TimeMissingResult),
}

impl CheckResult {
    pub fn disabled() -> Self {
        Self::Disabled {
            enabled: false,
            status: CheckStatus::Skipped,
        }
    }

    pub fn status(&self) -> CheckStatus {
        match self {
            Self::Disabled { status, .. } => *status,
            Self::EdgeOfMap(r) => r.status,
            Self::LandOcean(r) => r.status,
            Self::TimeMissing(r) => r.status,
        }
    }

    pub fn enabled(&self) -> bool {
        !matches!(self, Self::Disabled { .. })
    }
}

/// Grid geometry shared by every variable of an ocean-cover run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridInfo {
    pub lon_name: String,
    pub lat_name: String,
    pub lon_dim: String,
    pub lat_dim: String,
    pub longitude_convention: LongitudeConvention,
    pub longitude_min: Option<f64>,
    pub longitude_max: Option<f64>,
    pub latitude_min: Option<f64>,
    pub latitude_max: Option<f64>,
}

/// Coverage results for one data variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub variable: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridInfo>,
    pub time_dim: Option<String>,
    #[serde(flatten)]
    pub checks: BTreeMap<CheckKind, CheckResult>,
    pub ok: bool,
}

impl CoverageReport {
    pub(crate) fn new(
        variable: impl Into<String>,
        grid: Option<GridInfo>,
        time_dim: Option<String>,
        checks: BTreeMap<CheckKind, CheckResult>,
    ) -> Self {
        let ok = !checks.values().any(|c| c.status().is_failure());
        Self {
            variable: variable.into(),
            grid,
            time_dim,
            checks,
            ok,
        }
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckResult> {
        self.checks.get(&kind)
    }

    pub fn edge_of_map(&self) -> Option<&EdgeOfMapResult> {
        match self.check(CheckKind::EdgeOfMap) {
            Some(CheckResult::EdgeOfMap(r)) => Some(r),
            _ => None,
        }
    }

    pub fn land_ocean(&self) -> Option<&LandOceanResult> {
        match self.check(CheckKind::LandOceanOffset) {
            Some(CheckResult::LandOcean(r)) => Some(r),
            _ => None,
        }
    }

    pub fn time_missing(&self) -> Option<&TimeMissingResult> {
        match self.check(CheckKind::TimeMissing) {
            Some(CheckResult::TimeMissing(r)) => Some(r),
            _ => None,
        }
    }
}

/// Per-variable reports of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub mode: &'static str,
    pub checked_variable_count: usize,
    /// Variable names in dataset order.
    pub checked_variables: Vec<String>,
    pub reports: BTreeMap<String, CoverageReport>,
    pub ok: bool,
}

impl AggregateReport {
    pub fn new(reports: Vec<CoverageReport>) -> Self {
        let checked_variables: Vec<String> = reports.iter().map(|r| r.variable.clone()).collect();
        let ok = reports.iter().all(|r| r.ok);
        Self {
            mode: "all_variables",
            checked_variable_count: checked_variables.len(),
            checked_variables,
            reports: reports.into_iter().map(|r| (r.variable.clone(), r)).collect(),
            ok,
        }
    }

    /// Reports in dataset order.
    pub fn iter(&self) -> impl Iterator<Item = &CoverageReport> {
        self.checked_variables
            .iter()
            .filter_map(|name| self.reports.get(name))
    }

    pub fn get(&self, variable: &str) -> Option<&CoverageReport> {
        self.reports.get(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_disabled_check_shape() {
        let value = serde_json::to_value(CheckResult::disabled()).unwrap();
        assert_eq!(value, json!({"enabled": false, "status": "skipped"}));
    }

    #[test]
    fn test_ok_ignores_skips() {
        let mut checks = BTreeMap::new();
        checks.insert(CheckKind::EdgeOfMap, CheckResult::disabled());
        checks.insert(
            CheckKind::LandOceanOffset,
            CheckResult::LandOcean(LandOceanResult::skipped(
                CheckStatus::SkippedNonGlobal,
                Some(NON_GLOBAL_NOTE),
            )),
        );
        let report = CoverageReport::new("sst", None, None, checks);
        assert!(report.ok);

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["land_ocean_offset"]["status"], "skipped_non_global");
        assert_eq!(value["edge_of_map"]["enabled"], false);
        assert!(value.get("grid").is_none());
    }

    #[test]
    fn test_aggregate_ands_ok() {
        let mut failing = BTreeMap::new();
        failing.insert(
            CheckKind::EdgeOfMap,
            CheckResult::EdgeOfMap(EdgeOfMapResult::new(vec![0], vec![170.0], Vec::new())),
        );
        let reports = vec![
            CoverageReport::new("b", None, None, BTreeMap::new()),
            CoverageReport::new("a", None, None, failing),
        ];
        let aggregate = AggregateReport::new(reports);
        assert!(!aggregate.ok);
        assert_eq!(aggregate.checked_variables, vec!["b", "a"]);
        let order: Vec<&str> = aggregate.iter().map(|r| r.variable.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
        assert_eq!(aggregate.get("a").unwrap().edge_of_map().unwrap().status, CheckStatus::Fail);
    }
}
