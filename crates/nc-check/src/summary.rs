//! Combined report of a multi-check run.

use std::fmt;

use cf_validator::Report;
use coverage::{AggregateReport, CheckKind, CheckStatus, CoverageReport};
use serde::Serialize;

use crate::options::{CheckName, ChecksEnabled};

/// Coarse outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryStatus {
    Pass,
    Warn,
    Fail,
}

impl SummaryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryStatus::Pass => "pass",
            SummaryStatus::Warn => "warn",
            SummaryStatus::Fail => "fail",
        }
    }

    /// Worst of `statuses`: fail, then warn, else pass.
    pub fn combine(statuses: impl IntoIterator<Item = SummaryStatus>) -> SummaryStatus {
        statuses.into_iter().max().unwrap_or(SummaryStatus::Pass)
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<CheckStatus> for SummaryStatus {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::Pass => SummaryStatus::Pass,
            CheckStatus::Fail => SummaryStatus::Fail,
            _ => SummaryStatus::Warn,
        }
    }
}

/// A checker error fails the run; otherwise fatal/error findings fail and
/// warnings warn.
pub fn compliance_status(report: &Report) -> SummaryStatus {
    if report.checker_error.is_some() {
        return SummaryStatus::Fail;
    }
    let counts = report.counts();
    if counts.fatal + counts.error > 0 {
        SummaryStatus::Fail
    } else if counts.warn > 0 {
        SummaryStatus::Warn
    } else {
        SummaryStatus::Pass
    }
}

pub fn compliance_detail(report: &Report) -> String {
    let counts = report.counts();
    format!("fatal={} error={} warn={}", counts.fatal, counts.error, counts.warn)
}

/// Worst status over the checks of one variable.
pub fn variable_status(report: &CoverageReport) -> SummaryStatus {
    if report.checks.is_empty() {
        return if report.ok {
            SummaryStatus::Pass
        } else {
            SummaryStatus::Fail
        };
    }
    SummaryStatus::combine(report.checks.values().map(|c| c.status().into()))
}

/// Counts for one variable: longitude gaps and point mismatches for an
/// ocean-cover report, missing slices for a time-cover report.
pub fn variable_detail(report: &CoverageReport) -> String {
    if report.check(CheckKind::TimeMissing).is_some() {
        let missing = report.time_missing().map_or(0, |t| t.missing_slice_count);
        return format!("missing_slices={missing}");
    }
    let missing = report.edge_of_map().map_or(0, |e| e.missing_longitude_count);
    let mismatches = report.land_ocean().map_or(0, |l| l.mismatch_count);
    format!("missing_longitudes={missing} mismatches={mismatches}")
}

pub fn coverage_status(report: &AggregateReport) -> SummaryStatus {
    if report.reports.is_empty() {
        return if report.ok {
            SummaryStatus::Pass
        } else {
            SummaryStatus::Fail
        };
    }
    SummaryStatus::combine(report.iter().map(variable_status))
}

pub fn coverage_detail(report: &AggregateReport) -> String {
    format!("variables={}", report.checked_variable_count)
}

/// A coverage check's report, or the input problem that prevented it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CoverageOutcome {
    Report(AggregateReport),
    Skipped { error: String },
}

impl CoverageOutcome {
    pub fn status(&self) -> SummaryStatus {
        match self {
            CoverageOutcome::Report(report) => coverage_status(report),
            CoverageOutcome::Skipped { .. } => SummaryStatus::Warn,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            CoverageOutcome::Report(report) => coverage_detail(report),
            CoverageOutcome::Skipped { error } => format!("skipped: {error}"),
        }
    }

    pub fn report(&self) -> Option<&AggregateReport> {
        match self {
            CoverageOutcome::Report(report) => Some(report),
            CoverageOutcome::Skipped { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckSummary {
    pub check: CheckName,
    pub status: SummaryStatus,
    pub detail: String,
}

/// Reports of the checks that ran.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reports {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocean_cover: Option<CoverageOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_cover: Option<CoverageOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub checks_run: usize,
    pub failing_checks: usize,
    pub warnings_or_skips: usize,
    pub overall_status: SummaryStatus,
    pub overall_ok: bool,
}

/// Everything a combined run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullReport {
    pub checks_enabled: ChecksEnabled,
    pub check_summary: Vec<CheckSummary>,
    pub reports: Reports,
    pub summary: RunSummary,
}

impl FullReport {
    /// Summarize `reports` in check order.
    pub fn new(checks_enabled: ChecksEnabled, reports: Reports) -> Self {
        let mut check_summary = Vec::new();
        if let Some(report) = &reports.compliance {
            check_summary.push(CheckSummary {
                check: CheckName::Compliance,
                status: compliance_status(report),
                detail: compliance_detail(report),
            });
        }
        for (check, outcome) in [
            (CheckName::OceanCover, &reports.ocean_cover),
            (CheckName::TimeCover, &reports.time_cover),
        ] {
            if let Some(outcome) = outcome {
                check_summary.push(CheckSummary {
                    check,
                    status: outcome.status(),
                    detail: outcome.detail(),
                });
            }
        }

        let overall_status = SummaryStatus::combine(check_summary.iter().map(|s| s.status));
        let count = |status: SummaryStatus| check_summary.iter().filter(|s| s.status == status).count();
        let summary = RunSummary {
            checks_run: check_summary.len(),
            failing_checks: count(SummaryStatus::Fail),
            warnings_or_skips: count(SummaryStatus::Warn),
            overall_status,
            overall_ok: overall_status == SummaryStatus::Pass,
        };
        Self {
            checks_enabled,
            check_summary,
            reports,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_validator::{CheckerError, EngineStatus, Finding};

    fn report() -> Report {
        Report::new("CF-1.12", "heuristic", EngineStatus::Ok, "heuristic")
    }

    #[test]
    fn test_combine_order() {
        use SummaryStatus::*;
        assert_eq!(SummaryStatus::combine([Pass, Warn, Pass]), Warn);
        assert_eq!(SummaryStatus::combine([Warn, Fail]), Fail);
        assert_eq!(SummaryStatus::combine(std::iter::empty()), Pass);
    }

    #[test]
    fn test_compliance_status_mapping() {
        let mut r = report();
        assert_eq!(compliance_status(&r), SummaryStatus::Pass);

        r.push_global(Finding::warn("Conventions", "missing"));
        assert_eq!(compliance_status(&r), SummaryStatus::Warn);
        assert_eq!(compliance_detail(&r), "fatal=0 error=0 warn=1");

        r.push_variable("v", Finding::error("missing_units_for_standard_name", "no units"));
        assert_eq!(compliance_status(&r), SummaryStatus::Fail);

        let mut r = report();
        r.checker_error = Some(CheckerError {
            kind: "RuntimeError".into(),
            message: "boom".into(),
        });
        assert_eq!(compliance_status(&r), SummaryStatus::Fail);
    }

    #[test]
    fn test_coverage_status_mapping() {
        assert_eq!(SummaryStatus::from(CheckStatus::SkippedNonGlobal), SummaryStatus::Warn);
        assert_eq!(SummaryStatus::from(CheckStatus::Skipped), SummaryStatus::Warn);
        assert_eq!(SummaryStatus::from(CheckStatus::Fail), SummaryStatus::Fail);
    }

    #[test]
    fn test_full_report_summary() {
        let mut compliance = report();
        compliance.push_global(Finding::warn("Conventions", "missing"));
        let reports = Reports {
            compliance: Some(compliance),
            ocean_cover: Some(CoverageOutcome::Skipped {
                error: "Coordinate 'lon' not found.".into(),
            }),
            time_cover: None,
        };
        let full = FullReport::new(ChecksEnabled::default(), reports);
        assert_eq!(full.check_summary.len(), 2);
        assert_eq!(full.check_summary[1].detail, "skipped: Coordinate 'lon' not found.");
        assert_eq!(full.summary.checks_run, 2);
        assert_eq!(full.summary.failing_checks, 0);
        assert_eq!(full.summary.warnings_or_skips, 2);
        assert_eq!(full.summary.overall_status, SummaryStatus::Warn);
        assert!(!full.summary.overall_ok);

        let value = serde_json::to_value(&full).unwrap();
        assert_eq!(value["check_summary"][0]["check"], "compliance");
        assert_eq!(value["reports"]["ocean_cover"]["error"], "Coordinate 'lon' not found.");
        assert!(value["reports"].get("time_cover").is_none());
    }
}
