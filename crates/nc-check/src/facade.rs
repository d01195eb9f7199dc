//! The [`DatasetCheck`] facade.

use cf_validator::{
    format_cf_version, make_compliant, run_compliance, ComplianceOptions, ConformanceEngine, Report,
    StandardNameCache,
};
use coverage::{check_ocean_cover, check_time_cover, AggregateReport, CoverageConfig, CoverageError};
use nc_common::LabeledDataset;
use tracing::{info, warn};

use crate::error::{CheckError, NcCheckResult};
use crate::options::{CheckName, CheckOptions};
use crate::summary::{CoverageOutcome, FullReport, Reports};

/// Every check, run against one borrowed dataset.
///
/// ```ignore
/// let check = DatasetCheck::new(&ds);
/// let mut cache = StandardNameCache::default();
/// let full = check.all(&CheckOptions::default(), &mut cache)?;
/// println!("{}", full.summary.overall_status);
/// ```
#[derive(Clone, Copy)]
pub struct DatasetCheck<'a> {
    ds: &'a LabeledDataset,
    engine: Option<&'a dyn ConformanceEngine>,
}

impl<'a> DatasetCheck<'a> {
    pub fn new(ds: &'a LabeledDataset) -> Self {
        Self { ds, engine: None }
    }

    /// Use `engine` as the external conformance checker.
    pub fn with_engine(mut self, engine: &'a dyn ConformanceEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn dataset(&self) -> &'a LabeledDataset {
        self.ds
    }

    /// CF and secondary convention checks.
    pub fn compliance(
        &self,
        options: &ComplianceOptions,
        cache: &mut StandardNameCache,
    ) -> NcCheckResult<Report> {
        options.validate().map_err(CheckError::Config)?;
        Ok(run_compliance(self.ds, options, self.engine, cache)?)
    }

    /// A normalized copy of the dataset declaring `cf_version`.
    pub fn make_compliant(&self, cf_version: &str) -> NcCheckResult<LabeledDataset> {
        Ok(make_compliant(self.ds, &format_cf_version(cf_version))?)
    }

    pub fn ocean_cover(&self, config: &CoverageConfig) -> NcCheckResult<AggregateReport> {
        Ok(check_ocean_cover(self.ds, config)?)
    }

    pub fn time_cover(&self, config: &CoverageConfig) -> NcCheckResult<AggregateReport> {
        Ok(check_time_cover(self.ds, config)?)
    }

    /// Run every enabled check and combine the results.
    ///
    /// Coverage input problems (no lon/lat coordinate, unknown variable) do
    /// not abort the run; the affected check is reported as skipped.
    pub fn all(
        &self,
        options: &CheckOptions,
        cache: &mut StandardNameCache,
    ) -> NcCheckResult<FullReport> {
        if !options.checks.any() {
            return Err(CheckError::NoChecksEnabled);
        }
        options.validate().map_err(CheckError::Config)?;

        let mut reports = Reports::default();
        if options.checks.compliance {
            reports.compliance = Some(self.compliance(&options.compliance, cache)?);
        }
        if options.checks.ocean_cover {
            reports.ocean_cover = Some(coverage_outcome(
                CheckName::OceanCover,
                check_ocean_cover(self.ds, &options.coverage),
            ));
        }
        if options.checks.time_cover {
            reports.time_cover = Some(coverage_outcome(
                CheckName::TimeCover,
                check_time_cover(self.ds, &options.coverage),
            ));
        }

        let full = FullReport::new(options.checks, reports);
        info!(
            checks_run = full.summary.checks_run,
            failing = full.summary.failing_checks,
            status = %full.summary.overall_status,
            "Full check complete"
        );
        Ok(full)
    }
}

fn coverage_outcome(
    check: CheckName,
    result: Result<AggregateReport, CoverageError>,
) -> CoverageOutcome {
    match result {
        Ok(report) => CoverageOutcome::Report(report),
        Err(err) => {
            warn!(check = %check, error = %err, "Coverage check skipped");
            CoverageOutcome::Skipped {
                error: err.to_string(),
            }
        }
    }
}
