//! Conformance engine seam and the compliance run.

use nc_common::LabeledDataset;
use tracing::{info, warn};

use crate::config::ComplianceOptions;
use crate::conventions::{apply_selected_convention_checks, Convention};
use crate::error::{EngineError, ValidatorResult};
use crate::heuristic::{heuristic_check_dataset, HEURISTIC_ENGINE};
use crate::report::{EngineStatus, Report};
use crate::standard_names::{augment_with_suggestions, StandardNameCache, StandardNames};

/// Note added when the external engine failed and heuristic checks ran.
pub const FALLBACK_NOTE: &str =
    "external checker could not run; returned heuristic checks instead.";

/// Note added when `cf` was not among the selected conventions.
pub const CF_SKIPPED_NOTE: &str = "CF checks skipped because 'cf' convention was not selected.";

/// A CF conformance checker producing the common [`Report`] shape.
pub trait ConformanceEngine {
    /// Engine name, reported as `engine`.
    fn name(&self) -> &str;

    /// Check `ds` against `cf_version` (e.g. `"CF-1.12"`).
    fn check(&self, ds: &LabeledDataset, cf_version: &str) -> Result<Report, EngineError>;
}

/// The bundled heuristic checks as an engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEngine;

impl ConformanceEngine for HeuristicEngine {
    fn name(&self) -> &str {
        HEURISTIC_ENGINE
    }

    fn check(&self, ds: &LabeledDataset, cf_version: &str) -> Result<Report, EngineError> {
        Ok(heuristic_check_dataset(ds, cf_version))
    }
}

/// Run the compliance checks for the selected conventions.
///
/// With `cf` selected, `external` runs first. If it fails the heuristic
/// checks run instead and the failure is kept in `checker_error`, unless
/// `options.fallback_to_heuristic` is off, in which case the engine error is
/// returned. Without an external engine the heuristic checks run directly
/// and the report's status is [`EngineStatus::Unavailable`].
pub fn check_dataset_compliant(
    ds: &LabeledDataset,
    options: &ComplianceOptions,
    external: Option<&dyn ConformanceEngine>,
    names: &StandardNames<'_>,
) -> ValidatorResult<Report> {
    let conventions = options.selected_conventions()?;
    let cf_version = options.cf_version_tag();

    let mut report = if conventions.contains(&Convention::Cf) {
        let (mut report, failure) = match external {
            Some(engine) => match engine.check(ds, &cf_version) {
                Ok(report) => (report, None),
                Err(err) if options.fallback_to_heuristic => {
                    warn!(
                        engine = engine.name(),
                        error = %err,
                        "Conformance engine failed, falling back to heuristic checks"
                    );
                    let mut report = heuristic_check_dataset(ds, &cf_version);
                    report.engine_status = EngineStatus::Fallback;
                    (report, Some(err))
                }
                Err(err) => return Err(err.into()),
            },
            None => {
                let mut report = heuristic_check_dataset(ds, &cf_version);
                report.engine_status = EngineStatus::Unavailable;
                (report, None)
            }
        };
        augment_with_suggestions(ds, &mut report, names, options.domain.as_deref());
        if let Some(err) = failure {
            report.checker_error = Some(err.into());
            report.notes.push(FALLBACK_NOTE.to_string());
        }
        report
    } else {
        let mut report = Report::skipped(cf_version);
        report.notes.push(CF_SKIPPED_NOTE.to_string());
        report
    };

    report.conventions_checked = conventions.iter().map(|c| c.as_str().to_string()).collect();
    apply_selected_convention_checks(ds, &mut report, &conventions);

    let counts = report.counts();
    info!(
        engine = %report.engine,
        conventions = ?report.conventions_checked,
        fatal = counts.fatal,
        error = counts.error,
        warn = counts.warn,
        "Compliance check complete"
    );
    Ok(report)
}

/// Like [`check_dataset_compliant`], loading `options.standard_name_table`
/// through `cache`. A table that fails to load only adds a report note.
pub fn run_compliance(
    ds: &LabeledDataset,
    options: &ComplianceOptions,
    external: Option<&dyn ConformanceEngine>,
    cache: &mut StandardNameCache,
) -> ValidatorResult<Report> {
    let Some(path) = options.standard_name_table.as_deref() else {
        return check_dataset_compliant(ds, options, external, &StandardNames::Disabled);
    };
    let source = path.display().to_string();
    match cache.load_path(path) {
        Ok(table) => check_dataset_compliant(ds, options, external, &StandardNames::Table(&*table)),
        Err(err) => {
            let reason = err.to_string();
            let names = StandardNames::Unavailable {
                source: &source,
                reason: &reason,
            };
            check_dataset_compliant(ds, options, external, &names)
        }
    }
}
