//! Subcommand dispatch.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use cf_validator::StandardNameCache;
use nc_check::{render, validate_output, write_report, ChecksEnabled, DatasetCheck, ReportFormat};
use nc_common::LabeledDataset;
use tracing::{debug, info};

use crate::cli::{Cli, Command};
use crate::config::{apply_compliance_args, apply_coverage_args, load_options};

/// Run the parsed command. Reports go to `out` unless `--report-file` is set.
///
/// Failing checks are not errors: the report says what failed and the
/// process still exits successfully.
pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let format: ReportFormat = cli.common.format.parse()?;
    validate_output(format, cli.common.report_file.as_deref())?;
    let mut options = load_options(&cli.common)?;
    let mut cache = StandardNameCache::default();

    let text = match &cli.command {
        Command::Compliance { file, compliance } => {
            apply_compliance_args(compliance, &mut options.compliance);
            let ds = load_dataset(file)?;
            let report = DatasetCheck::new(&ds).compliance(&options.compliance, &mut cache)?;
            render(&report, format)?
        }
        Command::OceanCover { file, coverage } => {
            apply_coverage_args(coverage, &mut options.coverage);
            let ds = load_dataset(file)?;
            let report = DatasetCheck::new(&ds).ocean_cover(&options.coverage)?;
            render(&report, format)?
        }
        Command::TimeCover {
            file,
            var_name,
            time_name,
        } => {
            if var_name.is_some() {
                options.coverage.var_name = var_name.clone();
            }
            if time_name.is_some() {
                options.coverage.time_name = time_name.clone();
            }
            let ds = load_dataset(file)?;
            let report = DatasetCheck::new(&ds).time_cover(&options.coverage)?;
            render(&report, format)?
        }
        Command::All {
            file,
            checks,
            compliance,
            coverage,
        } => {
            if !checks.is_empty() {
                options.checks = ChecksEnabled::from_names(checks.as_slice())?;
            }
            apply_compliance_args(compliance, &mut options.compliance);
            apply_coverage_args(coverage, &mut options.coverage);
            let ds = load_dataset(file)?;
            let full = DatasetCheck::new(&ds).all(&options, &mut cache)?;
            render(&full, format)?
        }
        Command::Comply {
            file,
            output,
            cf_version,
        } => {
            let version = cf_version
                .clone()
                .unwrap_or_else(|| options.compliance.cf_version.clone());
            let ds = load_dataset(file)?;
            let fixed = DatasetCheck::new(&ds).make_compliant(&version)?;
            std::fs::write(output, fixed.to_json_string()?)
                .with_context(|| format!("Failed to write snapshot {}", output.display()))?;
            info!(path = %output.display(), "Wrote compliant snapshot");
            return Ok(());
        }
    };

    emit(&text, cli.common.report_file.as_deref(), out)
}

/// Read a JSON dataset snapshot.
pub fn load_dataset(path: &Path) -> Result<LabeledDataset> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset snapshot {}", path.display()))?;
    let ds = LabeledDataset::from_json_str(&text)
        .with_context(|| format!("Invalid dataset snapshot {}", path.display()))?;
    debug!(
        path = %path.display(),
        dims = ds.dims().len(),
        data_vars = ds.data_vars().len(),
        "Loaded dataset snapshot"
    );
    Ok(ds)
}

fn emit<W: Write>(text: &str, report_file: Option<&Path>, out: &mut W) -> Result<()> {
    match report_file {
        Some(path) => {
            write_report(text, path)
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            out.write_all(text.as_bytes())?;
            if !text.ends_with('\n') {
                out.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}
