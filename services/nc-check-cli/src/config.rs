//! Check options for a CLI run.
//!
//! Options come from the `--config` YAML file when one is given, otherwise
//! from `NC_CHECK_*` environment variables. Command-line flags override both.

use anyhow::{Context, Result};
use cf_validator::ComplianceOptions;
use coverage::CoverageConfig;
use nc_check::CheckOptions;
use tracing::{debug, info};

use crate::cli::{CommonArgs, ComplianceArgs, CoverageArgs};

/// Load the base options for this run.
pub fn load_options(common: &CommonArgs) -> Result<CheckOptions> {
    let Some(path) = &common.config else {
        debug!("No config file, reading options from environment");
        return Ok(CheckOptions::from_env());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let options = CheckOptions::from_yaml_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!(path = %path.display(), "Loaded check options");
    Ok(options)
}

pub fn apply_compliance_args(args: &ComplianceArgs, options: &mut ComplianceOptions) {
    if let Some(conventions) = &args.conventions {
        options.conventions = vec![conventions.clone()];
    }
    if let Some(version) = &args.cf_version {
        options.cf_version = version.clone();
    }
    if args.domain.is_some() {
        options.domain = args.domain.clone();
    }
    if args.standard_name_table.is_some() {
        options.standard_name_table = args.standard_name_table.clone();
    }
}

pub fn apply_coverage_args(args: &CoverageArgs, config: &mut CoverageConfig) {
    if args.var_name.is_some() {
        config.var_name = args.var_name.clone();
    }
    if args.lon_name.is_some() {
        config.lon_name = args.lon_name.clone();
    }
    if args.lat_name.is_some() {
        config.lat_name = args.lat_name.clone();
    }
    if args.time_name.is_some() {
        config.time_name = args.time_name.clone();
    }
    if args.no_edge_of_map {
        config.check_edge_of_map = false;
    }
    if args.no_land_ocean {
        config.check_land_ocean_offset = false;
    }
}
