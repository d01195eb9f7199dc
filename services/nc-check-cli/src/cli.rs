//! Command-line arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Subcommand names. Any other leading positional argument is taken as a
/// snapshot to check for compliance.
pub const COMMANDS: &[&str] = &[
    "compliance",
    "ocean-cover",
    "time-cover",
    "all",
    "comply",
    "help",
];

#[derive(Parser, Debug)]
#[command(name = "nc-check")]
#[command(about = "CF metadata and grid coverage checks for dataset snapshots")]
#[command(after_help = "Examples:
  nc-check compliance input.json
  nc-check ocean-cover input.json --lon-name x --lat-name y
  nc-check time-cover input.json --time-name t
  nc-check all input.json --format summary
  nc-check comply input.json --output fixed.json
  nc-check input.json   # shorthand for `nc-check compliance input.json`")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    /// Parse the process arguments, accepting the `nc-check <file>` shorthand.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "NC_CHECK_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML file with check options
    #[arg(long, global = true, env = "NC_CHECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report format: json, yaml or summary
    #[arg(long, global = true, env = "NC_CHECK_FORMAT", default_value = "json")]
    pub format: String,

    /// Write the report to this file instead of stdout
    #[arg(long, global = true)]
    pub report_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run CF and Ferret compliance checks
    Compliance {
        /// Dataset snapshot (JSON)
        file: PathBuf,

        #[command(flatten)]
        compliance: ComplianceArgs,
    },

    /// Run edge-of-map and land/ocean offset checks
    OceanCover {
        /// Dataset snapshot (JSON)
        file: PathBuf,

        #[command(flatten)]
        coverage: CoverageArgs,
    },

    /// Report missing time slices
    TimeCover {
        /// Dataset snapshot (JSON)
        file: PathBuf,

        /// Check only this data variable
        #[arg(long)]
        var_name: Option<String>,

        /// Time coordinate or dimension name
        #[arg(long)]
        time_name: Option<String>,
    },

    /// Run compliance, ocean-cover and time-cover checks
    All {
        /// Dataset snapshot (JSON)
        file: PathBuf,

        /// Checks to run (comma-separated); all when omitted
        #[arg(long, value_delimiter = ',')]
        checks: Vec<String>,

        #[command(flatten)]
        compliance: ComplianceArgs,

        #[command(flatten)]
        coverage: CoverageArgs,
    },

    /// Write a normalized, CF-declaring copy of a snapshot
    Comply {
        /// Dataset snapshot (JSON)
        file: PathBuf,

        /// Output snapshot path
        #[arg(short, long)]
        output: PathBuf,

        /// CF version to declare (e.g. 1.12)
        #[arg(long)]
        cf_version: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ComplianceArgs {
    /// Comma-separated conventions to check (cf, ferret)
    #[arg(long)]
    pub conventions: Option<String>,

    /// CF version to validate against
    #[arg(long)]
    pub cf_version: Option<String>,

    /// Domain hint passed to the conformance engine
    #[arg(long)]
    pub domain: Option<String>,

    /// Local CF standard-name table (XML)
    #[arg(long, env = "NC_CHECK_STANDARD_NAME_TABLE")]
    pub standard_name_table: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CoverageArgs {
    /// Check only this data variable
    #[arg(long)]
    pub var_name: Option<String>,

    /// Longitude coordinate name (inferred when omitted)
    #[arg(long)]
    pub lon_name: Option<String>,

    /// Latitude coordinate name (inferred when omitted)
    #[arg(long)]
    pub lat_name: Option<String>,

    /// Time coordinate or dimension name
    #[arg(long)]
    pub time_name: Option<String>,

    /// Disable the edge-of-map check
    #[arg(long)]
    pub no_edge_of_map: bool,

    /// Disable the land/ocean offset check
    #[arg(long)]
    pub no_land_ocean: bool,
}

/// Insert `compliance` when the first argument is neither a subcommand nor
/// a flag, so `nc-check <file>` checks compliance.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let shorthand = args.get(1).is_some_and(|first| {
        let first = first.to_string_lossy();
        !first.starts_with('-') && !COMMANDS.contains(&first.as_ref())
    });
    if shorthand {
        args.insert(1, OsString::from("compliance"));
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_normalize_args() {
        let args = normalize_args(["nc-check", "data.json"]);
        assert_eq!(args, vec!["nc-check", "compliance", "data.json"]);

        let args = normalize_args(["nc-check", "all", "data.json"]);
        assert_eq!(args, vec!["nc-check", "all", "data.json"]);

        let args = normalize_args(["nc-check", "--format", "yaml", "all", "data.json"]);
        assert_eq!(args.len(), 5);

        assert_eq!(normalize_args(["nc-check"]).len(), 1);
    }
}
