//! nc-check: CF metadata and grid coverage checks from the command line.
//!
//! Reads a JSON dataset snapshot, runs the selected checks and prints the
//! report. Logs go to stderr so stdout stays machine-readable.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use nc_check_cli::{execute, Cli, CommonArgs};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse_normalized();

    if let Err(err) = init_tracing(&cli.common) {
        eprintln!("nc-check: {err:#}");
        return ExitCode::FAILURE;
    }
    debug!(command = ?cli.command, "Starting nc-check");

    let mut stdout = io::stdout().lock();
    match execute(&cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("nc-check: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(common: &CommonArgs) -> Result<()> {
    let level = match common.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    if common.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
