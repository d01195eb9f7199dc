//! End-to-end runs of the CLI against snapshot files.

use std::path::Path;

use clap::Parser;
use nc_check_cli::{execute, normalize_args, Cli, Command};
use nc_common::LabeledDataset;
use test_utils::{compliant_dataset, messy_dataset, ocean_dataset, temp_snapshot};

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["nc-check"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(normalize_args(argv)).unwrap()
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = parse(args);
    let mut out = Vec::new();
    execute(&cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_shorthand_runs_compliance() {
    let cli = parse(&["data.json"]);
    match cli.command {
        Command::Compliance { file, .. } => assert_eq!(file, Path::new("data.json")),
        other => panic!("unexpected command {other:?}"),
    }
    assert_eq!(cli.common.format, "json");
}

#[test]
fn test_compliance_json_report() {
    let (_dir, path) = temp_snapshot(&compliant_dataset());
    let out = run(&[path_str(&path)]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["cf_version"], "CF-1.12");
    assert_eq!(value["counts"]["error"], 0);
}

#[test]
fn test_failing_checks_still_succeed() {
    let (_dir, path) = temp_snapshot(&messy_dataset());
    let out = run(&["compliance", path_str(&path), "--format", "summary"]).unwrap();
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("compliance"));
    assert!(first.contains("fail"));
    assert!(out.contains("ghost"));
}

#[test]
fn test_all_summary_with_selected_checks() {
    let (_dir, path) = temp_snapshot(&ocean_dataset(3));
    let out = run(&[
        "all",
        path_str(&path),
        "--checks",
        "ocean-cover,time-cover",
        "--format",
        "summary",
    ])
    .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ocean_cover"));
    assert!(lines[1].starts_with("time_cover"));
    assert!(lines[2].starts_with("overall"));
    assert!(lines[2].contains("pass"));
}

#[test]
fn test_ocean_cover_writes_report_file() {
    let (dir, path) = temp_snapshot(&ocean_dataset(2));
    let report = dir.path().join("report.yaml");
    let out = run(&[
        "ocean-cover",
        path_str(&path),
        "--format",
        "yaml",
        "--report-file",
        path_str(&report),
    ])
    .unwrap();
    assert!(out.is_empty());
    let text = std::fs::read_to_string(&report).unwrap();
    assert!(text.contains("mode: all_variables"));
}

#[test]
fn test_time_cover_lon_flags_not_needed() {
    let (_dir, path) = temp_snapshot(&ocean_dataset(4));
    let out = run(&["time-cover", path_str(&path), "--var-name", "sst"]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["checked_variables"], serde_json::json!(["sst"]));
    assert_eq!(value["ok"], true);
}

#[test]
fn test_summary_with_report_file_conflicts() {
    let (dir, path) = temp_snapshot(&compliant_dataset());
    let report = dir.path().join("report.txt");
    let err = run(&[
        path_str(&path),
        "--format",
        "summary",
        "--report-file",
        path_str(&report),
    ])
    .unwrap_err();
    assert!(err.to_string().starts_with("conflicting options"));
    assert!(!report.exists());
}

#[test]
fn test_unsupported_format() {
    let (_dir, path) = temp_snapshot(&compliant_dataset());
    let err = run(&[path_str(&path), "--format", "html"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported report format 'html'. Supported formats: json, yaml, summary."
    );
}

#[test]
fn test_missing_snapshot() {
    let err = run(&["all", "/nonexistent/dataset.json"]).unwrap_err();
    assert!(format!("{err:#}").starts_with("Failed to read dataset snapshot /nonexistent/dataset.json"));
}

#[test]
fn test_config_file_selects_checks() {
    let (dir, path) = temp_snapshot(&ocean_dataset(2));
    let config = dir.path().join("nc-check.yaml");
    std::fs::write(
        &config,
        "checks:\n  compliance: false\n  ocean_cover: false\ncoverage:\n  time_name: time\n",
    )
    .unwrap();
    let out = run(&["all", path_str(&path), "--config", path_str(&config)]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["summary"]["checks_run"], 1);
    assert_eq!(value["check_summary"][0]["check"], "time_cover");
}

#[test]
fn test_comply_writes_snapshot() {
    let (dir, path) = temp_snapshot(&compliant_dataset());
    let output = dir.path().join("fixed.json");
    let out = run(&[
        "comply",
        path_str(&path),
        "--output",
        path_str(&output),
        "--cf-version",
        "1.11",
    ])
    .unwrap();
    assert!(out.is_empty());

    let fixed = LabeledDataset::from_json_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(
        fixed.attrs().get("Conventions").map(|v| v.to_string()),
        Some("CF-1.11".to_string())
    );
}
