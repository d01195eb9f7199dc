//! Report rendering: JSON, YAML or a plain-text summary.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use cf_validator::Report;
use coverage::AggregateReport;
use serde::Serialize;

use crate::error::{CheckError, NcCheckResult};
use crate::summary::{
    compliance_detail, compliance_status, variable_detail, variable_status, FullReport, SummaryStatus,
};

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Json,
    Yaml,
    Summary,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
            ReportFormat::Summary => "summary",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            "summary" => Ok(ReportFormat::Summary),
            _ => Err(CheckError::UnsupportedFormat(s.trim().to_string())),
        }
    }
}

/// Reject option combinations that cannot be honored.
pub fn validate_output(format: ReportFormat, report_file: Option<&Path>) -> NcCheckResult<()> {
    if format == ReportFormat::Summary && report_file.is_some() {
        return Err(CheckError::conflicting(
            "a report file requires the json or yaml format, not summary",
        ));
    }
    Ok(())
}

/// Plain-text rendering, one line per check.
pub trait Summarize {
    fn summary_lines(&self) -> Vec<String>;
}

fn line(check: &str, status: SummaryStatus, detail: &str) -> String {
    let status = status.as_str();
    format!("{check:<12} {status:<5} {detail}")
}

impl Summarize for Report {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![line(
            "compliance",
            compliance_status(self),
            &compliance_detail(self),
        )];
        let scoped = self
            .global()
            .iter()
            .map(|f| ("global".to_string(), f))
            .chain(
                self.coordinates()
                    .iter()
                    .flat_map(|(name, fs)| fs.iter().map(move |f| (format!("coordinate {name}"), f))),
            )
            .chain(
                self.variables()
                    .iter()
                    .flat_map(|(name, fs)| fs.iter().map(move |f| (format!("variable {name}"), f))),
            );
        for (scope, finding) in scoped {
            lines.push(format!(
                "  [{}] {scope}: {}",
                finding.severity().as_str(),
                finding.message()
            ));
        }
        lines.extend(self.notes.iter().map(|note| format!("  note: {note}")));
        lines
    }
}

impl Summarize for AggregateReport {
    fn summary_lines(&self) -> Vec<String> {
        self.iter()
            .map(|r| line(&r.variable, variable_status(r), &variable_detail(r)))
            .collect()
    }
}

impl Summarize for FullReport {
    fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .check_summary
            .iter()
            .map(|s| line(s.check.as_str(), s.status, &s.detail))
            .collect();
        lines.push(line("overall", self.summary.overall_status, ""));
        lines
    }
}

/// Render `report` in `format`.
pub fn render<T: Serialize + Summarize>(report: &T, format: ReportFormat) -> NcCheckResult<String> {
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        ReportFormat::Summary => {
            let mut text = report.summary_lines().join("\n");
            text.push('\n');
            Ok(text)
        }
    }
}

/// Write rendered text to `path`.
pub fn write_report(text: &str, path: &Path) -> NcCheckResult<()> {
    std::fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_validator::{EngineStatus, Finding};

    fn report() -> Report {
        let mut report = Report::new("CF-1.12", "heuristic", EngineStatus::Ok, "heuristic");
        report.push_variable(
            "temp",
            Finding::warn("missing_units_attr", "Numeric variable 'temp' is missing 'units'."),
        );
        report
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("YAML".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert_eq!("yml".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert!(matches!(
            "html".parse::<ReportFormat>(),
            Err(CheckError::UnsupportedFormat(f)) if f == "html"
        ));
    }

    #[test]
    fn test_summary_with_file_conflicts() {
        let path = Path::new("report.json");
        assert!(matches!(
            validate_output(ReportFormat::Summary, Some(path)),
            Err(CheckError::ConflictingOptions(_))
        ));
        assert!(validate_output(ReportFormat::Json, Some(path)).is_ok());
        assert!(validate_output(ReportFormat::Summary, None).is_ok());
    }

    #[test]
    fn test_render_summary() {
        let text = render(&report(), ReportFormat::Summary).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("compliance"));
        assert!(lines[0].contains("warn"));
        assert!(lines[0].ends_with("fatal=0 error=0 warn=1"));
        assert_eq!(
            lines[1],
            "  [WARN] variable temp: Numeric variable 'temp' is missing 'units'."
        );
    }

    #[test]
    fn test_render_json_and_yaml() {
        let json = render(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["engine"], "heuristic");

        let yaml = render(&report(), ReportFormat::Yaml).unwrap();
        assert!(yaml.contains("engine: heuristic"));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let json = render(&report(), ReportFormat::Json).unwrap();
        write_report(&json, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), json);

        let missing = dir.path().join("no-such-dir").join("report.json");
        assert!(matches!(write_report(&json, &missing), Err(CheckError::Io(_))));
    }
}
