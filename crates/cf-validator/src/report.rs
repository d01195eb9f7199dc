//! Compliance report shape shared by every conformance engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// Finding severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Fatal,
    Error,
    Warn,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported problem. Built once through the consuming builder methods,
/// then read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    severity: Severity,
    item: String,
    message: String,
    current: Value,
    expected: Value,
    suggested_fix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    convention: Option<String>,
}

impl Finding {
    pub fn new(severity: Severity, item: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            item: item.into(),
            message: message.into(),
            current: Value::Null,
            expected: Value::Null,
            suggested_fix: String::new(),
            convention: None,
        }
    }

    pub fn fatal(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, item, message)
    }

    pub fn error(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, item, message)
    }

    pub fn warn(item: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, item, message)
    }

    pub fn current(mut self, value: impl Into<Value>) -> Self {
        self.current = value.into();
        self
    }

    pub fn expected(mut self, value: impl Into<Value>) -> Self {
        self.expected = value.into();
        self
    }

    pub fn fix(mut self, code: impl Into<String>) -> Self {
        self.suggested_fix = code.into();
        self
    }

    pub fn convention(mut self, name: impl Into<String>) -> Self {
        self.convention = Some(name.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn current_value(&self) -> &Value {
        &self.current
    }

    pub fn expected_value(&self) -> &Value {
        &self.expected
    }

    pub fn suggested_fix(&self) -> &str {
        &self.suggested_fix
    }

    pub fn convention_tag(&self) -> Option<&str> {
        self.convention.as_deref()
    }
}

/// Severity tallies over every finding of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub fatal: usize,
    pub error: usize,
    pub warn: usize,
}

impl Counts {
    fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Fatal => self.fatal += 1,
            Severity::Error => self.error += 1,
            Severity::Warn => self.warn += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.fatal + self.error + self.warn
    }
}

/// How the engine that produced a report fared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    /// The engine ran normally.
    Ok,
    /// No external engine was configured; heuristic checks ran instead.
    Unavailable,
    /// The external engine failed; heuristic checks ran instead.
    Fallback,
    /// CF checks were not requested.
    Skipped,
}

/// Error recorded when an external engine could not run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl From<EngineError> for CheckerError {
    fn from(err: EngineError) -> Self {
        Self {
            kind: err.kind,
            message: err.message,
        }
    }
}

/// Outcome of comparing a variable's units with the table's canonical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitsStatus {
    Missing,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitsCheck {
    pub status: UnitsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_units: Option<String>,
    pub expected_units: Option<String>,
}

/// Standard-name advice for one data variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableSuggestion {
    Candidates {
        recommended_standard_names: Vec<String>,
        recommended_units: Option<String>,
        domain: Option<String>,
    },
    UnknownStandardName {
        unknown_standard_name: String,
    },
    Units {
        units_check: UnitsCheck,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub variables: BTreeMap<String, VariableSuggestion>,
}

/// Where a finding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingScope<'a> {
    Global,
    Coordinate(&'a str),
    Variable(&'a str),
}

/// Compliance report.
///
/// Findings are only reachable through methods that keep `counts` equal to a
/// fresh tally of every finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub cf_version: String,
    pub engine: String,
    pub engine_status: EngineStatus,
    pub check_method: String,
    global: Vec<Finding>,
    coordinates: BTreeMap<String, Vec<Finding>>,
    variables: BTreeMap<String, Vec<Finding>>,
    counts: Counts,
    pub suggestions: Suggestions,
    pub notes: Vec<String>,
    pub conventions_checked: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checker_error: Option<CheckerError>,
}

impl Report {
    pub fn new(
        cf_version: impl Into<String>,
        engine: impl Into<String>,
        engine_status: EngineStatus,
        check_method: impl Into<String>,
    ) -> Self {
        Self {
            cf_version: cf_version.into(),
            engine: engine.into(),
            engine_status,
            check_method: check_method.into(),
            global: Vec::new(),
            coordinates: BTreeMap::new(),
            variables: BTreeMap::new(),
            counts: Counts::default(),
            suggestions: Suggestions::default(),
            notes: Vec::new(),
            conventions_checked: Vec::new(),
            checker_error: None,
        }
    }

    /// Report for a run where CF checks were not selected.
    pub fn skipped(cf_version: impl Into<String>) -> Self {
        Self::new(cf_version, "none", EngineStatus::Skipped, "conventions_only")
    }

    pub fn push(&mut self, scope: FindingScope<'_>, finding: Finding) {
        self.extend(scope, std::iter::once(finding));
    }

    pub fn push_global(&mut self, finding: Finding) {
        self.push(FindingScope::Global, finding);
    }

    pub fn push_coordinate(&mut self, name: &str, finding: Finding) {
        self.push(FindingScope::Coordinate(name), finding);
    }

    pub fn push_variable(&mut self, name: &str, finding: Finding) {
        self.push(FindingScope::Variable(name), finding);
    }

    /// Append several findings to one scope. Nothing is created for an
    /// empty iterator.
    pub fn extend(&mut self, scope: FindingScope<'_>, findings: impl IntoIterator<Item = Finding>) {
        let mut findings = findings.into_iter().peekable();
        if findings.peek().is_none() {
            return;
        }
        let target = match scope {
            FindingScope::Global => &mut self.global,
            FindingScope::Coordinate(name) => {
                self.coordinates.entry(name.to_string()).or_default()
            }
            FindingScope::Variable(name) => self.variables.entry(name.to_string()).or_default(),
        };
        target.extend(findings);
        self.recount();
    }

    pub fn global(&self) -> &[Finding] {
        &self.global
    }

    pub fn coordinates(&self) -> &BTreeMap<String, Vec<Finding>> {
        &self.coordinates
    }

    pub fn variables(&self) -> &BTreeMap<String, Vec<Finding>> {
        &self.variables
    }

    pub fn coordinate_findings(&self, name: &str) -> &[Finding] {
        self.coordinates.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn variable_findings(&self, name: &str) -> &[Finding] {
        self.variables.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every finding, global scope first.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.global
            .iter()
            .chain(self.coordinates.values().flatten())
            .chain(self.variables.values().flatten())
    }

    pub fn counts(&self) -> Counts {
        self.counts
    }

    fn recount(&mut self) {
        let mut counts = Counts::default();
        for finding in self
            .global
            .iter()
            .chain(self.coordinates.values().flatten())
            .chain(self.variables.values().flatten())
        {
            counts.add(finding.severity);
        }
        self.counts = counts;
    }
}
