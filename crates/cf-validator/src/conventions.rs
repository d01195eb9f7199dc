//! Convention selection and the secondary convention checks.

use std::fmt;

use nc_common::dataset::FILL_VALUE_ATTR;
use nc_common::{Attributes, LabeledDataset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ValidatorError, ValidatorResult};
use crate::heuristic::repr;
use crate::report::{Finding, FindingScope, Report};

/// A convention the compliance run can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    Cf,
    Ferret,
}

pub const SUPPORTED_CONVENTIONS: &[Convention] = &[Convention::Cf, Convention::Ferret];
pub const DEFAULT_CONVENTIONS: &[Convention] = &[Convention::Cf, Convention::Ferret];

/// Attribute names whose letter case CF fixes.
pub const CF_ATTR_CASE_KEYS: &[&str] = &[
    "units",
    "standard_name",
    "long_name",
    "axis",
    "calendar",
    "coordinates",
    "bounds",
    "grid_mapping",
    "cell_methods",
    "cell_measures",
    "positive",
];

impl Convention {
    pub fn as_str(&self) -> &'static str {
        match self {
            Convention::Cf => "cf",
            Convention::Ferret => "ferret",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        SUPPORTED_CONVENTIONS
            .iter()
            .copied()
            .find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize requested convention names.
///
/// Each entry may itself be a comma-separated list. Names are trimmed,
/// lower-cased and deduplicated in first-seen order.
pub fn normalize_conventions<S: AsRef<str>>(requested: &[S]) -> ValidatorResult<Vec<Convention>> {
    let mut selected: Vec<String> = Vec::new();
    for part in requested.iter().flat_map(|entry| entry.as_ref().split(',')) {
        let name = part.trim().to_lowercase();
        if !name.is_empty() && !selected.contains(&name) {
            selected.push(name);
        }
    }
    if selected.is_empty() {
        return Err(ValidatorError::NoConventions);
    }

    let mut unknown: Vec<&str> = selected
        .iter()
        .filter(|name| Convention::from_name(name).is_none())
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        unknown.sort_unstable();
        let supported: Vec<&str> = SUPPORTED_CONVENTIONS.iter().map(|c| c.as_str()).collect();
        return Err(ValidatorError::UnsupportedConvention {
            invalid: unknown.join(", "),
            supported: supported.join(", "),
        });
    }

    Ok(selected
        .iter()
        .filter_map(|name| Convention::from_name(name))
        .collect())
}

/// Parse a single comma-separated selection such as `"cf,ferret"`.
pub fn parse_conventions(requested: &str) -> ValidatorResult<Vec<Convention>> {
    normalize_conventions(&[requested])
}

/// Attributes present under a non-canonical case while the canonical name
/// is absent, as `(actual, canonical)` pairs.
pub fn case_mismatched_attr_names(attrs: &Attributes) -> Vec<(String, &'static str)> {
    let mut mismatches = Vec::new();
    for expected in CF_ATTR_CASE_KEYS {
        if attrs.contains_key(*expected) {
            continue;
        }
        for key in attrs.keys() {
            if key.to_lowercase() == *expected && key != expected {
                mismatches.push((key.clone(), *expected));
            }
        }
    }
    mismatches
}

/// Rename case-variant keys to their canonical spelling.
///
/// An existing canonical key wins and the variants are dropped; otherwise
/// the first variant's value moves to the canonical key.
pub fn normalize_attr_key_case(attrs: &mut Attributes) {
    for expected in CF_ATTR_CASE_KEYS {
        let variants: Vec<String> = attrs
            .keys()
            .filter(|key| key.to_lowercase() == *expected && key != expected)
            .cloned()
            .collect();
        let Some(first) = variants.first() else {
            continue;
        };
        if !attrs.contains_key(*expected) {
            if let Some(value) = attrs.get(first).cloned() {
                attrs.insert(expected.to_string(), value);
            }
        }
        for key in &variants {
            attrs.remove(key);
        }
    }
}

fn case_finding(kind: &str, owner: &str, actual: &str, expected: &str) -> Finding {
    Finding::warn(
        "attr_case_mismatch",
        format!("{kind} '{owner}' uses attribute '{actual}' but CF expects '{expected}'."),
    )
    .current(actual)
    .expected(expected)
    .fix("rename_attr_lowercase")
    .convention(Convention::Cf.as_str())
}

/// Flag attribute keys whose case differs from the CF spelling.
pub fn apply_cf_attribute_case_checks(ds: &LabeledDataset, report: &mut Report) {
    for coord in ds.coords() {
        let findings: Vec<Finding> = case_mismatched_attr_names(&coord.attrs)
            .iter()
            .map(|(actual, expected)| case_finding("Coordinate", &coord.name, actual, expected))
            .collect();
        report.extend(FindingScope::Coordinate(&coord.name), findings);
    }
    for var in ds.data_vars() {
        let findings: Vec<Finding> = case_mismatched_attr_names(&var.attrs)
            .iter()
            .map(|(actual, expected)| case_finding("Variable", &var.name, actual, expected))
            .collect();
        report.extend(FindingScope::Variable(&var.name), findings);
    }
}

/// Ferret rejects coordinates that declare a fill value.
pub fn apply_ferret_checks(ds: &LabeledDataset, report: &mut Report) {
    for coord in ds.coords() {
        let mut sources = Map::new();
        let mut details = Vec::new();
        for (source, attrs) in [("attrs", &coord.attrs), ("encoding", &coord.encoding)] {
            if let Some(fill) = attrs.get(FILL_VALUE_ATTR) {
                sources.insert(source.to_string(), fill.to_json());
                details.push(format!("{source}={}", repr(fill)));
            }
        }
        if sources.is_empty() {
            continue;
        }
        report.push_coordinate(
            &coord.name,
            Finding::fatal(
                "coord_fillvalue_forbidden",
                format!(
                    "Coordinate '{}' has forbidden _FillValue ({}).",
                    coord.name,
                    details.join(", ")
                ),
            )
            .current(Value::Object(sources))
            .expected("no _FillValue in coordinate attrs or encoding")
            .fix("clear_coordinate_fillvalue")
            .convention(Convention::Ferret.as_str()),
        );
    }
}

/// Run the secondary checks for every selected convention.
pub fn apply_selected_convention_checks(
    ds: &LabeledDataset,
    report: &mut Report,
    conventions: &[Convention],
) {
    if conventions.contains(&Convention::Cf) {
        apply_cf_attribute_case_checks(ds, report);
    }
    if conventions.contains(&Convention::Ferret) {
        apply_ferret_checks(ds, report);
    }
}
