//! Heuristic CF metadata checks.
//!
//! A best-effort stand-in for an authoritative CF checker. It produces the
//! same [`Report`] shape so callers can use it whenever the external engine
//! is unavailable.

use nc_common::axis::{classify_dataset, expected_coord_attrs, AxisGuess, AxisType};
use nc_common::time::is_cf_time_units;
use nc_common::{AttrValue, LabeledDataset, Variable};
use serde_json::{json, Value};
use tracing::debug;

use crate::references::reference_findings;
use crate::report::{EngineStatus, Finding, FindingScope, Report};

/// Engine name reported by the heuristic checks.
pub const HEURISTIC_ENGINE: &str = "heuristic";

/// Run every heuristic check against `ds`.
///
/// `cf_version` is the full convention token, e.g. `"CF-1.12"`.
pub fn heuristic_check_dataset(ds: &LabeledDataset, cf_version: &str) -> Report {
    let mut report = Report::new(cf_version, HEURISTIC_ENGINE, EngineStatus::Ok, HEURISTIC_ENGINE);

    if let Some(finding) = conventions_finding(ds, cf_version) {
        report.push_global(finding);
    }

    let (guesses, notes) = classify_dataset(ds);
    report.notes.extend(notes);

    for guess in &guesses {
        let findings = match ds.coord(&guess.dim) {
            Some(coord) => coordinate_findings(guess, coord),
            None => vec![Finding::error(
                "missing_dimension_coordinate",
                format!("Dimension '{}' has no coordinate variable.", guess.dim),
            )
            .expected(format!("coordinate variable named '{}'", guess.dim))
            .fix("create_dimension_coordinate")],
        };
        report.extend(FindingScope::Coordinate(&guess.dim), findings);
    }

    let available = ds.variable_names();
    for var in ds.data_vars() {
        let mut findings = data_variable_findings(var);
        findings.extend(reference_findings(&var.name, &var.attrs, &available));
        report.extend(FindingScope::Variable(&var.name), findings);
    }

    for coord in ds.coords() {
        let findings = reference_findings(&coord.name, &coord.attrs, &available);
        report.extend(FindingScope::Coordinate(&coord.name), findings);
    }

    debug!(
        fatal = report.counts().fatal,
        error = report.counts().error,
        warn = report.counts().warn,
        "Heuristic checks complete"
    );
    report
}

/// Comma-separated parts of a `Conventions` value that name a CF version.
pub fn cf_tokens(conventions: &str) -> Vec<&str> {
    conventions
        .split(',')
        .map(str::trim)
        .filter(|part| part.to_uppercase().starts_with("CF-"))
        .collect()
}

fn conventions_finding(ds: &LabeledDataset, cf_version: &str) -> Option<Finding> {
    let Some(conventions) = ds.attrs().get("Conventions") else {
        return Some(
            Finding::warn("Conventions", "Global attribute 'Conventions' is missing.")
                .expected(format!("include '{cf_version}' in Conventions"))
                .fix("set_global_attr"),
        );
    };

    let text = conventions.to_string();
    if cf_tokens(&text).contains(&cf_version) {
        return None;
    }
    Some(
        Finding::warn(
            "Conventions",
            format!(
                "Global attribute 'Conventions' does not include the expected CF token '{cf_version}'."
            ),
        )
        .current(conventions.to_json())
        .expected(format!("include '{cf_version}'"))
        .fix("set_global_attr"),
    )
}

/// Python-like repr used in messages: quoted text, bare numbers.
pub(crate) fn repr(value: &AttrValue) -> String {
    match value {
        AttrValue::Text(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

fn coordinate_findings(guess: &AxisGuess, coord: &Variable) -> Vec<Finding> {
    let dim = &guess.dim;
    let mut findings = Vec::new();

    for (key, expected) in expected_coord_attrs(guess.axis) {
        let current = coord.attrs.get(*key);
        if current.and_then(AttrValue::as_str) == Some(*expected) {
            continue;
        }
        let current_text = current.map(repr).unwrap_or_else(|| "missing".to_string());
        findings.push(
            Finding::warn(
                format!("coord_attr:{key}"),
                format!(
                    "Coordinate '{dim}' is inferred as {} and expects {key}='{expected}', but found {current_text}.",
                    guess.axis.label()
                ),
            )
            .current(current.map(AttrValue::to_json).unwrap_or(Value::Null))
            .expected(*expected)
            .fix("set_coord_attr"),
        );
    }

    if matches!(guess.axis, AxisType::Lat | AxisType::Lon) && !coord.dtype().is_numeric() {
        findings.push(
            Finding::error(
                "coord_dtype",
                format!("Coordinate '{dim}' has non-numeric dtype '{}'.", coord.dtype()),
            )
            .current(coord.dtype().as_str())
            .expected("numeric")
            .fix("convert_coord_dtype"),
        );
    }

    if guess.axis == AxisType::Time {
        let units = coord
            .attrs
            .get("units")
            .or_else(|| coord.encoding.get("units"));
        match units {
            None if !coord.dtype().is_datetime() => findings.push(
                Finding::error(
                    "coord_attr:units",
                    format!("Time coordinate '{dim}' is missing units metadata."),
                )
                .expected("time units, e.g. 'days since 1970-01-01'")
                .fix("set_coord_attr"),
            ),
            Some(AttrValue::Text(units)) if !is_cf_time_units(units) => findings.push(
                Finding::warn(
                    "coord_attr:units_format",
                    format!("Time coordinate '{dim}' units do not look CF-compliant."),
                )
                .current(units.as_str())
                .expected("units in '<unit> since <epoch>' format")
                .fix("set_coord_attr"),
            ),
            _ => {}
        }
    }

    findings.extend(coordinate_value_findings(coord, guess.axis));
    findings
}

/// Uniqueness, monotonicity and range checks on 1-D numeric or time values.
fn coordinate_value_findings(coord: &Variable, axis: AxisType) -> Vec<Finding> {
    let mut findings = Vec::new();
    if coord.ndim() != 1 || coord.len() < 2 {
        return findings;
    }
    let Some(values) = coord.numeric_values() else {
        return findings;
    };
    let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return findings;
    }
    let name = &coord.name;

    let mut sorted = finite.clone();
    sorted.sort_by(f64::total_cmp);
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        findings.push(
            Finding::warn(
                "coord_not_unique",
                format!("Coordinate '{name}' contains duplicate values."),
            )
            .current("duplicate values present")
            .expected("all coordinate values should be unique")
            .fix("deduplicate_coord_values"),
        );
    }

    let increasing = finite.windows(2).all(|w| w[1] > w[0]);
    let decreasing = finite.windows(2).all(|w| w[1] < w[0]);
    if !increasing && !decreasing {
        findings.push(
            Finding::warn(
                "coord_not_monotonic",
                format!("Coordinate '{name}' is not monotonic."),
            )
            .current("non-monotonic sequence")
            .expected("strictly increasing or decreasing values")
            .fix("sort_coord_values"),
        );
    }

    let (low, high, label, fix) = match axis {
        AxisType::Lat => (-90.0, 90.0, "latitude", "clamp_or_fix_latitudes"),
        AxisType::Lon => (-180.0, 360.0, "longitude", "normalize_longitudes"),
        AxisType::Time => return findings,
    };
    let out_of_range = finite.iter().filter(|v| **v < low || **v > high).count();
    if out_of_range > 0 {
        findings.push(
            Finding::error(
                "coord_values_out_of_range",
                format!("Coordinate '{name}' has {label} values outside [{low}, {high}]."),
            )
            .current(json!({ "out_of_range_count": out_of_range }))
            .expected(format!("{label} values in [{low}, {high}]"))
            .fix(fix),
        );
    }
    findings
}

/// CF variable names start with a letter followed by letters, digits or `_`.
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn data_variable_findings(var: &Variable) -> Vec<Finding> {
    let name = &var.name;
    let mut findings = Vec::new();

    if !is_valid_variable_name(name) {
        findings.push(
            Finding::error(
                "invalid_variable_name",
                format!("Variable '{name}' is not CF-name compliant."),
            )
            .current(name.as_str())
            .expected("start with a letter, then letters/digits/underscore")
            .fix("rename_variable"),
        );
    }

    let units = var.attrs.get("units");
    let standard_name = var.attrs.get("standard_name");

    if var.dtype().is_numeric() && units.is_none() {
        findings.push(
            Finding::warn(
                "missing_units_attr",
                format!("Numeric variable '{name}' is missing 'units'."),
            )
            .expected("UDUNITS-compatible units string")
            .fix("set_variable_attr"),
        );
    }

    if standard_name.is_none() && !var.attrs.contains_key("long_name") {
        findings.push(
            Finding::warn(
                "missing_standard_or_long_name",
                format!("Variable '{name}' is missing both 'standard_name' and 'long_name'."),
            )
            .expected("at least one of: standard_name, long_name")
            .fix("set_variable_attr"),
        );
    }

    if var.dtype() == nc_common::DType::Object {
        findings.push(
            Finding::error(
                "object_dtype_variable",
                format!(
                    "Variable '{name}' uses object dtype, which is not NetCDF-serializable."
                ),
            )
            .current(var.dtype().as_str())
            .expected("netCDF-compatible primitive dtype")
            .fix("cast_variable_dtype"),
        );
    }

    if let (Some(standard_name), None) = (standard_name, units) {
        findings.push(
            Finding::error(
                "missing_units_for_standard_name",
                format!("Variable '{name}' has standard_name='{standard_name}' but no units."),
            )
            .expected("units consistent with standard_name canonical_units")
            .fix("set_variable_attr"),
        );
    }

    findings
}
