//! Integrity of attributes that reference other variables.

use std::collections::BTreeSet;

use nc_common::{AttrValue, Attributes};
use serde_json::json;

use crate::report::Finding;

/// How a reference attribute spells its variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSyntax {
    /// Whitespace-separated variable names.
    NameList,
    /// `"<measure>: <variable>"` pairs.
    MeasurePairs,
}

/// Reference attributes checked on every data and coordinate variable.
pub const REFERENCE_ATTRS: &[(&str, ReferenceSyntax)] = &[
    ("coordinates", ReferenceSyntax::NameList),
    ("bounds", ReferenceSyntax::NameList),
    ("grid_mapping", ReferenceSyntax::NameList),
    ("ancillary_variables", ReferenceSyntax::NameList),
    ("cell_measures", ReferenceSyntax::MeasurePairs),
];

fn as_text(value: &AttrValue) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected string but found {}", value.type_name()))
}

/// Parse a whitespace-separated name list.
pub fn parse_name_list(value: &AttrValue) -> Result<Vec<&str>, String> {
    Ok(as_text(value)?.split_whitespace().collect())
}

/// Parse `"<measure>: <variable>"` pairs, returning the variable names.
pub fn parse_cell_measures(value: &AttrValue) -> Result<Vec<&str>, String> {
    let tokens: Vec<&str> = as_text(value)?.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err("expected one or more '<measure>: <var>' pairs".to_string());
    }

    let mut names = Vec::new();
    let mut pairs = tokens.chunks_exact(2);
    for pair in pairs.by_ref() {
        let (measure, name) = (pair[0], pair[1]);
        if !measure.ends_with(':') {
            return Err("expected '<measure>: <var>' pairs".to_string());
        }
        if name.ends_with(':') {
            return Err("missing variable name after measure".to_string());
        }
        names.push(name);
    }
    if !pairs.remainder().is_empty() {
        return Err("trailing token without a variable name".to_string());
    }
    Ok(names)
}

/// Findings for malformed or dangling reference attributes of one variable.
pub fn reference_findings(
    var_name: &str,
    attrs: &Attributes,
    available: &BTreeSet<String>,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    for (attr_name, syntax) in REFERENCE_ATTRS {
        let Some(raw) = attrs.get(*attr_name) else {
            continue;
        };
        let parsed = match syntax {
            ReferenceSyntax::NameList => parse_name_list(raw),
            ReferenceSyntax::MeasurePairs => parse_cell_measures(raw),
        };
        let names = match parsed {
            Ok(names) => names,
            Err(reason) => {
                findings.push(
                    Finding::warn(
                        format!("invalid_reference_attr:{attr_name}"),
                        format!("Variable '{var_name}' uses invalid '{attr_name}' syntax: {reason}."),
                    )
                    .current(raw.to_json())
                    .expected("valid CF variable reference syntax")
                    .fix("set_variable_attr"),
                );
                continue;
            }
        };

        let missing: BTreeSet<&str> = names
            .into_iter()
            .filter(|name| !available.contains(*name))
            .collect();
        if missing.is_empty() {
            continue;
        }
        let missing: Vec<&str> = missing.into_iter().collect();
        findings.push(
            Finding::error(
                format!("missing_referenced_variable:{attr_name}"),
                format!(
                    "Variable '{var_name}' references missing variables in '{attr_name}': {}.",
                    missing.join(", ")
                ),
            )
            .current(json!({ "attr": raw.to_json(), "missing": missing }))
            .expected("all referenced variables exist in the dataset")
            .fix("fix_variable_references"),
        );
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;

    fn available() -> BTreeSet<String> {
        ["lat", "lon", "time", "area", "sst"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_cell_measures_parsing() {
        let ok = AttrValue::from("area: area volume: vol");
        assert_eq!(parse_cell_measures(&ok).unwrap(), vec!["area", "vol"]);

        let no_colon = AttrValue::from("area area");
        assert_eq!(
            parse_cell_measures(&no_colon).unwrap_err(),
            "expected '<measure>: <var>' pairs"
        );

        let missing_name = AttrValue::from("area: volume:");
        assert_eq!(
            parse_cell_measures(&missing_name).unwrap_err(),
            "missing variable name after measure"
        );

        let trailing = AttrValue::from("area: cell extra");
        assert_eq!(
            parse_cell_measures(&trailing).unwrap_err(),
            "trailing token without a variable name"
        );

        let short = AttrValue::from("area:");
        assert!(parse_cell_measures(&short).is_err());
    }

    #[test]
    fn test_non_text_reference() {
        let mut attrs = Attributes::new();
        attrs.insert("bounds".into(), AttrValue::Int(3));
        let findings = reference_findings("sst", &attrs, &available());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].item(), "invalid_reference_attr:bounds");
        assert!(findings[0].message().contains("expected string but found int"));
    }

    #[test]
    fn test_missing_reference_listed_once() {
        let mut attrs = Attributes::new();
        attrs.insert("coordinates".into(), AttrValue::from("lat lon ghost ghost"));
        let findings = reference_findings("sst", &attrs, &available());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity(), Severity::Error);
        assert_eq!(findings[0].item(), "missing_referenced_variable:coordinates");
        assert_eq!(findings[0].current_value()["missing"], json!(["ghost"]));
    }

    #[test]
    fn test_valid_references_produce_nothing() {
        let mut attrs = Attributes::new();
        attrs.insert("coordinates".into(), AttrValue::from("lat lon"));
        attrs.insert("cell_measures".into(), AttrValue::from("area: area"));
        assert!(reference_findings("sst", &attrs, &available()).is_empty());
    }
}
