//! Options for a compliance run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::conventions::{normalize_conventions, Convention, DEFAULT_CONVENTIONS};
use crate::error::ValidatorResult;

/// CF version checked when none is configured.
pub const DEFAULT_CF_VERSION: &str = "1.12";

/// Options for [`check_dataset_compliant`](crate::engine::check_dataset_compliant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceOptions {
    /// CF version, with or without the `CF-` prefix.
    pub cf_version: String,

    /// Conventions to check. Entries may be comma-separated lists.
    pub conventions: Vec<String>,

    /// Science domain used to rank standard-name suggestions.
    pub domain: Option<String>,

    /// Run the heuristic checks when the external engine fails.
    pub fallback_to_heuristic: bool,

    /// Local CF standard-name table XML file.
    pub standard_name_table: Option<PathBuf>,
}

impl Default for ComplianceOptions {
    fn default() -> Self {
        Self {
            cf_version: DEFAULT_CF_VERSION.to_string(),
            conventions: DEFAULT_CONVENTIONS
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            domain: None,
            fallback_to_heuristic: true,
            standard_name_table: None,
        }
    }
}

impl ComplianceOptions {
    /// Load options from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("NC_CHECK_CF_VERSION") {
            config.cf_version = val;
        }

        if let Ok(val) = std::env::var("NC_CHECK_CONVENTIONS") {
            config.conventions = vec![val];
        }

        if let Ok(val) = std::env::var("NC_CHECK_DOMAIN") {
            if !val.trim().is_empty() {
                config.domain = Some(val);
            }
        }

        if let Ok(val) = std::env::var("NC_CHECK_STANDARD_NAME_TABLE") {
            if !val.trim().is_empty() {
                config.standard_name_table = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("NC_CHECK_FALLBACK") {
            config.fallback_to_heuristic = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), String> {
        if self.cf_version.trim().trim_start_matches("CF-").is_empty() {
            return Err("cf_version must not be empty".to_string());
        }

        self.selected_conventions().map_err(|e| e.to_string())?;

        Ok(())
    }

    /// The CF version as a `Conventions` token, e.g. `"CF-1.12"`.
    pub fn cf_version_tag(&self) -> String {
        format_cf_version(&self.cf_version)
    }

    /// Normalized convention selection.
    pub fn selected_conventions(&self) -> ValidatorResult<Vec<Convention>> {
        normalize_conventions(&self.conventions)
    }
}

/// Prefix `version` with `CF-` unless it already carries it.
pub fn format_cf_version(version: &str) -> String {
    let version = version.trim();
    if version.starts_with("CF-") {
        version.to_string()
    } else {
        format!("CF-{version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ComplianceOptions::default();
        assert_eq!(options.cf_version_tag(), "CF-1.12");
        assert_eq!(
            options.selected_conventions().unwrap(),
            vec![Convention::Cf, Convention::Ferret]
        );
        assert!(options.fallback_to_heuristic);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_format_cf_version() {
        assert_eq!(format_cf_version("1.11"), "CF-1.11");
        assert_eq!(format_cf_version("CF-1.11"), "CF-1.11");
    }

    #[test]
    fn test_validate_rejects_bad_options() {
        let options = ComplianceOptions {
            conventions: vec!["acdd".into()],
            ..Default::default()
        };
        assert!(options.validate().unwrap_err().contains("Unsupported conventions: acdd"));

        let options = ComplianceOptions {
            cf_version: "CF-".into(),
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: ComplianceOptions = serde_json::from_str(r#"{"conventions": ["ferret"]}"#).unwrap();
        assert_eq!(options.cf_version, DEFAULT_CF_VERSION);
        assert_eq!(options.selected_conventions().unwrap(), vec![Convention::Ferret]);
    }
}
