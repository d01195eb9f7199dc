//! Options for a combined check run.

use std::fmt;
use std::str::FromStr;

use cf_validator::ComplianceOptions;
use coverage::CoverageConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CheckError, NcCheckResult};

/// One of the checks a combined run can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    Compliance,
    OceanCover,
    TimeCover,
}

impl CheckName {
    pub const ALL: [CheckName; 3] = [CheckName::Compliance, CheckName::OceanCover, CheckName::TimeCover];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckName::Compliance => "compliance",
            CheckName::OceanCover => "ocean_cover",
            CheckName::TimeCover => "time_cover",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CheckName {
    type Err = CheckError;

    /// Accepts `ocean_cover` and `ocean-cover` spellings, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        CheckName::ALL
            .into_iter()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| CheckError::UnsupportedCheck(s.trim().to_string()))
    }
}

/// Which checks a combined run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksEnabled {
    pub compliance: bool,
    pub ocean_cover: bool,
    pub time_cover: bool,
}

impl Default for ChecksEnabled {
    fn default() -> Self {
        Self {
            compliance: true,
            ocean_cover: true,
            time_cover: true,
        }
    }
}

impl ChecksEnabled {
    /// Enable exactly the named checks. Entries may be comma-separated.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> NcCheckResult<Self> {
        let mut enabled = Self {
            compliance: false,
            ocean_cover: false,
            time_cover: false,
        };
        for part in names.iter().flat_map(|n| n.as_ref().split(',')) {
            if part.trim().is_empty() {
                continue;
            }
            match part.parse::<CheckName>()? {
                CheckName::Compliance => enabled.compliance = true,
                CheckName::OceanCover => enabled.ocean_cover = true,
                CheckName::TimeCover => enabled.time_cover = true,
            }
        }
        Ok(enabled)
    }

    pub fn is_enabled(&self, check: CheckName) -> bool {
        match check {
            CheckName::Compliance => self.compliance,
            CheckName::OceanCover => self.ocean_cover,
            CheckName::TimeCover => self.time_cover,
        }
    }

    pub fn any(&self) -> bool {
        self.compliance || self.ocean_cover || self.time_cover
    }
}

/// Everything a combined run needs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    pub checks: ChecksEnabled,
    pub compliance: ComplianceOptions,
    pub coverage: CoverageConfig,
}

impl CheckOptions {
    /// Load options from environment variables.
    pub fn from_env() -> Self {
        Self {
            checks: ChecksEnabled::default(),
            compliance: ComplianceOptions::from_env(),
            coverage: CoverageConfig::from_env(),
        }
    }

    /// Parse options from a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> NcCheckResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Validate the options.
    pub fn validate(&self) -> Result<(), String> {
        if !self.checks.any() {
            return Err("At least one check must be enabled.".to_string());
        }
        self.compliance.validate()?;
        self.coverage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_name_parsing() {
        assert_eq!("ocean-cover".parse::<CheckName>().unwrap(), CheckName::OceanCover);
        assert_eq!(" Time_Cover ".parse::<CheckName>().unwrap(), CheckName::TimeCover);
        let err = "lint".parse::<CheckName>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported check 'lint'. Supported checks: compliance, ocean_cover, time_cover."
        );
    }

    #[test]
    fn test_checks_from_names() {
        let checks = ChecksEnabled::from_names(&["compliance,time_cover"]).unwrap();
        assert!(checks.compliance && checks.time_cover && !checks.ocean_cover);

        let none: [&str; 0] = [];
        assert!(!ChecksEnabled::from_names(&none).unwrap().any());
    }

    #[test]
    fn test_yaml_partial_options() {
        let yaml = "checks:\n  time_cover: false\ncompliance:\n  cf_version: \"1.11\"\ncoverage:\n  check_edge_of_map: false\n";
        let options = CheckOptions::from_yaml_str(yaml).unwrap();
        assert!(options.checks.compliance && !options.checks.time_cover);
        assert_eq!(options.compliance.cf_version_tag(), "CF-1.11");
        assert_eq!(options.compliance.conventions, vec!["cf", "ferret"]);
        assert!(!options.coverage.check_edge_of_map);
        assert!(options.coverage.check_land_ocean_offset);
    }

    #[test]
    fn test_validate() {
        assert!(CheckOptions::default().validate().is_ok());

        let mut options = CheckOptions::default();
        options.checks = ChecksEnabled {
            compliance: false,
            ocean_cover: false,
            time_cover: false,
        };
        assert!(options.validate().is_err());

        let mut options = CheckOptions::default();
        options.compliance.conventions = vec!["coards".into()];
        assert!(options.validate().is_err());
    }
}
