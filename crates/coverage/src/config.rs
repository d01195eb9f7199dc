//! Configuration for coverage analysis.

use serde::{Deserialize, Serialize};

/// Longitude span (degrees) at or above which a grid counts as global.
pub const GLOBAL_MIN_LON_SPAN: f64 = 300.0;

/// Latitude span (degrees) at or above which a grid counts as global.
pub const GLOBAL_MIN_LAT_SPAN: f64 = 120.0;

/// Preferred time dimension name.
pub const DEFAULT_TIME_NAME: &str = "time";

/// Points expected to be masked on an ocean-only grid, as `(name, lat, lon)`.
pub const LAND_REFERENCE_POINTS: &[(&str, f64, f64)] = &[
    ("sahara", 23.0, 13.0),
    ("australia_interior", -25.0, 134.0),
    ("mongolia", 47.0, 103.0),
    ("greenland_interior", 72.0, -40.0),
    ("south_america_interior", -15.0, -60.0),
];

/// Points expected to hold data on an ocean grid, as `(name, lat, lon)`.
pub const OCEAN_REFERENCE_POINTS: &[(&str, f64, f64)] = &[
    ("equatorial_pacific", 0.0, -140.0),
    ("north_atlantic", 30.0, -40.0),
    ("indian_ocean", -30.0, 80.0),
    ("south_pacific", -45.0, -150.0),
    ("west_pacific", 10.0, 160.0),
];

/// A named geographic location used by the land/ocean alignment check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl ReferencePoint {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            lat,
            lon,
        }
    }
}

fn points(table: &[(&str, f64, f64)]) -> Vec<ReferencePoint> {
    table
        .iter()
        .map(|(name, lat, lon)| ReferencePoint::new(*name, *lat, *lon))
        .collect()
}

/// Configuration for coverage analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    /// Variable to check. All matching data variables when unset.
    pub var_name: Option<String>,

    /// Longitude coordinate name. Inferred when unset.
    pub lon_name: Option<String>,

    /// Latitude coordinate name. Inferred when unset.
    pub lat_name: Option<String>,

    /// Preferred time dimension name.
    pub time_name: Option<String>,

    /// Look for persistent missing longitude bands.
    pub check_edge_of_map: bool,

    /// Compare land/ocean masking against reference points.
    pub check_land_ocean_offset: bool,

    /// Report fully missing time slices.
    pub check_time_missing: bool,

    pub land_points: Vec<ReferencePoint>,

    pub ocean_points: Vec<ReferencePoint>,

    /// Minimum longitude span of a global grid, in degrees.
    pub global_min_lon_span: f64,

    /// Minimum latitude span of a global grid, in degrees.
    pub global_min_lat_span: f64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            var_name: None,
            lon_name: None,
            lat_name: None,
            time_name: Some(DEFAULT_TIME_NAME.to_string()),
            check_edge_of_map: true,
            check_land_ocean_offset: true,
            check_time_missing: true,
            land_points: points(LAND_REFERENCE_POINTS),
            ocean_points: points(OCEAN_REFERENCE_POINTS),
            global_min_lon_span: GLOBAL_MIN_LON_SPAN,
            global_min_lat_span: GLOBAL_MIN_LAT_SPAN,
        }
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

impl CoverageConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("NC_CHECK_EDGE_OF_MAP") {
            config.check_edge_of_map = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("NC_CHECK_LAND_OCEAN") {
            config.check_land_ocean_offset = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("NC_CHECK_TIME_MISSING") {
            config.check_time_missing = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("NC_CHECK_GLOBAL_LON_SPAN") {
            if let Ok(span) = val.parse() {
                config.global_min_lon_span = span;
            }
        }

        if let Ok(val) = std::env::var("NC_CHECK_GLOBAL_LAT_SPAN") {
            if let Ok(span) = val.parse() {
                config.global_min_lat_span = span;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.global_min_lon_span > 0.0 && self.global_min_lon_span <= 360.0) {
            return Err("global_min_lon_span must be in (0, 360]".to_string());
        }

        if !(self.global_min_lat_span > 0.0 && self.global_min_lat_span <= 180.0) {
            return Err("global_min_lat_span must be in (0, 180]".to_string());
        }

        for point in self.land_points.iter().chain(&self.ocean_points) {
            if !(-90.0..=90.0).contains(&point.lat) || !point.lon.is_finite() {
                return Err(format!(
                    "reference point '{}' has invalid location ({}, {})",
                    point.name, point.lat, point.lon
                ));
            }
        }

        Ok(())
    }
}
