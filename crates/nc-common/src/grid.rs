//! Grid geometry helpers for regular lat/lon grids.
//!
//! Longitude convention detection, reference-point normalization, extents and
//! nearest-cell lookup. All helpers ignore NaN coordinate values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used when deciding which longitude convention a grid follows.
pub const LON_CONVENTION_EPS: f64 = 1e-6;

/// Longitude convention of a grid's coordinate values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LongitudeConvention {
    /// All values in [-180, 180].
    #[serde(rename = "-180_180")]
    Signed,
    /// All values in [0, 360].
    #[serde(rename = "0_360")]
    Positive,
    #[serde(rename = "other")]
    Other,
}

impl LongitudeConvention {
    /// Classify longitude values. `[-180, 180]` wins over `[0, 360]` when both fit.
    pub fn detect(lon_values: &[f64]) -> Self {
        let Some(extent) = AxisExtent::of(lon_values) else {
            return Self::Other;
        };
        if extent.min >= -180.0 - LON_CONVENTION_EPS && extent.max <= 180.0 + LON_CONVENTION_EPS {
            Self::Signed
        } else if extent.min >= -LON_CONVENTION_EPS && extent.max <= 360.0 + LON_CONVENTION_EPS {
            Self::Positive
        } else {
            Self::Other
        }
    }

    /// Map a longitude into this convention. `Other` leaves it unchanged.
    pub fn normalize(&self, lon: f64) -> f64 {
        match self {
            Self::Positive => lon.rem_euclid(360.0),
            Self::Signed => (lon + 180.0).rem_euclid(360.0) - 180.0,
            Self::Other => lon,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Signed => "-180_180",
            Self::Positive => "0_360",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LongitudeConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Finite min/max of one coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisExtent {
    pub min: f64,
    pub max: f64,
}

impl AxisExtent {
    /// Extent of the non-NaN values, or `None` when there are none.
    pub fn of(values: &[f64]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(e) => Some(Self {
                    min: e.min.min(v),
                    max: e.max.max(v),
                }),
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Whether a grid covers the globe given minimum longitude/latitude spans.
pub fn is_global_grid(
    lon: Option<AxisExtent>,
    lat: Option<AxisExtent>,
    min_lon_span: f64,
    min_lat_span: f64,
) -> bool {
    match (lon, lat) {
        (Some(lon), Some(lat)) => lon.span() >= min_lon_span && lat.span() >= min_lat_span,
        _ => false,
    }
}

/// Index of the value nearest to `target`. Ties resolve to the lower index.
pub fn nearest_index(values: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let distance = (v - target).abs();
        if distance.is_nan() {
            continue;
        }
        match best {
            Some((_, d)) if d <= distance => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_convention() {
        assert_eq!(
            LongitudeConvention::detect(&[-180.0, 0.0, 179.5]),
            LongitudeConvention::Signed
        );
        assert_eq!(
            LongitudeConvention::detect(&[0.0, 90.0, 359.75]),
            LongitudeConvention::Positive
        );
        assert_eq!(
            LongitudeConvention::detect(&[-200.0, 0.0]),
            LongitudeConvention::Other
        );
        // Values inside both ranges count as signed.
        assert_eq!(
            LongitudeConvention::detect(&[0.0, 10.0, f64::NAN]),
            LongitudeConvention::Signed
        );
        assert_eq!(LongitudeConvention::detect(&[]), LongitudeConvention::Other);
    }

    #[test]
    fn test_normalize() {
        let signed = LongitudeConvention::Signed;
        assert_eq!(signed.normalize(200.0), -160.0);
        assert_eq!(signed.normalize(-140.0), -140.0);
        let positive = LongitudeConvention::Positive;
        assert_eq!(positive.normalize(-140.0), 220.0);
        assert_eq!(positive.normalize(13.0), 13.0);
        assert_eq!(LongitudeConvention::Other.normalize(-140.0), -140.0);
    }

    #[test]
    fn test_convention_serde_names() {
        let json = serde_json::to_string(&LongitudeConvention::Signed).unwrap();
        assert_eq!(json, "\"-180_180\"");
        let parsed: LongitudeConvention = serde_json::from_str("\"0_360\"").unwrap();
        assert_eq!(parsed, LongitudeConvention::Positive);
    }

    #[test]
    fn test_extent_ignores_nan() {
        let extent = AxisExtent::of(&[f64::NAN, -10.0, 30.0]).unwrap();
        assert_eq!(extent.min, -10.0);
        assert_eq!(extent.span(), 40.0);
        assert!(AxisExtent::of(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_is_global_grid() {
        let lon = AxisExtent::of(&[-180.0, 170.0]);
        let lat = AxisExtent::of(&[-90.0, 90.0]);
        assert!(is_global_grid(lon, lat, 300.0, 120.0));

        let regional = AxisExtent::of(&[-10.0, 40.0]);
        assert!(!is_global_grid(regional, lat, 300.0, 120.0));
    }

    #[test]
    fn test_nearest_index() {
        let values = [-20.0, -10.0, 0.0, 10.0];
        assert_eq!(nearest_index(&values, -12.0), Some(1));
        assert_eq!(nearest_index(&values, -15.0), Some(0));
        assert_eq!(nearest_index(&values, 99.0), Some(3));
        assert_eq!(nearest_index(&[], 0.0), None);
    }
}
