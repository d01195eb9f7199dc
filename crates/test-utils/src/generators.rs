//! Synthetic gridded datasets for coverage and validation tests.
//!
//! [`GridSpec`] builds a `(time, lat, lon)` variable over a regular grid with
//! predictable values, then punches holes into it: land cells around given
//! points, whole longitude columns, whole time slices. The land mask can be
//! rolled along longitude to simulate a misaligned grid.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use nc_common::{ArrayData, LabeledDataset, LongitudeConvention, Variable};

/// Global longitudes from -180 to 170 in 10 degree steps (36 columns).
pub fn global_lon() -> Vec<f64> {
    (0..36).map(|i| -180.0 + 10.0 * i as f64).collect()
}

/// Global latitudes from -90 to 90 in 10 degree steps (19 rows).
pub fn global_lat() -> Vec<f64> {
    (0..19).map(|i| -90.0 + 10.0 * i as f64).collect()
}

/// Same columns as [`global_lon`] on the 0..360 convention.
pub fn global_lon_positive() -> Vec<f64> {
    (0..36).map(|i| 10.0 * i as f64).collect()
}

/// Daily timestamps starting at 2000-01-01.
pub fn daily_times(n: usize) -> Vec<NaiveDateTime> {
    let start = NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

/// How the time coordinate is stored.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeEncoding {
    /// Decoded timestamps, daily from 2000-01-01.
    DateTime,
    /// Offsets 0, 1, 2, ... with the given CF units string.
    CfUnits(String),
    /// No time dimension at all: the variable is `(lat, lon)`.
    None,
}

/// Builder for a synthetic `(time, lat, lon)` dataset.
#[derive(Debug, Clone)]
pub struct GridSpec {
    pub var_name: String,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub times: usize,
    pub time_encoding: TimeEncoding,
    land: Vec<(f64, f64)>,
    roll: isize,
    missing_columns: Vec<usize>,
    missing_slices: Vec<usize>,
    fill_value: Option<f64>,
}

impl GridSpec {
    /// Global 10 degree grid with `times` daily slices and no holes.
    pub fn global(times: usize) -> Self {
        Self::new(global_lon(), global_lat(), times)
    }

    pub fn new(lon: Vec<f64>, lat: Vec<f64>, times: usize) -> Self {
        Self {
            var_name: "sst".to_string(),
            lon,
            lat,
            times,
            time_encoding: TimeEncoding::DateTime,
            land: Vec::new(),
            roll: 0,
            missing_columns: Vec::new(),
            missing_slices: Vec::new(),
            fill_value: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.var_name = name.into();
        self
    }

    /// Mask the grid cell nearest to each `(lat, lon)` in every time slice.
    pub fn with_land(mut self, points: &[(f64, f64)]) -> Self {
        self.land.extend_from_slice(points);
        self
    }

    /// Shift the land mask by `columns` along longitude (wrapping).
    pub fn rolled(mut self, columns: isize) -> Self {
        self.roll = columns;
        self
    }

    /// Mask whole longitude columns in every time slice.
    pub fn missing_columns(mut self, columns: &[usize]) -> Self {
        self.missing_columns.extend_from_slice(columns);
        self
    }

    /// Mask whole time slices.
    pub fn missing_slices(mut self, slices: &[usize]) -> Self {
        self.missing_slices.extend_from_slice(slices);
        self
    }

    /// Store masked cells as this sentinel declared in `_FillValue` rather than NaN.
    pub fn with_fill_value(mut self, fill: f64) -> Self {
        self.fill_value = Some(fill);
        self
    }

    pub fn cf_time(mut self, units: impl Into<String>) -> Self {
        self.time_encoding = TimeEncoding::CfUnits(units.into());
        self
    }

    pub fn without_time(mut self) -> Self {
        self.time_encoding = TimeEncoding::None;
        self
    }

    fn nearest(values: &[f64], target: f64) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f64::INFINITY), |best, (i, v)| {
                let d = (v - target).abs();
                if d < best.1 {
                    (i, d)
                } else {
                    best
                }
            })
            .0
    }

    /// `(lat, lon)` land mask after rolling.
    fn land_mask(&self) -> Vec<bool> {
        let (ny, nx) = (self.lat.len(), self.lon.len());
        let convention = LongitudeConvention::detect(&self.lon);
        let mut mask = vec![false; ny * nx];
        for &(lat, lon) in &self.land {
            let i = Self::nearest(&self.lat, lat);
            let j = Self::nearest(&self.lon, convention.normalize(lon));
            let shifted = (j as isize + self.roll).rem_euclid(nx as isize) as usize;
            mask[i * nx + shifted] = true;
        }
        mask
    }

    fn coords(&self) -> (Variable, Variable) {
        let lat = Variable::coordinate("lat", ArrayData::Float(self.lat.clone()))
            .with_attr("standard_name", "latitude")
            .with_attr("long_name", "latitude")
            .with_attr("units", "degrees_north")
            .with_attr("axis", "Y");
        let lon = Variable::coordinate("lon", ArrayData::Float(self.lon.clone()))
            .with_attr("standard_name", "longitude")
            .with_attr("long_name", "longitude")
            .with_attr("units", "degrees_east")
            .with_attr("axis", "X");
        (lat, lon)
    }

    fn time_coord(&self) -> Option<Variable> {
        let coord = match &self.time_encoding {
            TimeEncoding::None => return None,
            TimeEncoding::DateTime => Variable::coordinate(
                "time",
                ArrayData::DateTime(daily_times(self.times).into_iter().map(Some).collect()),
            ),
            TimeEncoding::CfUnits(units) => Variable::coordinate(
                "time",
                ArrayData::Float((0..self.times).map(|t| t as f64).collect()),
            )
            .with_attr("units", units.as_str()),
        };
        Some(coord.with_attr("standard_name", "time").with_attr("axis", "T"))
    }

    /// Assemble the dataset: coordinates `time`, `lat`, `lon` and one data
    /// variable spanning all of them.
    pub fn build(&self) -> LabeledDataset {
        let (ny, nx) = (self.lat.len(), self.lon.len());
        let has_time = self.time_encoding != TimeEncoding::None;
        let nt = if has_time { self.times } else { 1 };
        let land = self.land_mask();
        let missing = self.fill_value.unwrap_or(f64::NAN);

        let mut values = Vec::with_capacity(nt * ny * nx);
        for t in 0..nt {
            let slice_missing = has_time && self.missing_slices.contains(&t);
            for i in 0..ny {
                for j in 0..nx {
                    let masked = slice_missing || land[i * nx + j] || self.missing_columns.contains(&j);
                    values.push(if masked {
                        missing
                    } else {
                        280.0 + i as f64 + 0.01 * j as f64 + 0.1 * t as f64
                    });
                }
            }
        }

        let (dims, shape): (Vec<&str>, Vec<usize>) = if has_time {
            (vec!["time", "lat", "lon"], vec![nt, ny, nx])
        } else {
            (vec!["lat", "lon"], vec![ny, nx])
        };
        let mut var = Variable::new(self.var_name.as_str(), &dims, &shape, ArrayData::Float(values))
            .unwrap_or_else(|e| panic!("synthetic grid has inconsistent shape: {e}"))
            .with_attr("standard_name", "sea_surface_temperature")
            .with_attr("long_name", "sea surface temperature")
            .with_attr("units", "K");
        if let Some(fill) = self.fill_value {
            var = var.with_attr("_FillValue", fill);
        }

        let (lat, lon) = self.coords();
        let mut ds = LabeledDataset::new().with_attr("Conventions", "CF-1.12");
        for coord in self.time_coord().into_iter().chain([lat, lon]) {
            ds.insert_coord(coord)
                .unwrap_or_else(|e| panic!("synthetic coordinate rejected: {e}"));
        }
        ds.insert_data_var(var)
            .unwrap_or_else(|e| panic!("synthetic variable rejected: {e}"));
        ds
    }
}
