//! Axis-role inference for dataset dimensions.
//!
//! Classification is name-first: a dimension literally called `lat` is a
//! latitude axis even when its coordinate attributes say otherwise. Name
//! sets are tried in the order time, lat, lon; attributes only decide when
//! no name matches.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{LabeledDataset, Variable};

pub const TIME_NAMES: &[&str] = &["time", "t"];
pub const LAT_NAMES: &[&str] = &["lat", "latitude", "y"];
pub const LON_NAMES: &[&str] = &["lon", "longitude", "x"];

/// Semantic role of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Lat,
    Lon,
    Time,
}

impl AxisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisType::Lat => "lat",
            AxisType::Lon => "lon",
            AxisType::Time => "time",
        }
    }

    /// Long human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            AxisType::Lat => "latitude",
            AxisType::Lon => "longitude",
            AxisType::Time => "time",
        }
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dimension together with its inferred axis role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisGuess {
    pub dim: String,
    pub axis: AxisType,
}

/// Trim and lower-case a name for comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn name_axis(name: &str) -> Option<AxisType> {
    if TIME_NAMES.contains(&name) {
        Some(AxisType::Time)
    } else if LAT_NAMES.contains(&name) {
        Some(AxisType::Lat)
    } else if LON_NAMES.contains(&name) {
        Some(AxisType::Lon)
    } else {
        None
    }
}

fn normalized_attr(var: &Variable, key: &str) -> String {
    var.attrs
        .get(key)
        .map(|v| normalize_name(&v.to_string()))
        .unwrap_or_default()
}

/// Infer the axis role of `dim` from its name and optional coordinate.
pub fn classify(dim: &str, coord: Option<&Variable>) -> Option<AxisType> {
    let dim_norm = normalize_name(dim);
    let coord_norm = coord
        .map(|c| normalize_name(&c.name))
        .unwrap_or_else(|| dim_norm.clone());

    let [first, second] = [&dim_norm, &coord_norm].map(|n| name_axis(n));
    // Time beats lat beats lon across both names.
    let by_name = [AxisType::Time, AxisType::Lat, AxisType::Lon]
        .into_iter()
        .find(|axis| first == Some(*axis) || second == Some(*axis));
    if by_name.is_some() {
        return by_name;
    }

    let coord = coord?;
    let standard_name = normalized_attr(coord, "standard_name");
    let units = normalized_attr(coord, "units");

    if standard_name == "latitude" || units == "degrees_north" {
        Some(AxisType::Lat)
    } else if standard_name == "longitude" || units == "degrees_east" {
        Some(AxisType::Lon)
    } else if standard_name == "time" {
        Some(AxisType::Time)
    } else {
        None
    }
}

/// Classify one dimension of a dataset using its dimension coordinate.
pub fn guess_axis(ds: &LabeledDataset, dim: &str) -> Option<AxisGuess> {
    classify(dim, ds.coord(dim)).map(|axis| AxisGuess {
        dim: dim.to_string(),
        axis,
    })
}

/// Classify every dimension; unclassifiable ones yield a note.
pub fn classify_dataset(ds: &LabeledDataset) -> (Vec<AxisGuess>, Vec<String>) {
    let mut guesses = Vec::new();
    let mut notes = Vec::new();
    for dim in ds.dims() {
        match guess_axis(ds, &dim.name) {
            Some(guess) => {
                debug!(dim = %guess.dim, axis = %guess.axis, "Classified dimension");
                guesses.push(guess);
            }
            None => notes.push(format!(
                "Could not infer CF axis type for dimension '{}'.",
                dim.name
            )),
        }
    }
    (guesses, notes)
}

/// Canonical coordinate attributes for an axis, in report order.
pub fn expected_coord_attrs(axis: AxisType) -> &'static [(&'static str, &'static str)] {
    match axis {
        AxisType::Lat => &[
            ("standard_name", "latitude"),
            ("long_name", "latitude"),
            ("units", "degrees_north"),
            ("axis", "Y"),
        ],
        AxisType::Lon => &[
            ("standard_name", "longitude"),
            ("long_name", "longitude"),
            ("units", "degrees_east"),
            ("axis", "X"),
        ],
        AxisType::Time => &[("standard_name", "time"), ("axis", "T")],
    }
}
