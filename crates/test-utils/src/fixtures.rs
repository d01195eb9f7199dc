//! Ready-made datasets for validator, facade and CLI tests.

use std::path::{Path, PathBuf};

use nc_common::{ArrayData, LabeledDataset, Variable};

use crate::generators::GridSpec;

/// Reference points used by the synthetic land/ocean fixtures, as `(lat, lon)`.
///
/// They mirror the default land points of the coverage configuration.
pub const LAND_POINTS: &[(f64, f64)] = &[
    (23.0, 13.0),
    (-25.0, 134.0),
    (47.0, 103.0),
    (72.0, -40.0),
    (-15.0, -60.0),
];

/// Small CF-clean grid: `sst(time, lat, lon)` with fully described coordinates.
pub fn compliant_dataset() -> LabeledDataset {
    GridSpec::new(vec![0.0, 90.0, 180.0, 270.0], vec![-45.0, 0.0, 45.0], 2)
        .cf_time("days since 2000-01-01")
        .build()
}

/// Global ocean grid with land masked at [`LAND_POINTS`].
pub fn ocean_dataset(times: usize) -> LabeledDataset {
    GridSpec::global(times).with_land(LAND_POINTS).build()
}

/// A dataset with a little of everything wrong:
///
/// - no `Conventions`
/// - `lat` without attributes and with two values out of range
/// - `lon` as text
/// - a `time` dimension with no coordinate
/// - `temp` without units referencing a `ghost` coordinate
/// - `9bad` with an invalid name
pub fn messy_dataset() -> LabeledDataset {
    let lat = Variable::coordinate(
        "lat",
        ArrayData::Float(vec![-91.0, -90.0, 0.0, 90.0, 91.0]),
    );
    let lon = Variable::coordinate(
        "lon",
        ArrayData::Text(vec!["0".into(), "120".into(), "240".into()]),
    )
    .with_attr("Units", "degrees_east");
    let temp = Variable::new(
        "temp",
        &["time", "lat", "lon"],
        &[2, 5, 3],
        ArrayData::Float(vec![1.0; 30]),
    )
    .unwrap_or_else(|e| panic!("messy fixture has inconsistent shape: {e}"))
    .with_attr("long_name", "temperature")
    .with_attr("coordinates", "lat lon ghost");
    let bad = Variable::new("9bad", &["lat"], &[5], ArrayData::Int(vec![0; 5]))
        .unwrap_or_else(|e| panic!("messy fixture has inconsistent shape: {e}"));

    let mut ds = LabeledDataset::new();
    for coord in [lat, lon] {
        ds.insert_coord(coord)
            .unwrap_or_else(|e| panic!("messy fixture coordinate rejected: {e}"));
    }
    for var in [temp, bad] {
        ds.insert_data_var(var)
            .unwrap_or_else(|e| panic!("messy fixture variable rejected: {e}"));
    }
    ds
}

/// Write `ds` as a JSON snapshot into `dir` and return the file path.
pub fn write_snapshot(dir: &Path, name: &str, ds: &LabeledDataset) -> PathBuf {
    let path = dir.join(name);
    let json = ds
        .to_json_string()
        .unwrap_or_else(|e| panic!("snapshot serialization failed: {e}"));
    std::fs::write(&path, json).unwrap_or_else(|e| panic!("writing {}: {e}", path.display()));
    path
}

/// Create a temporary directory holding `ds` as `dataset.json`.
///
/// Keep the returned guard alive for as long as the file is needed.
pub fn temp_snapshot(ds: &LabeledDataset) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("creating temp dir: {e}"));
    let path = write_snapshot(dir.path(), "dataset.json", ds);
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_round_trip() {
        let ds = compliant_dataset();
        let (_dir, path) = temp_snapshot(&ds);
        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(LabeledDataset::from_json_str(&text).unwrap(), ds);
    }

    #[test]
    fn test_messy_dims() {
        let ds = messy_dataset();
        assert_eq!(ds.dim_size("time"), Some(2));
        assert!(ds.coord("time").is_none());
    }
}
