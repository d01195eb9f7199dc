//! Edge-of-map detection: longitude columns missing in every sampled slice.
//!
//! Samples the last time slice, the first, and (for more than two slices) the
//! middle one. A column is reported only when the last and first samples
//! agree on a non-empty set of fully missing columns and the middle sample
//! (when taken) shows the same set.

use nc_common::{value_ranges, MaskReduce};
use tracing::debug;

use crate::axes::{HorizontalAxis, TimeAxis};
use crate::report::EdgeOfMapResult;

/// Longitude indices whose column is entirely missing at `time_index`.
fn missing_columns(mask: &impl MaskReduce, lon_axis: usize, time: Option<(TimeAxis, usize)>) -> Vec<usize> {
    let fixed: Vec<(usize, usize)> = time
        .map(|(t, index)| vec![(t.axis, index)])
        .unwrap_or_default();
    mask.all_missing_along(lon_axis, &fixed)
        .into_iter()
        .enumerate()
        .filter_map(|(i, missing)| missing.then_some(i))
        .collect()
}

/// Run the edge-of-map check on one variable's mask.
pub fn edge_of_map_check(
    mask: &impl MaskReduce,
    lon_axis: usize,
    time: Option<TimeAxis>,
    lon: &HorizontalAxis<'_>,
) -> EdgeOfMapResult {
    let (sampled, persistent) = match time {
        None => (vec![0], missing_columns(mask, lon_axis, None)),
        Some(t) if t.size == 0 => (Vec::new(), Vec::new()),
        Some(t) => {
            let last = t.size - 1;
            let first = 0;
            let mut sampled = vec![last];
            if first != last {
                sampled.push(first);
            }
            let missing_last = missing_columns(mask, lon_axis, Some((t, last)));
            let missing_first = missing_columns(mask, lon_axis, Some((t, first)));

            let mut persistent = Vec::new();
            if !missing_last.is_empty() && missing_last == missing_first {
                persistent = missing_last;
                if t.size > 2 {
                    let middle = t.size / 2;
                    if !sampled.contains(&middle) {
                        sampled.push(middle);
                    }
                    if missing_columns(mask, lon_axis, Some((t, middle))) != persistent {
                        persistent.clear();
                    }
                }
            }
            (sampled, persistent)
        }
    };

    debug!(
        sampled = ?sampled,
        missing = persistent.len(),
        "Edge-of-map check"
    );
    let missing_longitudes = persistent
        .iter()
        .map(|&i| lon.values.get(i).copied().unwrap_or(f64::NAN))
        .collect();
    let ranges = value_ranges(&persistent, lon.coord);
    EdgeOfMapResult::new(sampled, missing_longitudes, ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckStatus;
    use nc_common::{ArrayData, MissingMask, Variable};

    /// `(time, lon)` variable; `gaps[t]` lists missing columns of slice `t`.
    fn field(times: usize, lons: usize, gaps: &[&[usize]]) -> Variable {
        let mut values = vec![1.0; times * lons];
        for (t, columns) in gaps.iter().enumerate() {
            for &c in *columns {
                values[t * lons + c] = f64::NAN;
            }
        }
        Variable::new("sst", &["time", "lon"], &[times, lons], ArrayData::Float(values)).unwrap()
    }

    fn lon_axis(coord: &Variable) -> HorizontalAxis<'_> {
        HorizontalAxis {
            name: "lon".into(),
            dim: "lon".into(),
            coord,
            values: coord.numeric_values().unwrap(),
        }
    }

    fn lon_coord() -> Variable {
        Variable::coordinate("lon", ArrayData::Float(vec![0.0, 90.0, 180.0, 270.0]))
    }

    #[test]
    fn test_persistent_column_reported() {
        let var = field(3, 4, &[&[3], &[3], &[3]]);
        let coord = lon_coord();
        let result = edge_of_map_check(
            &MissingMask::new(&var),
            1,
            Some(TimeAxis { axis: 0, size: 3 }),
            &lon_axis(&coord),
        );
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.sampled_time_indices, vec![2, 0, 1]);
        assert_eq!(result.missing_longitudes, vec![270.0]);
        assert_eq!(result.missing_longitude_count, 1);
        assert_eq!(result.missing_longitude_ranges.len(), 1);
    }

    #[test]
    fn test_change_at_middle_not_reported() {
        let var = field(3, 4, &[&[3], &[], &[3]]);
        let coord = lon_coord();
        let result = edge_of_map_check(
            &MissingMask::new(&var),
            1,
            Some(TimeAxis { axis: 0, size: 3 }),
            &lon_axis(&coord),
        );
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.missing_longitudes.is_empty());
        assert_eq!(result.sampled_time_indices, vec![2, 0, 1]);
    }

    #[test]
    fn test_first_last_disagree_skips_middle() {
        let var = field(4, 4, &[&[0], &[0], &[0], &[1]]);
        let coord = lon_coord();
        let result = edge_of_map_check(
            &MissingMask::new(&var),
            1,
            Some(TimeAxis { axis: 0, size: 4 }),
            &lon_axis(&coord),
        );
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.sampled_time_indices, vec![3, 0]);
    }

    #[test]
    fn test_single_slice_and_no_time() {
        let var = field(1, 4, &[&[0, 1]]);
        let coord = lon_coord();
        let result = edge_of_map_check(
            &MissingMask::new(&var),
            1,
            Some(TimeAxis { axis: 0, size: 1 }),
            &lon_axis(&coord),
        );
        assert_eq!(result.sampled_time_indices, vec![0]);
        assert_eq!(result.missing_longitudes, vec![0.0, 90.0]);

        let flat = Variable::new("f", &["lon"], &[4], ArrayData::Float(vec![1.0, 1.0, 1.0, f64::NAN]))
            .unwrap();
        let result = edge_of_map_check(&MissingMask::new(&flat), 0, None, &lon_axis(&coord));
        assert_eq!(result.sampled_time_indices, vec![0]);
        assert_eq!(result.missing_longitudes, vec![270.0]);
    }
}
