//! Fully missing time slices.

use nc_common::{labeled_ranges, MaskReduce, Variable};
use tracing::debug;

use crate::axes::TimeAxis;
use crate::report::{CheckStatus, TimeMissingResult};

/// Report every time slice whose elements are all missing, compressed into
/// ranges labeled from `time_coord`.
pub fn time_missing_check(
    mask: &impl MaskReduce,
    time: Option<TimeAxis>,
    time_coord: Option<&Variable>,
) -> TimeMissingResult {
    let Some(time) = time else {
        return TimeMissingResult {
            enabled: true,
            status: CheckStatus::SkippedNoTime,
            missing_slice_count: 0,
            missing_slice_ranges: Vec::new(),
        };
    };

    let missing: Vec<usize> = mask
        .all_missing_along(time.axis, &[])
        .into_iter()
        .enumerate()
        .filter_map(|(i, missing)| missing.then_some(i))
        .collect();
    debug!(missing_slices = missing.len(), "Time-missing check");

    TimeMissingResult {
        enabled: true,
        status: if missing.is_empty() {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        },
        missing_slice_count: missing.len(),
        missing_slice_ranges: labeled_ranges(&missing, time_coord),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nc_common::{ArrayData, MissingMask, Range};

    /// Daily time coordinate encoded with CF units.
    fn daily_coord(n: usize) -> Variable {
        Variable::coordinate("time", ArrayData::Float((0..n).map(|d| d as f64).collect()))
            .with_attr("units", "days since 2000-01-01")
    }

    fn series(missing: &[usize]) -> Variable {
        let mut values = vec![1.0; 5 * 2];
        for &t in missing {
            values[t * 2] = f64::NAN;
            values[t * 2 + 1] = f64::NAN;
        }
        Variable::new("v", &["time", "x"], &[5, 2], ArrayData::Float(values)).unwrap()
    }

    #[test]
    fn test_missing_slices_compressed() {
        let var = series(&[1, 2]);
        let coord = daily_coord(5);
        let result = time_missing_check(
            &MissingMask::new(&var),
            Some(TimeAxis { axis: 0, size: 5 }),
            Some(&coord),
        );
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.missing_slice_count, 2);
        assert_eq!(
            result.missing_slice_ranges,
            vec![Range {
                start_index: 1,
                end_index: 2,
                start: "2000-01-02T00:00:00".into(),
                end: "2000-01-03T00:00:00".into(),
            }]
        );
    }

    #[test]
    fn test_partial_slice_not_missing() {
        let mut var = series(&[]);
        if let ArrayData::Float(values) = &mut var.data {
            values[0] = f64::NAN;
        }
        let result = time_missing_check(&MissingMask::new(&var), Some(TimeAxis { axis: 0, size: 5 }), None);
        assert_eq!(result.status, CheckStatus::Pass);
        assert!(result.missing_slice_ranges.is_empty());
    }

    #[test]
    fn test_fill_value_counts_as_missing() {
        let values = vec![-999.0, -999.0, 1.0, 2.0];
        let var = Variable::new("v", &["time", "x"], &[2, 2], ArrayData::Float(values))
            .unwrap()
            .with_attr("_FillValue", -999.0);
        let result = time_missing_check(&MissingMask::new(&var), Some(TimeAxis { axis: 0, size: 2 }), None);
        assert_eq!(result.missing_slice_ranges[0].start, "0");
    }

    #[test]
    fn test_no_time_dimension() {
        let var = series(&[]);
        let result = time_missing_check(&MissingMask::new(&var), None, None);
        assert_eq!(result.status, CheckStatus::SkippedNoTime);
    }
}
