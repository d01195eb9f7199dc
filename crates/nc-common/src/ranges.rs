//! Index-range compression.
//!
//! Turns a set of flagged indices into sorted, maximal, inclusive runs and
//! attaches display labels taken from a companion coordinate.

use serde::{Deserialize, Serialize};

use crate::dataset::Variable;

/// An inclusive run of indices with display labels for both ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start_index: usize,
    pub end_index: usize,
    pub start: String,
    pub end: String,
}

/// A run described by its coordinate labels only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub start: String,
    pub end: String,
}

/// Compress indices into sorted, disjoint, maximal `(start, end)` runs.
///
/// Input order and duplicates do not affect the result.
pub fn compress(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ordered = indices.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let mut runs = Vec::new();
    let mut iter = ordered.into_iter();
    let Some(first) = iter.next() else {
        return runs;
    };

    let (mut start, mut end) = (first, first);
    for idx in iter {
        if idx == end + 1 {
            end = idx;
        } else {
            runs.push((start, end));
            start = idx;
            end = idx;
        }
    }
    runs.push((start, end));
    runs
}

/// Compressed runs labeled from `labels`, or with the indices themselves
/// when no coordinate is available.
pub fn labeled_ranges(indices: &[usize], labels: Option<&Variable>) -> Vec<Range> {
    compress(indices)
        .into_iter()
        .map(|(start, end)| {
            let (start_label, end_label) = match labels {
                Some(coord) => (coord.label_at(start), coord.label_at(end)),
                None => (start.to_string(), end.to_string()),
            };
            Range {
                start_index: start,
                end_index: end,
                start: start_label,
                end: end_label,
            }
        })
        .collect()
}

/// Compressed runs described only by coordinate labels.
pub fn value_ranges(indices: &[usize], labels: &Variable) -> Vec<ValueRange> {
    compress(indices)
        .into_iter()
        .map(|(start, end)| ValueRange {
            start: labels.label_at(start),
            end: labels.label_at(end),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ArrayData;

    #[test]
    fn test_compress_example() {
        assert_eq!(
            compress(&[0, 1, 2, 5, 6, 9]),
            vec![(0, 2), (5, 6), (9, 9)]
        );
    }

    #[test]
    fn test_compress_unordered_with_duplicates() {
        assert_eq!(compress(&[9, 1, 0, 6, 2, 5, 1, 9]), vec![(0, 2), (5, 6), (9, 9)]);
    }

    #[test]
    fn test_compress_empty_and_single() {
        assert!(compress(&[]).is_empty());
        assert_eq!(compress(&[4]), vec![(4, 4)]);
    }

    #[test]
    fn test_labeled_ranges_without_coordinate() {
        let ranges = labeled_ranges(&[3, 4], None);
        assert_eq!(ranges.len(), 1);
        assert_eq!(ranges[0].start, "3");
        assert_eq!(ranges[0].end, "4");
    }

    #[test]
    fn test_labeled_ranges_with_time_coordinate() {
        let time = Variable::coordinate("time", ArrayData::Int(vec![0, 1, 2, 3, 4]))
            .with_attr("units", "days since 2000-01-01");
        let ranges = labeled_ranges(&[2, 1], Some(&time));
        assert_eq!(
            ranges,
            vec![Range {
                start_index: 1,
                end_index: 2,
                start: "2000-01-02T00:00:00".to_string(),
                end: "2000-01-03T00:00:00".to_string(),
            }]
        );
    }

    #[test]
    fn test_value_ranges() {
        let lon = Variable::coordinate("lon", ArrayData::Float(vec![0.0, 10.0, 20.0, 30.0]));
        let ranges = value_ranges(&[0, 1, 3], &lon);
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, "0");
        assert_eq!(ranges[0].end, "10");
        assert_eq!(ranges[1].start, "30");
    }
}
