//! Exhaustive checks of range compression over small index sets.

use std::collections::BTreeSet;

use nc_common::compress;

fn subsets(universe: usize) -> impl Iterator<Item = Vec<usize>> {
    (0u32..(1 << universe)).map(move |bits| (0..universe).filter(|i| bits & (1 << i) != 0).collect())
}

#[test]
fn test_exact_cover_for_every_subset() {
    for indices in subsets(10) {
        let runs = compress(&indices);
        let covered: BTreeSet<usize> = runs.iter().flat_map(|(s, e)| *s..=*e).collect();
        let expected: BTreeSet<usize> = indices.iter().copied().collect();
        assert_eq!(covered, expected, "cover mismatch for {:?}", indices);
    }
}

#[test]
fn test_runs_sorted_disjoint_and_maximal() {
    for indices in subsets(10) {
        let runs = compress(&indices);
        for (start, end) in &runs {
            assert!(start <= end);
        }
        for pair in runs.windows(2) {
            let (_, prev_end) = pair[0];
            let (next_start, _) = pair[1];
            // A gap of at least one index separates consecutive runs.
            assert!(next_start >= prev_end + 2, "runs {:?} could merge", pair);
        }
    }
}

#[test]
fn test_order_and_duplicates_do_not_matter() {
    for indices in subsets(8) {
        let mut shuffled: Vec<usize> = indices.iter().rev().copied().collect();
        shuffled.extend(indices.iter().copied());
        assert_eq!(compress(&shuffled), compress(&indices));
    }
}
