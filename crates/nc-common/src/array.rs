//! Missing-value mask reductions.
//!
//! Coverage checks never need the full mask, only boolean answers per slice.
//! [`MaskReduce`] exposes exactly those reductions so a lazily evaluated
//! backend can answer them without materializing the array; [`MissingMask`]
//! is the eager implementation over an in-memory [`Variable`].

use crate::dataset::{AttrValue, Variable};

/// Pins `axis` to a single `index`.
pub type AxisPin = (usize, usize);

/// Reductions over a variable's missing-value mask.
///
/// Elements are addressed by row-major flat index. `fixed` pins some axes to
/// one position; every other axis is reduced over.
pub trait MaskReduce {
    fn shape(&self) -> &[usize];

    fn is_missing_at(&self, flat_index: usize) -> bool;

    /// For each position along `keep_axis`, whether every element of that
    /// slice is missing. Empty slices count as all missing.
    fn all_missing_along(&self, keep_axis: usize, fixed: &[AxisPin]) -> Vec<bool> {
        let shape = self.shape();
        let mut out = vec![true; shape.get(keep_axis).copied().unwrap_or(0)];
        let strides = strides(shape);
        for flat in 0..element_count(shape) {
            if !matches_pins(flat, &strides, shape, fixed) {
                continue;
            }
            let k = (flat / strides[keep_axis]) % shape[keep_axis];
            if out[k] && !self.is_missing_at(flat) {
                out[k] = false;
            }
        }
        out
    }

    /// Whether every element selected by `fixed` is missing.
    fn all_missing(&self, fixed: &[AxisPin]) -> bool {
        let shape = self.shape();
        let strides = strides(shape);
        (0..element_count(shape))
            .filter(|flat| matches_pins(*flat, &strides, shape, fixed))
            .all(|flat| self.is_missing_at(flat))
    }

    /// Whether any element selected by `fixed` is missing.
    fn any_missing(&self, fixed: &[AxisPin]) -> bool {
        let shape = self.shape();
        let strides = strides(shape);
        (0..element_count(shape))
            .filter(|flat| matches_pins(*flat, &strides, shape, fixed))
            .any(|flat| self.is_missing_at(flat))
    }

    fn count_missing(&self) -> usize {
        (0..element_count(self.shape()))
            .filter(|flat| self.is_missing_at(*flat))
            .count()
    }
}

fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

fn matches_pins(flat: usize, strides: &[usize], shape: &[usize], fixed: &[AxisPin]) -> bool {
    fixed
        .iter()
        .all(|(axis, index)| (flat / strides[*axis]) % shape[*axis] == *index)
}

/// Eager missing-value mask of a variable.
///
/// An element is missing when it is null in its own representation or equals
/// a `_FillValue` declared in the attribute or encoding map.
pub struct MissingMask<'a> {
    var: &'a Variable,
    fills: Vec<&'a AttrValue>,
}

impl<'a> MissingMask<'a> {
    pub fn new(var: &'a Variable) -> Self {
        Self {
            var,
            fills: var.fill_values(),
        }
    }

    pub fn variable(&self) -> &'a Variable {
        self.var
    }
}

impl MaskReduce for MissingMask<'_> {
    fn shape(&self) -> &[usize] {
        &self.var.shape
    }

    fn is_missing_at(&self, flat_index: usize) -> bool {
        let data = &self.var.data;
        data.is_null_at(flat_index)
            || self
                .fills
                .iter()
                .any(|fill| data.equals_fill_at(flat_index, fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ArrayData;

    // time x lon, 3 x 4
    fn sample() -> Variable {
        let nan = f64::NAN;
        Variable::new(
            "sst",
            &["time", "lon"],
            &[3, 4],
            ArrayData::Float(vec![
                nan, 1.0, 2.0, -999.0, //
                nan, nan, nan, nan, //
                nan, 1.0, nan, 3.0,
            ]),
        )
        .unwrap()
        .with_encoding("_FillValue", -999.0)
    }

    #[test]
    fn test_is_missing_uses_fill_and_nan() {
        let var = sample();
        let mask = MissingMask::new(&var);
        assert!(mask.is_missing_at(0));
        assert!(!mask.is_missing_at(1));
        assert!(mask.is_missing_at(3));
        assert_eq!(mask.count_missing(), 8);
    }

    #[test]
    fn test_all_missing_along_time() {
        let var = sample();
        let mask = MissingMask::new(&var);
        assert_eq!(mask.all_missing_along(0, &[]), vec![false, true, false]);
    }

    #[test]
    fn test_all_missing_along_lon_at_time() {
        let var = sample();
        let mask = MissingMask::new(&var);
        assert_eq!(
            mask.all_missing_along(1, &[(0, 2)]),
            vec![true, false, true, false]
        );
        assert_eq!(mask.all_missing_along(1, &[]), vec![true, false, false, false]);
    }

    #[test]
    fn test_point_reductions() {
        let var = sample();
        let mask = MissingMask::new(&var);
        assert!(mask.all_missing(&[(0, 1)]));
        assert!(!mask.all_missing(&[(0, 0), (1, 1)]));
        assert!(mask.any_missing(&[(0, 0)]));
        assert!(!mask.any_missing(&[(1, 1), (0, 2)]));
    }

    #[test]
    fn test_text_fill_value() {
        let var = Variable::new(
            "flag",
            &["x"],
            &[2],
            ArrayData::Text(vec!["n/a".into(), "ok".into()]),
        )
        .unwrap()
        .with_attr("_FillValue", "n/a");
        let mask = MissingMask::new(&var);
        assert!(mask.is_missing_at(0));
        assert!(!mask.is_missing_at(1));
    }
}
