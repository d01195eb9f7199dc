//! Safe, automatic compliance fixes.

use nc_common::axis::{classify, expected_coord_attrs, AxisType};
use nc_common::dataset::FILL_VALUE_ATTR;
use nc_common::time::epoch_millis;
use nc_common::{ArrayData, AttrValue, LabeledDataset, NcResult, Variable};
use tracing::debug;

use crate::conventions::normalize_attr_key_case;

/// Return a normalized copy of `ds`. The input is never modified.
///
/// * `Conventions` is set to `cf_version` (e.g. `"CF-1.12"`).
/// * CF attribute keys are brought to their canonical case.
/// * Classified dimensions without a coordinate get an index coordinate.
/// * Expected axis attributes are set on classified coordinates.
/// * Non-numeric lat/lon coordinates are coerced to floats (NaN when
///   unparseable).
/// * `_FillValue` is removed from every coordinate.
pub fn make_compliant(ds: &LabeledDataset, cf_version: &str) -> NcResult<LabeledDataset> {
    let mut out = ds.clone();
    out.attrs_mut()
        .insert("Conventions".to_string(), AttrValue::from(cf_version));

    for (_, attrs) in out.data_vars_attrs_mut() {
        normalize_attr_key_case(attrs);
    }
    for (_, attrs, _) in out.coords_attrs_mut() {
        normalize_attr_key_case(attrs);
    }

    let dims: Vec<(String, usize)> = out
        .dims()
        .iter()
        .map(|d| (d.name.clone(), d.size))
        .collect();
    for (dim, size) in dims {
        let Some(axis) = classify(&dim, out.coord(&dim)) else {
            continue;
        };
        let mut coord = match out.coord(&dim) {
            Some(existing) => existing.clone(),
            None => {
                debug!(dim = %dim, size, "Creating index coordinate");
                Variable::coordinate(dim.clone(), ArrayData::Int((0..size as i64).collect()))
            }
        };
        for (key, value) in expected_coord_attrs(axis) {
            coord.attrs.insert(key.to_string(), AttrValue::from(*value));
        }
        if matches!(axis, AxisType::Lat | AxisType::Lon) && !coord.dtype().is_numeric() {
            coord.data = ArrayData::Float(coerce_to_float(&coord.data));
        }
        out.set_coord(coord)?;
    }

    for (_, attrs, encoding) in out.coords_attrs_mut() {
        attrs.remove(FILL_VALUE_ATTR);
        encoding.remove(FILL_VALUE_ATTR);
    }

    Ok(out)
}

fn coerce_to_float(data: &ArrayData) -> Vec<f64> {
    match data {
        ArrayData::Float(v) => v.clone(),
        ArrayData::Int(v) => v.iter().map(|x| *x as f64).collect(),
        ArrayData::Bool(v) => v.iter().map(|x| if *x { 1.0 } else { 0.0 }).collect(),
        ArrayData::DateTime(v) => v
            .iter()
            .map(|x| x.map(|dt| epoch_millis(&dt) as f64).unwrap_or(f64::NAN))
            .collect(),
        ArrayData::Text(v) => v
            .iter()
            .map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
            .collect(),
        ArrayData::Object(v) => v
            .iter()
            .map(|x| match x {
                serde_json::Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
                serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
                _ => f64::NAN,
            })
            .collect(),
    }
}
