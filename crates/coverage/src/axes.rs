//! Locating the lon/lat/time axes a coverage check works on.

use nc_common::axis::{LAT_NAMES, LON_NAMES};
use nc_common::{AttrValue, LabeledDataset, Variable};

use crate::error::{CoverageError, CoverageResult};

/// A 1-D horizontal coordinate with its values as floats.
#[derive(Debug, Clone)]
pub struct HorizontalAxis<'a> {
    pub name: String,
    pub dim: String,
    pub coord: &'a Variable,
    pub values: Vec<f64>,
}

/// The resolved longitude and latitude axes of a dataset.
#[derive(Debug, Clone)]
pub struct GridAxes<'a> {
    pub lon: HorizontalAxis<'a>,
    pub lat: HorizontalAxis<'a>,
}

/// A variable's time axis: its position in the variable's dims and length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeAxis {
    pub axis: usize,
    pub size: usize,
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

fn units_of(coord: &Variable) -> String {
    coord
        .attrs
        .get("units")
        .map(AttrValue::to_string)
        .map(|u| normalize(&u))
        .unwrap_or_default()
}

/// First coordinate whose name is a candidate, else the first whose units
/// contain `units_token`.
pub fn guess_coord_name<'a>(
    ds: &'a LabeledDataset,
    candidates: &[&str],
    units_token: &str,
) -> Option<&'a str> {
    ds.coords()
        .iter()
        .find(|c| candidates.contains(&normalize(&c.name).as_str()))
        .or_else(|| ds.coords().iter().find(|c| units_of(c).contains(units_token)))
        .map(|c| c.name.as_str())
}

fn resolve_1d<'a>(ds: &'a LabeledDataset, name: &str) -> CoverageResult<HorizontalAxis<'a>> {
    let coord = ds
        .coord(name)
        .ok_or_else(|| CoverageError::CoordinateNotFound(name.to_string()))?;
    let [dim] = coord.dims.as_slice() else {
        return Err(CoverageError::CoordinateNotOneDimensional(name.to_string()));
    };
    let values = coord
        .numeric_values()
        .ok_or_else(|| CoverageError::NonNumericCoordinate(name.to_string()))?;
    Ok(HorizontalAxis {
        name: name.to_string(),
        dim: dim.clone(),
        coord,
        values,
    })
}

/// Resolve the longitude and latitude coordinates, inferring names that
/// are not given.
pub fn resolve_grid_axes<'a>(
    ds: &'a LabeledDataset,
    lon_name: Option<&str>,
    lat_name: Option<&str>,
) -> CoverageResult<GridAxes<'a>> {
    let lon_name = lon_name.or_else(|| guess_coord_name(ds, LON_NAMES, "degrees_east"));
    let lat_name = lat_name.or_else(|| guess_coord_name(ds, LAT_NAMES, "degrees_north"));
    let (Some(lon_name), Some(lat_name)) = (lon_name, lat_name) else {
        return Err(CoverageError::CoordinatesNotInferred);
    };
    Ok(GridAxes {
        lon: resolve_1d(ds, lon_name)?,
        lat: resolve_1d(ds, lat_name)?,
    })
}

/// Time dimension of `var`: the preferred name, then `time`, then a
/// dimension whose coordinate has `standard_name = time`.
pub fn resolve_time_dim(ds: &LabeledDataset, var: &Variable, preferred: Option<&str>) -> Option<String> {
    if let Some(preferred) = preferred.filter(|p| !p.is_empty()) {
        if var.dims.iter().any(|d| d == preferred) {
            return Some(preferred.to_string());
        }
    }
    if var.dims.iter().any(|d| d == "time") {
        return Some("time".to_string());
    }
    var.dims
        .iter()
        .find(|dim| {
            ds.coord(dim)
                .and_then(|c| c.attrs.get("standard_name"))
                .is_some_and(|sn| normalize(&sn.to_string()) == "time")
        })
        .cloned()
}

/// Position and length of `dim` in `var`.
pub fn time_axis(var: &Variable, dim: Option<&str>) -> Option<TimeAxis> {
    let dim = dim?;
    Some(TimeAxis {
        axis: var.axis_of(dim)?,
        size: var.size_of(dim)?,
    })
}

/// Variables for the ocean-cover checks: the named one, or every data
/// variable spanning both horizontal dims.
pub fn choose_gridded_vars<'a>(
    ds: &'a LabeledDataset,
    var_name: Option<&str>,
    grid: &GridAxes<'_>,
) -> CoverageResult<Vec<&'a Variable>> {
    let spans_grid = |var: &Variable| {
        var.dims.contains(&grid.lon.dim) && var.dims.contains(&grid.lat.dim)
    };

    if let Some(name) = var_name {
        let var = ds
            .data_var(name)
            .ok_or_else(|| CoverageError::VariableNotFound(name.to_string()))?;
        if !spans_grid(var) {
            return Err(CoverageError::missing_grid_dims(name, &grid.lon.dim, &grid.lat.dim));
        }
        return Ok(vec![var]);
    }

    let selected: Vec<&Variable> = ds.data_vars().iter().filter(|v| spans_grid(v)).collect();
    if selected.is_empty() {
        return Err(CoverageError::NoGriddedVariable);
    }
    Ok(selected)
}

/// Variables for the time-cover check: the named one, or every data variable.
pub fn choose_time_vars<'a>(
    ds: &'a LabeledDataset,
    var_name: Option<&str>,
) -> CoverageResult<Vec<&'a Variable>> {
    if let Some(name) = var_name {
        let var = ds
            .data_var(name)
            .ok_or_else(|| CoverageError::VariableNotFound(name.to_string()))?;
        return Ok(vec![var]);
    }
    if ds.data_vars().is_empty() {
        return Err(CoverageError::NoDataVariables);
    }
    Ok(ds.data_vars().iter().collect())
}
