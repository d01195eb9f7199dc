//! Ocean-cover and time-cover entry points.

use std::collections::BTreeMap;

use nc_common::{AxisExtent, LabeledDataset, LongitudeConvention, MissingMask, Variable};
use tracing::info;

use crate::axes::{
    choose_gridded_vars, choose_time_vars, resolve_grid_axes, resolve_time_dim, time_axis, GridAxes,
};
use crate::config::CoverageConfig;
use crate::edge::edge_of_map_check;
use crate::error::{CoverageError, CoverageResult};
use crate::land_ocean::{land_ocean_check, GridLayout};
use crate::report::{AggregateReport, CheckKind, CheckResult, CoverageReport, GridInfo};
use crate::time_missing::time_missing_check;

fn grid_info(grid: &GridAxes<'_>) -> GridInfo {
    let lon = AxisExtent::of(&grid.lon.values);
    let lat = AxisExtent::of(&grid.lat.values);
    GridInfo {
        lon_name: grid.lon.name.clone(),
        lat_name: grid.lat.name.clone(),
        lon_dim: grid.lon.dim.clone(),
        lat_dim: grid.lat.dim.clone(),
        longitude_convention: LongitudeConvention::detect(&grid.lon.values),
        longitude_min: lon.map(|e| e.min),
        longitude_max: lon.map(|e| e.max),
        latitude_min: lat.map(|e| e.min),
        latitude_max: lat.map(|e| e.max),
    }
}

fn ocean_report(
    ds: &LabeledDataset,
    var: &Variable,
    grid: &GridAxes<'_>,
    info: &GridInfo,
    config: &CoverageConfig,
) -> CoverageResult<CoverageReport> {
    let (Some(lat_axis), Some(lon_axis)) = (var.axis_of(&grid.lat.dim), var.axis_of(&grid.lon.dim))
    else {
        return Err(CoverageError::missing_grid_dims(&var.name, &grid.lon.dim, &grid.lat.dim));
    };
    let time_dim = resolve_time_dim(ds, var, config.time_name.as_deref());
    let time = time_axis(var, time_dim.as_deref());
    let mask = MissingMask::new(var);

    let mut checks = BTreeMap::new();
    checks.insert(
        CheckKind::EdgeOfMap,
        if config.check_edge_of_map {
            CheckResult::EdgeOfMap(edge_of_map_check(&mask, lon_axis, time, &grid.lon))
        } else {
            CheckResult::disabled()
        },
    );
    checks.insert(
        CheckKind::LandOceanOffset,
        if config.check_land_ocean_offset {
            let layout = GridLayout {
                lat_axis,
                lon_axis,
                time,
            };
            CheckResult::LandOcean(land_ocean_check(&mask, layout, grid, config))
        } else {
            CheckResult::disabled()
        },
    );

    Ok(CoverageReport::new(&var.name, Some(info.clone()), time_dim, checks))
}

/// Edge-of-map and land/ocean checks on every gridded data variable (or
/// the configured one).
pub fn check_ocean_cover(ds: &LabeledDataset, config: &CoverageConfig) -> CoverageResult<AggregateReport> {
    config.validate().map_err(CoverageError::Config)?;
    let grid = resolve_grid_axes(ds, config.lon_name.as_deref(), config.lat_name.as_deref())?;
    let vars = choose_gridded_vars(ds, config.var_name.as_deref(), &grid)?;
    let info = grid_info(&grid);

    let reports = vars
        .into_iter()
        .map(|var| ocean_report(ds, var, &grid, &info, config))
        .collect::<CoverageResult<Vec<_>>>()?;
    let aggregate = AggregateReport::new(reports);
    info!(
        variables = aggregate.checked_variable_count,
        convention = %info.longitude_convention,
        ok = aggregate.ok,
        "Ocean cover check complete"
    );
    Ok(aggregate)
}

/// Missing time-slice check on every data variable (or the configured one).
pub fn check_time_cover(ds: &LabeledDataset, config: &CoverageConfig) -> CoverageResult<AggregateReport> {
    let vars = choose_time_vars(ds, config.var_name.as_deref())?;

    let reports = vars
        .into_iter()
        .map(|var| {
            let time_dim = resolve_time_dim(ds, var, config.time_name.as_deref());
            let result = if config.check_time_missing {
                let time_coord = time_dim.as_deref().and_then(|d| ds.coord(d));
                let time = time_axis(var, time_dim.as_deref());
                CheckResult::TimeMissing(time_missing_check(&MissingMask::new(var), time, time_coord))
            } else {
                CheckResult::disabled()
            };
            let checks = BTreeMap::from([(CheckKind::TimeMissing, result)]);
            CoverageReport::new(&var.name, None, time_dim, checks)
        })
        .collect();
    let aggregate = AggregateReport::new(reports);
    info!(
        variables = aggregate.checked_variable_count,
        ok = aggregate.ok,
        "Time cover check complete"
    );
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CheckStatus;
    use nc_common::ArrayData;

    fn regional() -> LabeledDataset {
        let sst = Variable::new(
            "sst",
            &["time", "lat", "lon"],
            &[2, 2, 2],
            ArrayData::Float(vec![1.0, 1.0, 1.0, f64::NAN, 1.0, 1.0, 1.0, f64::NAN]),
        )
        .unwrap();
        let flag = Variable::new("flag", &["time"], &[2], ArrayData::Int(vec![0, 1])).unwrap();
        LabeledDataset::new()
            .with_coord(Variable::coordinate("lat", ArrayData::Float(vec![10.0, 20.0])))
            .unwrap()
            .with_coord(Variable::coordinate("lon", ArrayData::Float(vec![100.0, 110.0])))
            .unwrap()
            .with_data_var(sst)
            .unwrap()
            .with_data_var(flag)
            .unwrap()
    }

    #[test]
    fn test_ocean_cover_regional() {
        let report = check_ocean_cover(&regional(), &CoverageConfig::default()).unwrap();
        assert_eq!(report.checked_variables, vec!["sst"]);
        let sst = report.get("sst").unwrap();
        let grid = sst.grid.as_ref().unwrap();
        assert_eq!(grid.longitude_convention, LongitudeConvention::Signed);
        assert_eq!(grid.latitude_max, Some(20.0));
        assert_eq!(sst.time_dim.as_deref(), Some("time"));
        assert_eq!(sst.land_ocean().unwrap().status, CheckStatus::SkippedNonGlobal);
        // Only one cell of lon index 1 is missing, so no column is reported.
        assert_eq!(sst.edge_of_map().unwrap().status, CheckStatus::Pass);
        assert!(report.ok);
    }

    #[test]
    fn test_disabled_checks() {
        let config = CoverageConfig {
            check_edge_of_map: false,
            check_land_ocean_offset: false,
            ..Default::default()
        };
        let report = check_ocean_cover(&regional(), &config).unwrap();
        let sst = report.get("sst").unwrap();
        assert!(!sst.check(CheckKind::EdgeOfMap).unwrap().enabled());
        assert_eq!(
            sst.check(CheckKind::LandOceanOffset).unwrap().status(),
            CheckStatus::Skipped
        );
    }

    #[test]
    fn test_time_cover_checks_every_variable() {
        let report = check_time_cover(&regional(), &CoverageConfig::default()).unwrap();
        assert_eq!(report.checked_variables, vec!["sst", "flag"]);
        assert!(report.ok);
        assert_eq!(
            report.get("flag").unwrap().time_missing().unwrap().status,
            CheckStatus::Pass
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = CoverageConfig {
            global_min_lon_span: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            check_ocean_cover(&regional(), &config),
            Err(CoverageError::Config(_))
        ));
    }

    #[test]
    fn test_empty_dataset_errors() {
        let err = check_time_cover(&LabeledDataset::new(), &CoverageConfig::default()).unwrap_err();
        assert_eq!(err, CoverageError::NoDataVariables);
    }
}
