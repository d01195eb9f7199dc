//! Land/ocean offset check against named reference points.

use nc_common::{is_global_grid, nearest_index, AxisExtent, LongitudeConvention, MaskReduce};
use tracing::debug;

use crate::axes::{GridAxes, TimeAxis};
use crate::config::{CoverageConfig, ReferencePoint};
use crate::report::{CheckStatus, LandOceanResult, PointMismatch, NON_GLOBAL_NOTE};

/// Axis positions of one variable on the grid.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    pub lat_axis: usize,
    pub lon_axis: usize,
    pub time: Option<TimeAxis>,
}

struct PointProbe<'g, 'm, M: MaskReduce> {
    mask: &'m M,
    layout: GridLayout,
    grid: &'g GridAxes<'g>,
    convention: LongitudeConvention,
}

impl<M: MaskReduce> PointProbe<'_, '_, M> {
    fn mismatches(&self, points: &[ReferencePoint], expected_missing: bool) -> Vec<PointMismatch> {
        let mut out = Vec::new();
        for point in points {
            let target_lon = self.convention.normalize(point.lon);
            let (Some(i), Some(j)) = (
                nearest_index(&self.grid.lat.values, point.lat),
                nearest_index(&self.grid.lon.values, target_lon),
            ) else {
                continue;
            };

            let mut fixed = vec![(self.layout.lat_axis, i), (self.layout.lon_axis, j)];
            if let Some(t) = self.layout.time {
                fixed.push((t.axis, t.size - 1));
            }
            let observed_missing = self.mask.all_missing(&fixed);
            if observed_missing == expected_missing {
                continue;
            }
            out.push(PointMismatch {
                point: point.name.clone(),
                requested_lat: point.lat,
                requested_lon: target_lon,
                actual_lat: self.grid.lat.values[i],
                actual_lon: self.grid.lon.values[j],
                expected_missing,
                observed_missing,
            });
        }
        out
    }
}

/// Check that land reference points are masked and ocean points hold data
/// at the last time slice. Regional grids are skipped.
pub fn land_ocean_check(
    mask: &impl MaskReduce,
    layout: GridLayout,
    grid: &GridAxes<'_>,
    config: &CoverageConfig,
) -> LandOceanResult {
    let global = is_global_grid(
        AxisExtent::of(&grid.lon.values),
        AxisExtent::of(&grid.lat.values),
        config.global_min_lon_span,
        config.global_min_lat_span,
    );
    if !global {
        return LandOceanResult::skipped(CheckStatus::SkippedNonGlobal, Some(NON_GLOBAL_NOTE));
    }
    if layout.time.is_some_and(|t| t.size == 0) {
        return LandOceanResult::skipped(CheckStatus::SkippedNoTime, None);
    }

    let probe = PointProbe {
        mask,
        layout,
        grid,
        convention: LongitudeConvention::detect(&grid.lon.values),
    };
    let land = probe.mismatches(&config.land_points, true);
    let ocean = probe.mismatches(&config.ocean_points, false);
    debug!(
        land_mismatches = land.len(),
        ocean_mismatches = ocean.len(),
        "Land/ocean offset check"
    );
    LandOceanResult::checked(config.land_points.len(), config.ocean_points.len(), land, ocean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::HorizontalAxis;
    use nc_common::{ArrayData, MissingMask, Variable};

    fn axis<'a>(name: &str, coord: &'a Variable) -> HorizontalAxis<'a> {
        HorizontalAxis {
            name: name.into(),
            dim: name.into(),
            coord,
            values: coord.numeric_values().unwrap(),
        }
    }

    fn config() -> CoverageConfig {
        CoverageConfig {
            land_points: vec![ReferencePoint::new("island", 0.0, 0.0)],
            ocean_points: vec![ReferencePoint::new("sea", 0.0, 180.0)],
            ..Default::default()
        }
    }

    /// 3 x 4 (lat x lon) grid on 0_360 longitudes, missing where `mask` is set.
    fn field(missing: &[(usize, usize)]) -> Variable {
        let mut values = vec![1.0; 12];
        for (i, j) in missing {
            values[i * 4 + j] = f64::NAN;
        }
        Variable::new("sst", &["lat", "lon"], &[3, 4], ArrayData::Float(values)).unwrap()
    }

    const LAYOUT: GridLayout = GridLayout {
        lat_axis: 0,
        lon_axis: 1,
        time: None,
    };

    #[test]
    fn test_aligned_mask_passes() {
        let lat = Variable::coordinate("lat", ArrayData::Float(vec![-80.0, 0.0, 80.0]));
        let lon = Variable::coordinate("lon", ArrayData::Float(vec![0.0, 100.0, 200.0, 340.0]));
        let grid = GridAxes {
            lon: axis("lon", &lon),
            lat: axis("lat", &lat),
        };
        let var = field(&[(1, 0)]);
        let result = land_ocean_check(&MissingMask::new(&var), LAYOUT, &grid, &config());
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.land_points_checked, 1);
        assert_eq!(result.mismatch_count, 0);
    }

    #[test]
    fn test_offset_mask_fails() {
        let lat = Variable::coordinate("lat", ArrayData::Float(vec![-80.0, 0.0, 80.0]));
        let lon = Variable::coordinate("lon", ArrayData::Float(vec![0.0, 100.0, 200.0, 340.0]));
        let grid = GridAxes {
            lon: axis("lon", &lon),
            lat: axis("lat", &lat),
        };
        // The land cell sits one column east of where the island is.
        let var = field(&[(1, 1)]);
        let result = land_ocean_check(&MissingMask::new(&var), LAYOUT, &grid, &config());
        assert_eq!(result.status, CheckStatus::Fail);
        assert_eq!(result.mismatch_count, 1);
        let mismatch = &result.land_mismatches[0];
        assert_eq!(mismatch.point, "island");
        assert_eq!((mismatch.actual_lat, mismatch.actual_lon), (0.0, 0.0));
        assert!(mismatch.expected_missing && !mismatch.observed_missing);
    }

    #[test]
    fn test_requested_lon_normalized_to_grid() {
        let lat = Variable::coordinate("lat", ArrayData::Float(vec![-80.0, 0.0, 80.0]));
        let lon = Variable::coordinate("lon", ArrayData::Float(vec![0.0, 100.0, 200.0, 340.0]));
        let grid = GridAxes {
            lon: axis("lon", &lon),
            lat: axis("lat", &lat),
        };
        let mut config = config();
        config.ocean_points = vec![ReferencePoint::new("west", 0.0, -20.0)];
        let var = field(&[(1, 3)]);
        let result = land_ocean_check(&MissingMask::new(&var), LAYOUT, &grid, &config);
        let mismatch = &result.ocean_mismatches[0];
        assert_eq!(mismatch.requested_lon, 340.0);
        assert_eq!(mismatch.actual_lon, 340.0);
    }

    #[test]
    fn test_regional_grid_skipped() {
        let lat = Variable::coordinate("lat", ArrayData::Float(vec![10.0, 20.0, 30.0]));
        let lon = Variable::coordinate("lon", ArrayData::Float(vec![0.0, 10.0, 20.0, 30.0]));
        let grid = GridAxes {
            lon: axis("lon", &lon),
            lat: axis("lat", &lat),
        };
        let var = field(&[]);
        let result = land_ocean_check(&MissingMask::new(&var), LAYOUT, &grid, &config());
        assert_eq!(result.status, CheckStatus::SkippedNonGlobal);
        assert_eq!(result.note.as_deref(), Some(NON_GLOBAL_NOTE));
        assert_eq!(result.land_points_checked, 0);
    }
}
