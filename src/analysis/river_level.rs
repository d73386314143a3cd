use crate::analysis::rasterize::geometry_mask;
use crate::foundation::error::{FloodError, FloodResult};
use crate::raster::geotiff::Dem;
use crate::raster::grid::{ElevationGrid, Grid};
use crate::vector::layer::RiverLayer;

/// Running sum over elevation cells selected by one or more masks.
///
/// Samples are pooled across masks: a cell selected by two masks contributes twice.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PooledSample {
    sum: f64,
    count: usize,
}

impl PooledSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every `grid` value where `mask` is `true`.
    pub fn extend_masked(&mut self, grid: &ElevationGrid, mask: &Grid<bool>) -> FloodResult<()> {
        grid.ensure_same_shape(mask, "river mask")?;
        for (&v, _) in grid.data().iter().zip(mask.data()).filter(|(_, m)| **m) {
            self.sum += v;
            self.count += 1;
        }
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Arithmetic mean, or [`FloodError::NoRiverCells`] for an empty sample.
    pub fn mean(&self) -> FloodResult<f64> {
        if self.count == 0 {
            return Err(FloodError::NoRiverCells);
        }
        Ok(self.sum / self.count as f64)
    }
}

/// Mean of the elevation values selected by `masks`, pooled into a single sample.
pub fn pooled_mean<'a>(
    grid: &ElevationGrid,
    masks: impl IntoIterator<Item = &'a Grid<bool>>,
) -> FloodResult<f64> {
    let mut sample = PooledSample::new();
    for mask in masks {
        sample.extend_masked(grid, mask)?;
    }
    sample.mean()
}

/// Baseline water level: mean DEM elevation under every river geometry.
///
/// Fails with [`FloodError::NoRiverCells`] when no geometry touches the raster, so callers cannot
/// silently derive flood thresholds from an undefined mean.
#[tracing::instrument(skip_all, fields(geometries = layer.len()))]
pub fn mean_river_elevation(dem: &Dem, layer: &RiverLayer) -> FloodResult<f64> {
    let (rows, cols) = dem.grid.shape();
    let mut sample = PooledSample::new();
    for geometry in layer.iter() {
        let mask = geometry_mask(geometry, &dem.transform, rows, cols)?;
        sample.extend_masked(&dem.grid, &mask)?;
    }
    let mean = sample.mean()?;
    tracing::info!(cells = sample.count(), mean, "mean river elevation");
    Ok(mean)
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/river_level.rs"]
mod tests;
