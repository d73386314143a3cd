use crate::foundation::error::{FloodError, FloodResult};
use crate::raster::grid::{ElevationGrid, FloodMask};

/// One step of the flood sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloodStep {
    /// 0-based position in the sweep; also the frame index.
    pub index: usize,
    /// Height above the mean river elevation, in elevation units.
    pub offset_m: f64,
    /// Absolute water level for this step.
    pub flood_elevation: f64,
}

/// Upper bound on the number of steps in one sweep.
pub const MAX_FLOOD_STEPS: usize = 10_000;

/// Ascending half-open sequence `start, start + step, ... < stop`, at most
/// [`MAX_FLOOD_STEPS`] long.
pub fn flood_offsets(start: f64, stop: f64, step: f64) -> FloodResult<Vec<f64>> {
    if !(start.is_finite() && stop.is_finite() && step.is_finite()) {
        return Err(FloodError::validation("flood offsets must be finite"));
    }
    if step <= 0.0 {
        return Err(FloodError::validation("flood offset step must be > 0"));
    }
    let n = ((stop - start) / step).ceil().max(0.0);
    if n > MAX_FLOOD_STEPS as f64 {
        return Err(FloodError::validation(format!(
            "flood sweep has {n} steps, more than {MAX_FLOOD_STEPS}"
        )));
    }
    let n = n as usize;
    Ok((0..n).map(|i| start + step * i as f64).collect())
}

/// Pair each offset with its absolute flood elevation, preserving order.
pub fn flood_steps(mean_river_elevation: f64, offsets: &[f64]) -> Vec<FloodStep> {
    offsets
        .iter()
        .enumerate()
        .map(|(index, &offset_m)| FloodStep {
            index,
            offset_m,
            flood_elevation: mean_river_elevation + offset_m,
        })
        .collect()
}

/// `true` where the terrain is at or below `flood_elevation`.
pub fn flood_mask(grid: &ElevationGrid, flood_elevation: f64) -> FloodMask {
    grid.map(|&z| z <= flood_elevation)
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/flood.rs"]
mod tests;
