//! Shaded relief from an elevation grid.
//!
//! Slope and aspect come from a centered-difference gradient with unit cell spacing, so the
//! result depends on the raw elevation units and not on the geographic cell size.

use std::f64::consts::FRAC_PI_2;

use crate::raster::grid::{ElevationGrid, Grid, HillshadeGrid};

/// Shade `grid` for a light at `azimuth_deg` / `altitude_deg`.
///
/// Output is `255 * (shaded + 1) / 2` where `shaded` is the cosine of the angle between the
/// surface normal and the light. Values are not clamped. The output has exactly the input shape.
#[tracing::instrument(skip(grid), fields(rows = grid.rows(), cols = grid.cols()))]
pub fn hillshade(grid: &ElevationGrid, azimuth_deg: f64, altitude_deg: f64) -> HillshadeGrid {
    let (d_rows, d_cols) = gradient(grid);
    let azimuth = azimuth_deg.to_radians();
    let altitude = altitude_deg.to_radians();
    let (sin_alt, cos_alt) = altitude.sin_cos();

    Grid::from_fn(grid.rows(), grid.cols(), |r, c| {
        let i = r * grid.cols() + c;
        let (x, y) = (d_rows.data()[i], d_cols.data()[i]);
        let slope = FRAC_PI_2 - (x * x + y * y).sqrt().atan();
        let aspect = (-x).atan2(y);
        let shaded = sin_alt * slope.sin() + cos_alt * slope.cos() * (azimuth - aspect).cos();
        255.0 * (shaded + 1.0) / 2.0
    })
}

/// Rate of change along rows and along columns.
///
/// Interior cells use `(f[i+1] - f[i-1]) / 2`; border cells use the one-sided first difference.
/// An axis of length 1 has zero derivative.
pub fn gradient(grid: &ElevationGrid) -> (Grid<f64>, Grid<f64>) {
    let (rows, cols) = grid.shape();
    let at = |r: usize, c: usize| grid.data()[r * cols + c];

    let d_rows = Grid::from_fn(rows, cols, |r, c| axis_diff(rows, r, |k| at(k, c)));
    let d_cols = Grid::from_fn(rows, cols, |r, c| axis_diff(cols, c, |k| at(r, k)));
    (d_rows, d_cols)
}

fn axis_diff(len: usize, i: usize, f: impl Fn(usize) -> f64) -> f64 {
    if len < 2 {
        0.0
    } else if i == 0 {
        f(1) - f(0)
    } else if i == len - 1 {
        f(i) - f(i - 1)
    } else {
        (f(i + 1) - f(i - 1)) / 2.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/terrain/hillshade.rs"]
mod tests;
