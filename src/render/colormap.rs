//! Scalar and boolean grids to premultiplied RGBA8 images, one pixel per cell.

use crate::foundation::core::Rgb8;
use crate::raster::grid::{FloodMask, HillshadeGrid};

/// Grayscale image of `grid`, linearly stretched from its finite minimum (black) to its finite
/// maximum (white). A constant grid maps to black; non-finite cells are transparent.
pub fn gray_rgba8_premul(grid: &HillshadeGrid) -> Vec<u8> {
    gray_rgba8_premul_in(grid, grid.finite_min_max())
}

/// Like [`gray_rgba8_premul`] with an explicit `(min, max)` stretch, so a resampled grid keeps
/// the tones of its source.
pub fn gray_rgba8_premul_in(grid: &HillshadeGrid, range: Option<(f64, f64)>) -> Vec<u8> {
    let mut out = Vec::with_capacity(grid.len() * 4);
    for &v in grid.data() {
        match range {
            Some((lo, hi)) if v.is_finite() => {
                let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.0 };
                let g = (t * 255.0).round().clamp(0.0, 255.0) as u8;
                out.extend_from_slice(&[g, g, g, 255]);
            }
            _ => out.extend_from_slice(&[0, 0, 0, 0]),
        }
    }
    out
}

/// Two-stop ramp over a flood mask: `low` for dry cells, `high` for flooded ones. Opaque.
pub fn flood_rgba8_premul(mask: &FloodMask, low: Rgb8, high: Rgb8) -> Vec<u8> {
    let dry = low.with_alpha(255).to_array();
    let wet = high.with_alpha(255).to_array();
    let mut out = Vec::with_capacity(mask.len() * 4);
    for &flooded in mask.data() {
        out.extend_from_slice(if flooded { &wet } else { &dry });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/colormap.rs"]
mod tests;
