//! Affine georeferencing for rasters.

use crate::foundation::core::Affine;

/// Affine coefficients mapping cell indices to geographic coordinates:
///
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// `(col, row)` here are continuous cell-edge coordinates: `(0, 0)` is the outer corner of the
/// first cell and `(0.5, 0.5)` its center. North-up rasters have zero rotation terms and a
/// negative `pixel_height`.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeoTransform {
    pub origin_x: f64,
    pub origin_y: f64,
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub row_rotation: f64,
    pub col_rotation: f64,
}

/// Geographic bounds of a raster as `(left, right, bottom, top)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Extent {
    pub fn width(&self) -> f64 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f64 {
        (self.top - self.bottom).abs()
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GeoTransform {
    /// Cell indices used directly as coordinates (`x = col`, `y = row`).
    pub const IDENTITY: Self = Self {
        origin_x: 0.0,
        origin_y: 0.0,
        pixel_width: 1.0,
        pixel_height: 1.0,
        row_rotation: 0.0,
        col_rotation: 0.0,
    };

    /// North-up transform without rotation.
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Geographic `(x, y)` back to continuous `(col, row)`; `None` for a degenerate transform.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;
        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;
        Some((col, row))
    }

    /// Plotting extent of a `rows x cols` raster.
    ///
    /// Rotation terms are ignored, matching how the raster is drawn as an axis-aligned image.
    pub fn extent(&self, rows: usize, cols: usize) -> Extent {
        let (x0, y0) = (self.origin_x, self.origin_y);
        let x1 = x0 + cols as f64 * self.pixel_width;
        let y1 = y0 + rows as f64 * self.pixel_height;
        Extent {
            left: x0.min(x1),
            right: x0.max(x1),
            bottom: y0.min(y1),
            top: y0.max(y1),
        }
    }

    /// Same transform as a `kurbo` affine (cell space to geographic space).
    pub fn to_affine(&self) -> Affine {
        Affine::new([
            self.pixel_width,
            self.col_rotation,
            self.row_rotation,
            self.pixel_height,
            self.origin_x,
            self.origin_y,
        ])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/geotransform.rs"]
mod tests;
