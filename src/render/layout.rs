//! Figure geometry: where the map, and the title above it, land on the canvas.

use crate::foundation::core::{Affine, Canvas, Point, Rect};
use crate::foundation::error::{FloodError, FloodResult};
use crate::raster::geotransform::{Extent, GeoTransform};

// Axes box as canvas fractions, measured from the bottom-left corner.
const AXES_LEFT: f64 = 0.125;
const AXES_RIGHT: f64 = 0.9;
const AXES_BOTTOM: f64 = 0.11;
const AXES_TOP: f64 = 0.88;

/// Gap between the map's top edge and the title baseline, in pixels.
const TITLE_PAD_PX: f64 = 8.0;

/// Screen placement of a georeferenced raster with equal aspect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotLayout {
    canvas: Canvas,
    axes: Rect,
    plot: Rect,
    geo_to_screen: Affine,
}

impl PlotLayout {
    /// Fit `extent` into the axes box, keeping one geographic unit equally long on both axes.
    ///
    /// With `y_down` the geographic y axis grows downward on screen (rasters whose rows advance
    /// toward larger y); otherwise north is up.
    pub fn new(canvas: Canvas, extent: Extent, y_down: bool) -> FloodResult<Self> {
        canvas.validate()?;
        let (ew, eh) = (extent.width(), extent.height());
        if !(ew.is_finite() && eh.is_finite()) || ew <= 0.0 || eh <= 0.0 {
            return Err(FloodError::validation(format!(
                "raster extent {ew}x{eh} cannot be plotted"
            )));
        }

        let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
        let axes = Rect::new(
            AXES_LEFT * w,
            (1.0 - AXES_TOP) * h,
            AXES_RIGHT * w,
            (1.0 - AXES_BOTTOM) * h,
        );
        let s = (axes.width() / ew).min(axes.height() / eh);
        let plot = Rect::from_center_size(axes.center(), (ew * s, eh * s));

        let geo_to_screen = if y_down {
            Affine::new([s, 0.0, 0.0, s, plot.x0 - extent.left * s, plot.y0 - extent.bottom * s])
        } else {
            Affine::new([s, 0.0, 0.0, -s, plot.x0 - extent.left * s, plot.y0 + extent.top * s])
        };

        Ok(Self {
            canvas,
            axes,
            plot,
            geo_to_screen,
        })
    }

    /// Layout for a `rows x cols` raster georeferenced by `transform`.
    pub fn for_raster(
        canvas: Canvas,
        transform: &GeoTransform,
        rows: usize,
        cols: usize,
    ) -> FloodResult<Self> {
        Self::new(
            canvas,
            transform.extent(rows, cols),
            transform.pixel_height > 0.0,
        )
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// The subplot box before the aspect constraint.
    pub fn axes(&self) -> Rect {
        self.axes
    }

    /// Where the raster extent is drawn.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    pub fn geo_to_screen(&self) -> Affine {
        self.geo_to_screen
    }

    /// Cell space (`(col, row)`, cell corners at integers) to screen pixels.
    pub fn cell_to_screen(&self, transform: &GeoTransform) -> Affine {
        self.geo_to_screen * transform.to_affine()
    }

    /// Baseline center of the title.
    pub fn title_anchor(&self) -> Point {
        Point::new(self.plot.center().x, (self.plot.y0 - TITLE_PAD_PX).max(0.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
