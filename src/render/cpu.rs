use std::sync::Arc;

use geo_types::{Coord, Geometry, LineString, Polygon};
use kurbo::Shape as _;

use crate::analysis::flood::FloodStep;
use crate::config::FloodConfig;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgb8};
use crate::foundation::error::{FloodError, FloodResult};
use crate::raster::geotiff::Dem;
use crate::raster::grid::{FloodMask, HillshadeGrid};
use crate::render::backend::FrameRGBA;
use crate::render::colormap::{flood_rgba8_premul, gray_rgba8_premul_in};
use crate::render::layout::PlotLayout;
use crate::render::title::TitleRenderer;
use crate::vector::layer::RiverLayer;

const POINT_RADIUS_PX: f64 = 3.0;
const PATH_TOLERANCE: f64 = 0.1;

/// River geometry already projected to screen pixels.
#[derive(Clone, Debug)]
enum RiverMark {
    /// Filled with the non-zero rule (stroke outlines, discs).
    Solid(BezPath),
    /// Polygon rings, filled even-odd so holes stay open.
    Area(BezPath),
}

/// Draws flood frames for one DEM: relief and rivers are prepared once, the flood layer and
/// title per step.
pub struct FrameRenderer {
    canvas: Canvas,
    width: u16,
    height: u16,
    layout: PlotLayout,
    /// Maps the resampled layer image onto the raster extent on screen.
    image_to_screen: Affine,
    raster_shape: (usize, usize),
    /// Layer image size `(rows, cols)`: the raster shape, capped to the plot box in pixels.
    image_shape: (usize, usize),
    relief: vello_cpu::Image,
    rivers: Vec<RiverMark>,
    title: TitleRenderer,
    cfg: FloodConfig,
}

impl FrameRenderer {
    #[tracing::instrument(skip_all, fields(width = cfg.canvas.width, height = cfg.canvas.height))]
    pub fn new(
        dem: &Dem,
        hillshade: &HillshadeGrid,
        layer: &RiverLayer,
        cfg: &FloodConfig,
    ) -> FloodResult<Self> {
        cfg.validate()?;
        dem.grid.ensure_same_shape(hillshade, "hillshade")?;

        let canvas = cfg.canvas;
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| FloodError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| FloodError::render("canvas height exceeds u16"))?;

        let (rows, cols) = dem.grid.shape();
        let layout = PlotLayout::for_raster(canvas, &dem.transform, rows, cols)?;
        let plot = layout.plot();
        let image_shape = (
            rows.min(plot.height().ceil() as usize).max(1),
            cols.min(plot.width().ceil() as usize).max(1),
        );
        let image_to_screen = layout.cell_to_screen(&dem.transform)
            * Affine::scale_non_uniform(
                cols as f64 / image_shape.1 as f64,
                rows as f64 / image_shape.0 as f64,
            );

        let relief = image_from_premul(
            &gray_rgba8_premul_in(
                &hillshade.resample_nearest(image_shape.0, image_shape.1),
                hillshade.finite_min_max(),
            ),
            image_shape.1,
            image_shape.0,
        )?;
        if image_shape != (rows, cols) {
            tracing::debug!(
                rows,
                cols,
                image_rows = image_shape.0,
                image_cols = image_shape.1,
                "raster layers resampled to the plot size"
            );
        }

        let stroke = kurbo::Stroke::new(cfg.river_stroke_px)
            .with_caps(kurbo::Cap::Round)
            .with_join(kurbo::Join::Round);
        let geo_to_screen = layout.geo_to_screen();
        let mut rivers = Vec::new();
        for g in layer.iter() {
            river_marks(g, geo_to_screen, &stroke, &mut rivers);
        }

        let title = TitleRenderer::new(
            cfg.title_size_px,
            Rgb8::new(0, 0, 0),
            cfg.font_dir.as_deref(),
        );

        Ok(Self {
            canvas,
            width,
            height,
            layout,
            image_to_screen,
            raster_shape: (rows, cols),
            image_shape,
            relief,
            rivers,
            title,
            cfg: cfg.clone(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn layout(&self) -> &PlotLayout {
        &self.layout
    }

    /// Render one step. The drawing context lives only for this call.
    pub fn render_step(&self, step: &FloodStep, mask: &FloodMask) -> FloodResult<FrameRGBA> {
        if mask.shape() != self.raster_shape {
            return Err(FloodError::validation(format!(
                "flood mask: shape {:?} does not match {:?}",
                mask.shape(),
                self.raster_shape
            )));
        }

        let (rows, cols) = self.image_shape;
        let flood = image_from_premul(
            &flood_rgba8_premul(
                &mask.resample_nearest(rows, cols),
                self.cfg.flood_low_rgb,
                self.cfg.flood_high_rgb,
            ),
            cols,
            rows,
        )?;
        let title = self.title.rasterize(
            &self.cfg.title_for(step.offset_m),
            self.canvas.width,
            self.layout.plot().y0.ceil().max(1.0) as u32,
            self.layout.title_anchor(),
        )?;
        let title_image = image_from_premul(
            &title.rgba8_premul,
            title.width as usize,
            title.height as usize,
        )?;

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        // Figure background.
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(self.cfg.background_rgb));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        // Relief, then the flood layer on the same image grid.
        let cells = vello_cpu::kurbo::Rect::new(0.0, 0.0, cols as f64, rows as f64);
        ctx.set_transform(affine_to_cpu(self.image_to_screen));
        ctx.set_paint(self.relief.clone());
        ctx.fill_rect(&cells);

        ctx.set_paint(flood);
        if self.cfg.flood_opacity < 1.0 {
            ctx.push_opacity_layer(self.cfg.flood_opacity);
        }
        ctx.fill_rect(&cells);
        if self.cfg.flood_opacity < 1.0 {
            ctx.pop_layer();
        }

        // Rivers are already in screen space.
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(self.cfg.river_rgb));
        for mark in &self.rivers {
            match mark {
                RiverMark::Solid(path) => {
                    ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
                RiverMark::Area(path) => {
                    ctx.set_fill_rule(vello_cpu::peniko::Fill::EvenOdd);
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
            }
        }
        ctx.set_fill_rule(vello_cpu::peniko::Fill::NonZero);

        ctx.set_paint(title_image);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(title.width),
            f64::from(title.height),
        ));

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);

        tracing::trace!(index = step.index, offset_m = step.offset_m, "frame drawn");
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn river_marks(
    g: &Geometry<f64>,
    to_screen: Affine,
    stroke: &kurbo::Stroke,
    out: &mut Vec<RiverMark>,
) {
    let project = |c: Coord<f64>| to_screen * Point::new(c.x, c.y);
    let line = |ls: &LineString<f64>, out: &mut Vec<RiverMark>| {
        let mut path = BezPath::new();
        for (i, &c) in ls.0.iter().enumerate() {
            if i == 0 {
                path.move_to(project(c));
            } else {
                path.line_to(project(c));
            }
        }
        if ls.0.len() >= 2 {
            let outline = kurbo::stroke(
                path.elements().iter().copied(),
                stroke,
                &kurbo::StrokeOpts::default(),
                PATH_TOLERANCE,
            );
            out.push(RiverMark::Solid(outline));
        }
    };
    let polygon = |p: &Polygon<f64>, out: &mut Vec<RiverMark>| {
        let mut rings = BezPath::new();
        for ring in std::iter::once(p.exterior()).chain(p.interiors()) {
            let mut pts = ring.0.iter().map(|&c| project(c));
            let Some(first) = pts.next() else { continue };
            rings.move_to(first);
            for pt in pts {
                rings.line_to(pt);
            }
            rings.close_path();
        }
        let outline = kurbo::stroke(
            rings.elements().iter().copied(),
            stroke,
            &kurbo::StrokeOpts::default(),
            PATH_TOLERANCE,
        );
        out.push(RiverMark::Area(rings));
        out.push(RiverMark::Solid(outline));
    };
    let point = |c: Coord<f64>, out: &mut Vec<RiverMark>| {
        let disc = kurbo::Circle::new(project(c), POINT_RADIUS_PX).to_path(PATH_TOLERANCE);
        out.push(RiverMark::Solid(disc));
    };

    match g {
        Geometry::Point(p) => point(p.0, out),
        Geometry::MultiPoint(mp) => mp.iter().for_each(|p| point(p.0, out)),
        Geometry::Line(l) => line(&LineString::new(vec![l.start, l.end]), out),
        Geometry::LineString(ls) => line(ls, out),
        Geometry::MultiLineString(mls) => mls.iter().for_each(|ls| line(ls, out)),
        Geometry::Polygon(p) => polygon(p, out),
        Geometry::MultiPolygon(mp) => mp.iter().for_each(|p| polygon(p, out)),
        Geometry::Rect(r) => polygon(&r.to_polygon(), out),
        Geometry::Triangle(t) => polygon(&t.to_polygon(), out),
        Geometry::GeometryCollection(gc) => gc
            .iter()
            .for_each(|g| river_marks(g, to_screen, stroke, out)),
    }
}

fn color_to_cpu(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// Wrap premultiplied RGBA8 bytes as a nearest-neighbour image paint.
fn image_from_premul(
    rgba8_premul: &[u8],
    width: usize,
    height: usize,
) -> FloodResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FloodError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FloodError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width * height * 4 {
        return Err(FloodError::render("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels: Vec<_> = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler {
            quality: vello_cpu::peniko::ImageQuality::Low,
            ..Default::default()
        },
    })
}

/// Screen-space bounds of the prepared river marks.
#[cfg(test)]
fn river_bounds(renderer: &FrameRenderer) -> Option<kurbo::Rect> {
    renderer
        .rivers
        .iter()
        .map(|m| match m {
            RiverMark::Solid(p) | RiverMark::Area(p) => p.bounding_box(),
        })
        .reduce(|a, b| a.union(b))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
