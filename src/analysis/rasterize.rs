//! Burning vector geometries into grid-aligned boolean masks.
//!
//! Masks use inverted semantics: `true` marks cells inside (or touched by) the geometry.
//! Polygons cover the cells whose center lies inside them (even-odd rule over exterior and
//! holes). Lines burn one cell per unit step along the segment's major axis, so a diagonal
//! yields an 8-connected staircase and cells only grazed at a corner stay clear. Points cover
//! the cell that contains them. Parts falling outside the raster are ignored.

use geo_types::{Coord, Geometry, LineString, Polygon};

use crate::foundation::error::{FloodError, FloodResult};
use crate::raster::geotransform::GeoTransform;
use crate::raster::grid::Grid;

/// Rasterize one geometry onto a `rows x cols` grid georeferenced by `transform`.
pub fn geometry_mask(
    geometry: &Geometry<f64>,
    transform: &GeoTransform,
    rows: usize,
    cols: usize,
) -> FloodResult<Grid<bool>> {
    let mut burner = Burner {
        transform,
        mask: Grid::filled(rows, cols, false),
    };
    burner.geometry(geometry)?;
    Ok(burner.mask)
}

struct Burner<'a> {
    transform: &'a GeoTransform,
    mask: Grid<bool>,
}

impl Burner<'_> {
    fn to_pixel(&self, c: Coord<f64>) -> FloodResult<Coord<f64>> {
        let (x, y) = self
            .transform
            .geo_to_pixel(c.x, c.y)
            .ok_or_else(|| FloodError::validation("raster transform is not invertible"))?;
        Ok(Coord { x, y })
    }

    fn geometry(&mut self, g: &Geometry<f64>) -> FloodResult<()> {
        match g {
            Geometry::Point(p) => self.point(p.0),
            Geometry::MultiPoint(mp) => mp.iter().try_for_each(|p| self.point(p.0)),
            Geometry::Line(l) => self.segment(l.start, l.end),
            Geometry::LineString(ls) => self.line_string(ls),
            Geometry::MultiLineString(mls) => mls.iter().try_for_each(|ls| self.line_string(ls)),
            Geometry::Polygon(p) => self.polygon(p),
            Geometry::MultiPolygon(mp) => mp.iter().try_for_each(|p| self.polygon(p)),
            Geometry::Rect(r) => self.polygon(&r.to_polygon()),
            Geometry::Triangle(t) => self.polygon(&t.to_polygon()),
            Geometry::GeometryCollection(gc) => gc.iter().try_for_each(|g| self.geometry(g)),
        }
    }

    fn mark(&mut self, col: i64, row: i64) {
        if col < 0 || row < 0 {
            return;
        }
        if let Some(cell) = self.mask.get_mut(row as usize, col as usize) {
            *cell = true;
        }
    }

    fn point(&mut self, c: Coord<f64>) -> FloodResult<()> {
        let p = self.to_pixel(c)?;
        if p.x.is_finite() && p.y.is_finite() {
            self.mark(p.x.floor() as i64, p.y.floor() as i64);
        }
        Ok(())
    }

    fn line_string(&mut self, ls: &LineString<f64>) -> FloodResult<()> {
        match ls.0.as_slice() {
            [] => Ok(()),
            [only] => self.point(*only),
            coords => coords
                .windows(2)
                .try_for_each(|w| self.segment(w[0], w[1])),
        }
    }

    fn segment(&mut self, a: Coord<f64>, b: Coord<f64>) -> FloodResult<()> {
        let a = self.to_pixel(a)?;
        let b = self.to_pixel(b)?;
        let bounds = (self.mask.cols() as f64, self.mask.rows() as f64);
        if let Some((a, b)) = clip_segment(a, b, bounds) {
            for (col, row) in line_cells(a, b) {
                self.mark(col, row);
            }
        }
        Ok(())
    }

    fn polygon(&mut self, poly: &Polygon<f64>) -> FloodResult<()> {
        let mut edges: Vec<(Coord<f64>, Coord<f64>)> = Vec::new();
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            let px: Vec<Coord<f64>> = ring
                .0
                .iter()
                .map(|&c| self.to_pixel(c))
                .collect::<FloodResult<_>>()?;
            if px.len() < 3 {
                continue;
            }
            for i in 0..px.len() {
                let j = (i + 1) % px.len();
                if px[i] != px[j] {
                    edges.push((px[i], px[j]));
                }
            }
        }

        let (rows, cols) = self.mask.shape();
        let mut crossings: Vec<f64> = Vec::new();
        for row in 0..rows {
            let y = row as f64 + 0.5;
            crossings.clear();
            for &(p, q) in &edges {
                if (p.y <= y) != (q.y <= y) {
                    crossings.push(p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                // Cells whose center x (col + 0.5) lies in [x0, x1).
                let first = (pair[0] - 0.5).ceil().max(0.0);
                let end = (pair[1] - 0.5).ceil().min(cols as f64);
                if first >= end {
                    continue;
                }
                for col in first as usize..end as usize {
                    self.mark(col as i64, row as i64);
                }
            }
        }
        Ok(())
    }
}

/// Liang-Barsky clip of segment `a -> b` against `[0, w] x [0, h]`.
fn clip_segment(
    a: Coord<f64>,
    b: Coord<f64>,
    (w, h): (f64, f64),
) -> Option<(Coord<f64>, Coord<f64>)> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }
    let d = b - a;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-d.x, a.x), (d.x, w - a.x), (-d.y, a.y), (d.y, h - a.y)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((a + d * t0, a + d * t1))
}

/// DDA walk of `a -> b` in pixel space: one sample per unit of the longer axis, endpoints
/// included.
fn line_cells(a: Coord<f64>, b: Coord<f64>) -> Vec<(i64, i64)> {
    let d = b - a;
    let steps = d.x.abs().max(d.y.abs()).ceil() as usize;
    let cell = |p: Coord<f64>| (p.x.floor() as i64, p.y.floor() as i64);
    if steps == 0 {
        return vec![cell(a)];
    }
    let mut cells: Vec<(i64, i64)> = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let c = cell(a + d * (i as f64 / steps as f64));
        if cells.last() != Some(&c) {
            cells.push(c);
        }
    }
    cells
}

#[cfg(test)]
#[path = "../../tests/unit/analysis/rasterize.rs"]
mod tests;
