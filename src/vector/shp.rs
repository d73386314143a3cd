//! ESRI shapefile reading into `geo-types` geometries.

use std::path::Path;

use geo_types::{
    Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use shapefile::{PolygonRing, Shape};

use crate::foundation::error::{FloodError, FloodResult};
use crate::vector::layer::RiverLayer;

/// Read every shape of a `.shp` file.
///
/// Coordinates are used as stored; the layer is assumed to share the raster's coordinate
/// reference. Null shapes are skipped. Every failure, whatever its cause, is reported as
/// [`FloodError::Vector`].
#[tracing::instrument]
pub fn read_river_layer(path: &Path) -> FloodResult<RiverLayer> {
    let shapes = shapefile::read_shapes(path).map_err(|e| {
        FloodError::vector(format!("failed to read '{}': {e}", path.display()))
    })?;

    let mut geometries = Vec::with_capacity(shapes.len());
    for (i, shape) in shapes.into_iter().enumerate() {
        match shape_to_geometry(shape) {
            Ok(Some(g)) => geometries.push(g),
            Ok(None) => tracing::debug!(index = i, "skipping null shape"),
            Err(e) => {
                return Err(FloodError::vector(format!(
                    "'{}' shape #{i}: {e}",
                    path.display()
                )));
            }
        }
    }

    tracing::debug!(count = geometries.len(), "loaded river geometries");
    Ok(RiverLayer::new(geometries))
}

trait PlanarXY {
    fn coord(&self) -> Coord<f64>;
}

impl PlanarXY for shapefile::Point {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl PlanarXY for shapefile::PointM {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

impl PlanarXY for shapefile::PointZ {
    fn coord(&self) -> Coord<f64> {
        Coord { x: self.x, y: self.y }
    }
}

/// Convert one shape; `Ok(None)` for null shapes. M and Z values are dropped.
pub(crate) fn shape_to_geometry(shape: Shape) -> Result<Option<Geometry<f64>>, String> {
    let g = match shape {
        Shape::NullShape => return Ok(None),
        Shape::Point(p) => Geometry::Point(Point(p.coord())),
        Shape::PointM(p) => Geometry::Point(Point(p.coord())),
        Shape::PointZ(p) => Geometry::Point(Point(p.coord())),
        Shape::Multipoint(m) => multipoint(m.points()),
        Shape::MultipointM(m) => multipoint(m.points()),
        Shape::MultipointZ(m) => multipoint(m.points()),
        Shape::Polyline(l) => polyline(l.parts()),
        Shape::PolylineM(l) => polyline(l.parts()),
        Shape::PolylineZ(l) => polyline(l.parts()),
        Shape::Polygon(p) => polygon(p.rings()),
        Shape::PolygonM(p) => polygon(p.rings()),
        Shape::PolygonZ(p) => polygon(p.rings()),
        Shape::Multipatch(_) => return Err("multipatch shapes are not supported".to_string()),
    };
    Ok(Some(g))
}

fn line_string<P: PlanarXY>(points: &[P]) -> LineString<f64> {
    LineString::new(points.iter().map(PlanarXY::coord).collect())
}

fn multipoint<P: PlanarXY>(points: &[P]) -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint::new(
        points.iter().map(|p| Point(p.coord())).collect(),
    ))
}

fn polyline<P: PlanarXY>(parts: &[Vec<P>]) -> Geometry<f64> {
    let mut lines: Vec<LineString<f64>> = parts.iter().map(|p| line_string(p)).collect();
    if lines.len() == 1 {
        Geometry::LineString(lines.remove(0))
    } else {
        Geometry::MultiLineString(MultiLineString::new(lines))
    }
}

/// Outer rings open a new polygon; inner rings become holes of the most recent one.
fn polygon<P: PlanarXY>(rings: &[PolygonRing<P>]) -> Geometry<f64> {
    let mut polys: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(pts) => polys.push((line_string(pts), Vec::new())),
            PolygonRing::Inner(pts) => match polys.last_mut() {
                Some((_, holes)) => holes.push(line_string(pts)),
                None => polys.push((line_string(pts), Vec::new())),
            },
        }
    }

    let mut polys: Vec<Polygon<f64>> = polys
        .into_iter()
        .map(|(exterior, holes)| Polygon::new(exterior, holes))
        .collect();
    if polys.len() == 1 {
        Geometry::Polygon(polys.remove(0))
    } else {
        Geometry::MultiPolygon(MultiPolygon::new(polys))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/vector/shp.rs"]
mod tests;
