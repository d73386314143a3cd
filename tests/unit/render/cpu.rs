use geo_types::{Point as GeoPoint, line_string};

use super::*;
use crate::analysis::flood::{flood_mask, flood_steps};
use crate::raster::geotransform::GeoTransform;
use crate::raster::grid::Grid;
use crate::terrain::hillshade::hillshade;

fn bowl() -> Dem {
    let grid = Grid::from_rows(vec![
        vec![10.0, 10.0, 10.0],
        vec![10.0, 5.0, 10.0],
        vec![10.0, 10.0, 10.0],
    ])
    .unwrap();
    Dem::new(grid, GeoTransform::IDENTITY)
}

fn small_cfg() -> FloodConfig {
    FloodConfig {
        canvas: Canvas {
            width: 200,
            height: 160,
        },
        ..FloodConfig::default()
    }
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 2)
}

fn screen_px(r: &FrameRenderer, x: f64, y: f64) -> (u32, u32) {
    let p = r.layout().geo_to_screen() * Point::new(x, y);
    (p.x.floor() as u32, p.y.floor() as u32)
}

#[test]
fn frame_matches_canvas_and_is_opaque() {
    let dem = bowl();
    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let layer = RiverLayer::new(vec![Geometry::Point(GeoPoint::new(1.5, 1.5))]);
    let cfg = small_cfg();
    let r = FrameRenderer::new(&dem, &hs, &layer, &cfg).unwrap();

    let step = flood_steps(5.0, &[0.0])[0];
    let frame = r
        .render_step(&step, &flood_mask(&dem.grid, step.flood_elevation))
        .unwrap();
    assert_eq!((frame.width, frame.height), (200, 160));
    assert_eq!(frame.data.len(), 200 * 160 * 4);
    assert!(frame.premultiplied);
    assert!(frame.data.chunks_exact(4).all(|px| px[3] == 255));

    // Margins outside the plot keep the figure background.
    assert!(close(frame.pixel(0, 0).unwrap(), [255, 255, 255, 255]));
    assert!(close(frame.pixel(199, 159).unwrap(), [255, 255, 255, 255]));
}

#[test]
fn opaque_flood_layer_shows_ramp_stops_and_river_on_top() {
    let dem = bowl();
    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let layer = RiverLayer::new(vec![Geometry::Point(GeoPoint::new(0.5, 2.5))]);
    let cfg = FloodConfig {
        flood_opacity: 1.0,
        ..small_cfg()
    };
    let r = FrameRenderer::new(&dem, &hs, &layer, &cfg).unwrap();

    let step = flood_steps(5.0, &[0.0])[0];
    let frame = r
        .render_step(&step, &flood_mask(&dem.grid, step.flood_elevation))
        .unwrap();

    let (x, y) = screen_px(&r, 1.5, 1.5);
    assert!(close(frame.pixel(x, y).unwrap(), [0x08, 0x30, 0x6b, 255]));
    let (x, y) = screen_px(&r, 2.5, 0.5);
    assert!(close(frame.pixel(x, y).unwrap(), [0xf7, 0xfb, 0xff, 255]));
    let (x, y) = screen_px(&r, 0.5, 2.5);
    assert!(close(frame.pixel(x, y).unwrap(), [0, 0, 255, 255]));
}

#[test]
fn half_opacity_blends_flood_over_relief() {
    let dem = bowl();
    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let r = FrameRenderer::new(&dem, &hs, &RiverLayer::default(), &small_cfg()).unwrap();

    let step = flood_steps(5.0, &[0.0])[0];
    let frame = r
        .render_step(&step, &flood_mask(&dem.grid, step.flood_elevation))
        .unwrap();
    let (x, y) = screen_px(&r, 1.5, 1.5);
    let px = frame.pixel(x, y).unwrap();
    assert!(!close(px, [0x08, 0x30, 0x6b, 255]));
    assert!(px[0] >= 0x08 / 2 && px[2] >= 0x6b / 2);
}

#[test]
fn river_lines_are_projected_into_the_plot() {
    let dem = bowl();
    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let layer = RiverLayer::new(vec![Geometry::LineString(
        line_string![(x: 0.5, y: 1.5), (x: 2.5, y: 1.5)],
    )]);
    let r = FrameRenderer::new(&dem, &hs, &layer, &small_cfg()).unwrap();
    let b = river_bounds(&r).unwrap();
    let plot = r.layout().plot();
    assert!(b.x0 > plot.x0 && b.x1 < plot.x1);
    assert!(b.y0 > plot.y0 && b.y1 < plot.y1);
    // Stroke width carries into the outline.
    assert!((b.height() - 1.5).abs() < 0.2);
}

#[test]
fn mismatched_inputs_are_rejected() {
    let dem = bowl();
    let small = Grid::filled(2, 2, 0.0);
    assert!(matches!(
        FrameRenderer::new(&dem, &small, &RiverLayer::default(), &small_cfg()),
        Err(FloodError::Validation(_))
    ));

    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let r = FrameRenderer::new(&dem, &hs, &RiverLayer::default(), &small_cfg()).unwrap();
    let step = flood_steps(5.0, &[0.0])[0];
    assert!(matches!(
        r.render_step(&step, &Grid::filled(3, 4, false)),
        Err(FloodError::Validation(_))
    ));
}

#[test]
fn rasters_wider_than_an_image_are_resampled_to_the_plot() {
    let grid = Grid::from_fn(1, 70_000, |_, c| (c % 100) as f64);
    let dem = Dem::new(grid, GeoTransform::IDENTITY);
    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let cfg = FloodConfig {
        canvas: Canvas {
            width: 160,
            height: 120,
        },
        ..FloodConfig::default()
    };
    let r = FrameRenderer::new(&dem, &hs, &RiverLayer::default(), &cfg).unwrap();
    let plot = r.layout().plot();
    assert!(r.image_shape.1 as f64 <= plot.width().ceil());
    assert_eq!(r.image_shape.0, 1);

    let step = flood_steps(50.0, &[0.0])[0];
    let frame = r
        .render_step(&step, &flood_mask(&dem.grid, step.flood_elevation))
        .unwrap();
    assert_eq!((frame.width, frame.height), (160, 120));
}

#[test]
fn small_rasters_keep_one_pixel_per_cell() {
    let dem = bowl();
    let hs = hillshade(&dem.grid, 315.0, 45.0);
    let r = FrameRenderer::new(&dem, &hs, &RiverLayer::default(), &small_cfg()).unwrap();
    assert_eq!(r.image_shape, (3, 3));
}
