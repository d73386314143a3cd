use super::*;

fn north_up() -> GeoTransform {
    GeoTransform::new(500_000.0, 10_000.0, 30.0, -30.0)
}

#[test]
fn affine_and_inverse_agree() {
    let gt = north_up();
    let p = gt.to_affine() * kurbo::Point::new(4.5, 7.5);
    let (x, y) = (p.x, p.y);
    assert_eq!((x, y), (500_000.0 + 4.5 * 30.0, 10_000.0 - 7.5 * 30.0));
    let (col, row) = gt.geo_to_pixel(x, y).unwrap();
    assert!((col - 4.5).abs() < 1e-9);
    assert!((row - 7.5).abs() < 1e-9);
}

#[test]
fn degenerate_transform_has_no_inverse() {
    let gt = GeoTransform::new(0.0, 0.0, 0.0, -1.0);
    assert!(gt.geo_to_pixel(1.0, 1.0).is_none());
}

#[test]
fn extent_is_ordered_for_north_up_and_identity() {
    let e = north_up().extent(10, 20);
    assert_eq!(e.left, 500_000.0);
    assert_eq!(e.right, 500_600.0);
    assert_eq!(e.bottom, 9_700.0);
    assert_eq!(e.top, 10_000.0);
    assert_eq!(e.width(), 600.0);
    assert_eq!(e.height(), 300.0);

    let id = GeoTransform::IDENTITY.extent(3, 4);
    assert_eq!((id.left, id.right, id.bottom, id.top), (0.0, 4.0, 0.0, 3.0));
}

#[test]
fn kurbo_affine_includes_rotation_terms() {
    let gt = GeoTransform {
        row_rotation: 0.5,
        col_rotation: 0.25,
        ..GeoTransform::new(10.0, 20.0, 2.0, -3.0)
    };
    let p = gt.to_affine() * kurbo::Point::new(3.0, 5.0);
    assert!((p.x - (10.0 + 3.0 * 2.0 + 5.0 * 0.5)).abs() < 1e-12);
    assert!((p.y - (20.0 + 3.0 * 0.25 - 5.0 * 3.0)).abs() < 1e-12);
    let (col, row) = gt.geo_to_pixel(p.x, p.y).unwrap();
    assert!((col - 3.0).abs() < 1e-9 && (row - 5.0).abs() < 1e-9);
}
