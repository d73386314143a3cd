use std::io::Cursor;

use tiff::encoder::{TiffEncoder, colortype};

use super::*;

fn encode_f32(cols: u32, rows: u32, data: &[f32], georef: bool) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).unwrap();
        let mut image = encoder
            .new_image::<colortype::Gray32Float>(cols, rows)
            .unwrap();
        if georef {
            let scale = [30.0f64, 30.0, 0.0];
            let tiepoint = [0.0f64, 0.0, 0.0, 440_000.0, 3_750_000.0, 0.0];
            image
                .encoder()
                .write_tag(Tag::Unknown(MODEL_PIXEL_SCALE), &scale[..])
                .unwrap();
            image
                .encoder()
                .write_tag(Tag::Unknown(MODEL_TIEPOINT), &tiepoint[..])
                .unwrap();
        }
        image.write_data(data).unwrap();
    }
    buf
}

#[test]
fn reads_band_values_and_shape() {
    let data = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0];
    let bytes = encode_f32(3, 2, &data, true);
    let dem = read_dem_from_buffer(&bytes).unwrap();
    assert_eq!(dem.grid.shape(), (2, 3));
    assert_eq!(dem.grid.get(1, 2), Some(&6.0));
    assert_eq!(dem.grid.get(0, 0), Some(&1.0));
}

#[test]
fn reads_tiepoint_and_scale_georeferencing() {
    let bytes = encode_f32(2, 2, &[0.0; 4], true);
    let dem = read_dem_from_buffer(&bytes).unwrap();
    assert_eq!(
        dem.transform,
        GeoTransform::new(440_000.0, 3_750_000.0, 30.0, -30.0)
    );
    let e = dem.extent();
    assert_eq!(e.left, 440_000.0);
    assert_eq!(e.right, 440_060.0);
    assert_eq!(e.top, 3_750_000.0);
    assert_eq!(e.bottom, 3_749_940.0);
}

#[test]
fn missing_georeferencing_falls_back_to_cell_coordinates() {
    let bytes = encode_f32(2, 2, &[0.0; 4], false);
    let dem = read_dem_from_buffer(&bytes).unwrap();
    assert_eq!(dem.transform, GeoTransform::IDENTITY);
}

#[test]
fn integer_samples_are_widened() {
    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).unwrap();
        encoder
            .write_image::<colortype::Gray16>(2, 1, &[100u16, 65_000])
            .unwrap();
    }
    let dem = read_dem_from_buffer(&buf).unwrap();
    assert_eq!(dem.grid.data(), &[100.0, 65_000.0]);
}

#[test]
fn chunky_multiband_keeps_first_sample() {
    let mut buf = Vec::new();
    {
        let mut encoder = TiffEncoder::new(Cursor::new(&mut buf)).unwrap();
        encoder
            .write_image::<colortype::RGB8>(2, 1, &[10u8, 20, 30, 40, 50, 60])
            .unwrap();
    }
    let dem = read_dem_from_buffer(&buf).unwrap();
    assert_eq!(dem.grid.data(), &[10.0, 40.0]);
}

#[test]
fn garbage_bytes_are_a_raster_error() {
    let err = read_dem_from_buffer(b"definitely not a tiff").unwrap_err();
    assert!(matches!(err, FloodError::Raster(_)));
}

#[test]
fn missing_file_is_a_raster_error() {
    let err = read_dem(Path::new("target/does-not-exist/dem.tif")).unwrap_err();
    assert!(matches!(err, FloodError::Raster(_)));
}

#[test]
fn first_band_rejects_short_buffers() {
    assert!(first_band(vec![1.0], 2, 1, 1).is_err());
    assert_eq!(
        first_band(vec![1.0, 2.0, 3.0, 4.0], 2, 2, 2).unwrap(),
        vec![1.0, 2.0]
    );
}
