//! Single-band GeoTIFF reading.
//!
//! Reads band 1 into an [`ElevationGrid`] and recovers the affine georeferencing from the
//! GeoTIFF model tags. There is no nodata handling and no band-count validation: extra bands are
//! ignored and every sample is widened to `f64`.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::foundation::error::{FloodError, FloodResult};
use crate::raster::geotransform::{Extent, GeoTransform};
use crate::raster::grid::ElevationGrid;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;

/// A loaded elevation raster.
#[derive(Clone, Debug)]
pub struct Dem {
    /// Band 1 elevations.
    pub grid: ElevationGrid,
    /// Cell-to-geographic mapping.
    pub transform: GeoTransform,
}

impl Dem {
    pub fn new(grid: ElevationGrid, transform: GeoTransform) -> Self {
        Self { grid, transform }
    }

    /// Geographic extent covered by the grid.
    pub fn extent(&self) -> Extent {
        self.transform.extent(self.grid.rows(), self.grid.cols())
    }
}

/// Read band 1 of a GeoTIFF file.
#[tracing::instrument]
pub fn read_dem(path: &Path) -> FloodResult<Dem> {
    let file = File::open(path).map_err(|e| {
        FloodError::raster(format!("failed to open raster '{}': {e}", path.display()))
    })?;
    let dem = decode_dem(BufReader::new(file))
        .map_err(|e| FloodError::raster(format!("'{}': {e}", path.display())))?;
    tracing::debug!(
        rows = dem.grid.rows(),
        cols = dem.grid.cols(),
        "loaded elevation raster"
    );
    Ok(dem)
}

/// Read band 1 of an in-memory GeoTIFF.
pub fn read_dem_from_buffer(bytes: &[u8]) -> FloodResult<Dem> {
    decode_dem(Cursor::new(bytes)).map_err(FloodError::raster)
}

fn decode_dem<R: Read + Seek>(reader: R) -> Result<Dem, String> {
    let mut decoder = Decoder::new(reader).map_err(|e| format!("TIFF decode error: {e}"))?;
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| format!("cannot read dimensions: {e}"))?;
    let (rows, cols) = (height as usize, width as usize);

    let samples = decoder
        .get_tag_u32(Tag::SamplesPerPixel)
        .map(|v| v.max(1) as usize)
        .unwrap_or(1);
    let planar = decoder.get_tag_u32(Tag::PlanarConfiguration).unwrap_or(1);

    let image = decoder
        .read_image()
        .map_err(|e| format!("cannot read image data: {e}"))?;
    let values = widen_samples(image)?;
    let data = first_band(values, rows * cols, samples, planar)?;

    let grid = ElevationGrid::from_vec(data, rows, cols).map_err(|e| e.to_string())?;
    let transform = match read_geotransform(&mut decoder) {
        Some(gt) => gt,
        None => {
            tracing::warn!("raster has no georeferencing tags; using cell coordinates");
            GeoTransform::IDENTITY
        }
    };
    Ok(Dem { grid, transform })
}

fn widen_samples(image: DecodingResult) -> Result<Vec<f64>, String> {
    Ok(match image {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        #[allow(unreachable_patterns)]
        _ => return Err("unsupported TIFF sample format".to_string()),
    })
}

/// Keep only band 1 from chunky (`planar == 1`) or planar (`planar == 2`) sample layouts.
fn first_band(
    values: Vec<f64>,
    cells: usize,
    samples: usize,
    planar: u32,
) -> Result<Vec<f64>, String> {
    if values.len() == cells {
        return Ok(values);
    }
    if values.len() < cells {
        return Err(format!(
            "raster holds {} samples, expected at least {cells}",
            values.len()
        ));
    }
    if planar == 2 {
        let mut values = values;
        values.truncate(cells);
        return Ok(values);
    }
    if values.len() != cells * samples {
        return Err(format!(
            "raster holds {} samples, expected {cells}x{samples}",
            values.len()
        ));
    }
    Ok(values.into_iter().step_by(samples).collect())
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    if let Ok(m) = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_TRANSFORMATION))
        && m.len() >= 8
    {
        // Row-major 4x4: x = m0*col + m1*row + m3, y = m4*col + m5*row + m7.
        return Some(GeoTransform {
            origin_x: m[3],
            origin_y: m[7],
            pixel_width: m[0],
            pixel_height: m[5],
            row_rotation: m[1],
            col_rotation: m[4],
        });
    }

    let scale = decoder
        .get_tag_f64_vec(Tag::Unknown(MODEL_PIXEL_SCALE))
        .ok()?;
    let tiepoint = decoder.get_tag_f64_vec(Tag::Unknown(MODEL_TIEPOINT)).ok()?;
    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }
    // tiepoint: [I, J, K, X, Y, Z], scale: [sx, sy, sz]
    Some(GeoTransform::new(
        tiepoint[3] - tiepoint[0] * scale[0],
        tiepoint[4] + tiepoint[1] * scale[1],
        scale[0],
        -scale[1],
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/geotiff.rs"]
mod tests;
