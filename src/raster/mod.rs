pub mod geotiff;
pub mod geotransform;
pub mod grid;
