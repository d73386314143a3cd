//! floodgif renders an animated flood-inundation map from a terrain model and a river layer.
//!
//! The pipeline is a one-shot batch run:
//!
//! - Load a [`Dem`] with [`read_dem`] and a [`RiverLayer`] with [`read_river_layer`]
//! - Derive the baseline water level with [`mean_river_elevation`]
//! - Sweep flood heights and stream one frame per height into a [`FrameSink`] via [`run`]
//! - Write the animation with [`GifSink`], or capture frames with [`InMemorySink`]
#![forbid(unsafe_code)]

mod foundation;

/// Masks, river baseline and flood sweep.
pub mod analysis;
/// Run configuration.
pub mod config;
/// Frame sinks and the GIF writer.
pub mod encode;
/// End-to-end drivers.
pub mod pipeline;
/// Elevation rasters and their georeferencing.
pub mod raster;
/// Frame drawing.
pub mod render;
/// Terrain derivatives.
pub mod terrain;
/// River geometry input.
pub mod vector;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgb8, Rgba8Premul};
pub use crate::foundation::error::{FloodError, FloodResult};

pub use crate::analysis::flood::{FloodStep, flood_mask, flood_offsets, flood_steps};
pub use crate::analysis::rasterize::geometry_mask;
pub use crate::analysis::river_level::{mean_river_elevation, pooled_mean};
pub use crate::config::{FloodConfig, LightSource, OffsetSweep};
pub use crate::encode::gif::GifSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::{PipelineReport, render_flood_frames, run};
pub use crate::raster::geotiff::{Dem, read_dem, read_dem_from_buffer};
pub use crate::raster::geotransform::{Extent, GeoTransform};
pub use crate::raster::grid::{ElevationGrid, FloodMask, Grid, HillshadeGrid};
pub use crate::render::backend::FrameRGBA;
pub use crate::render::cpu::FrameRenderer;
pub use crate::terrain::hillshade::{gradient, hillshade};
pub use crate::vector::layer::RiverLayer;
pub use crate::vector::shp::read_river_layer;
