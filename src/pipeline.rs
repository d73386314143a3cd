use crate::analysis::flood::{flood_mask, flood_offsets, flood_steps};
use crate::analysis::river_level::mean_river_elevation;
use crate::config::FloodConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::error::FloodResult;
use crate::raster::geotiff::Dem;
use crate::raster::grid::HillshadeGrid;
use crate::render::cpu::FrameRenderer;
use crate::terrain::hillshade::hillshade;
use crate::vector::layer::RiverLayer;

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineReport {
    pub mean_river_elevation: f64,
    /// Offsets in frame order.
    pub offsets: Vec<f64>,
    /// Flooded cell count per frame.
    pub flooded_cells: Vec<usize>,
}

impl PipelineReport {
    pub fn frames(&self) -> usize {
        self.offsets.len()
    }
}

/// Full run from loaded inputs: hillshade, river baseline, then every flood frame into `sink`.
#[tracing::instrument(skip_all, fields(rows = dem.grid.rows(), cols = dem.grid.cols()))]
pub fn run(
    dem: &Dem,
    layer: &RiverLayer,
    cfg: &FloodConfig,
    sink: &mut dyn FrameSink,
) -> FloodResult<PipelineReport> {
    cfg.validate()?;
    let relief = hillshade(&dem.grid, cfg.light.azimuth_deg, cfg.light.altitude_deg);
    let mean = mean_river_elevation(dem, layer)?;
    render_flood_frames(dem, &relief, layer, mean, cfg, sink)
}

/// Sweep the configured offsets above `mean_river_elevation` and push one frame per offset,
/// in ascending order, between `sink.begin` and `sink.end`.
#[tracing::instrument(skip(dem, hillshade, layer, cfg, sink))]
pub fn render_flood_frames(
    dem: &Dem,
    hillshade: &HillshadeGrid,
    layer: &RiverLayer,
    mean_river_elevation: f64,
    cfg: &FloodConfig,
    sink: &mut dyn FrameSink,
) -> FloodResult<PipelineReport> {
    let offsets = flood_offsets(cfg.offsets.start_m, cfg.offsets.stop_m, cfg.offsets.step_m)?;
    let steps = flood_steps(mean_river_elevation, &offsets);
    let renderer = FrameRenderer::new(dem, hillshade, layer, cfg)?;

    sink.begin(SinkConfig {
        canvas: renderer.canvas(),
        frame_delay_ms: cfg.frame_delay_ms,
        loop_forever: cfg.loop_forever,
    })?;

    let mut flooded_cells = Vec::with_capacity(steps.len());
    for step in &steps {
        let mask = flood_mask(&dem.grid, step.flood_elevation);
        let frame = renderer.render_step(step, &mask)?;
        sink.push_frame(step.index, &frame)?;

        let flooded = mask.count_true();
        tracing::debug!(
            index = step.index,
            offset_m = step.offset_m,
            flood_elevation = step.flood_elevation,
            flooded,
            "frame rendered"
        );
        flooded_cells.push(flooded);
    }

    sink.end()?;
    Ok(PipelineReport {
        mean_river_elevation,
        offsets,
        flooded_cells,
    })
}
