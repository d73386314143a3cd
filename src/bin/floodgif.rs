use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

/// Printed when the river layer cannot be used, before anything is written.
const RIVER_LOAD_ERROR: &str =
    "Error reading the river shapefile. Check the format and the coordinate system.";

#[derive(Parser, Debug)]
#[command(name = "floodgif", version, about = "Render a flood inundation GIF from a DEM and a river shapefile")]
struct Cli {
    /// Single-band elevation GeoTIFF.
    #[arg(long, default_value = "DEM_Rio_Caqueta/Rio_Caqueta.tif")]
    dem: PathBuf,

    /// River shapefile (`.shp`), in the same coordinate system as the DEM.
    #[arg(long, default_value = "DEM_Rio_Caqueta/Rio.shp")]
    river: PathBuf,

    /// Output GIF path.
    #[arg(long, default_value = "inundacion.gif")]
    out: PathBuf,

    /// Optional JSON run configuration; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => floodgif::FloodConfig::from_json_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => floodgif::FloodConfig::default(),
    };

    let dem = floodgif::read_dem(&cli.dem)
        .with_context(|| format!("read DEM '{}'", cli.dem.display()))?;

    let layer = match floodgif::read_river_layer(&cli.river) {
        Ok(layer) => layer,
        Err(e) => {
            tracing::debug!(error = %e, path = %cli.river.display(), "river layer rejected");
            println!("{RIVER_LOAD_ERROR}");
            return Ok(());
        }
    };

    let mut sink = floodgif::GifSink::new(&cli.out, !cli.no_overwrite)
        .with_background(cfg.background_rgb);
    let report = floodgif::run(&dem, &layer, &cfg, &mut sink).context("render flood animation")?;
    tracing::info!(
        frames = report.frames(),
        mean_river_elevation = report.mean_river_elevation,
        "done"
    );

    println!("Animation saved to: {}", cli.out.display());
    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
