use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::analysis::flood::flood_offsets;
use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::{FloodError, FloodResult};

/// Placeholder replaced by the step offset in [`FloodConfig::title_template`].
pub const OFFSET_PLACEHOLDER: &str = "{offset}";

/// Sun position used for the shaded relief.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightSource {
    /// Degrees clockwise from north.
    pub azimuth_deg: f64,
    /// Degrees above the horizon.
    pub altitude_deg: f64,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            azimuth_deg: 315.0,
            altitude_deg: 45.0,
        }
    }
}

/// Half-open flood height sweep `[start_m, stop_m)` in steps of `step_m`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OffsetSweep {
    pub start_m: f64,
    pub stop_m: f64,
    pub step_m: f64,
}

impl Default for OffsetSweep {
    fn default() -> Self {
        Self {
            start_m: 0.0,
            stop_m: 30.0,
            step_m: 2.0,
        }
    }
}

/// Every tunable of a flood animation run.
///
/// All fields have defaults, so `{}` is a valid JSON configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloodConfig {
    pub light: LightSource,
    pub offsets: OffsetSweep,
    pub canvas: Canvas,
    /// Opacity of the flood layer over the relief, `0..=1`.
    pub flood_opacity: f32,
    /// Flood layer color for dry cells.
    pub flood_low_rgb: Rgb8,
    /// Flood layer color for flooded cells.
    pub flood_high_rgb: Rgb8,
    pub river_rgb: Rgb8,
    pub river_stroke_px: f64,
    pub background_rgb: Rgb8,
    /// Title text; `{offset}` expands to the step offset.
    pub title_template: String,
    pub title_size_px: f64,
    /// Extra `.ttf`/`.otf`/`.ttc` fonts for the title, on top of the system fonts.
    pub font_dir: Option<PathBuf>,
    pub frame_delay_ms: u32,
    pub loop_forever: bool,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            light: LightSource::default(),
            offsets: OffsetSweep::default(),
            canvas: Canvas {
                width: 1000,
                height: 800,
            },
            flood_opacity: 0.5,
            flood_low_rgb: Rgb8::new(0xf7, 0xfb, 0xff),
            flood_high_rgb: Rgb8::new(0x08, 0x30, 0x6b),
            river_rgb: Rgb8::new(0x00, 0x00, 0xff),
            river_stroke_px: 1.5,
            background_rgb: Rgb8::new(0xff, 0xff, 0xff),
            title_template: format!("Flood at {OFFSET_PLACEHOLDER} m"),
            title_size_px: 22.0,
            font_dir: None,
            frame_delay_ms: 500,
            loop_forever: true,
        }
    }
}

impl FloodConfig {
    /// Load a JSON configuration file; missing fields take their defaults.
    pub fn from_json_path(path: &Path) -> FloodResult<Self> {
        let f = std::fs::File::open(path)
            .with_context(|| format!("open config '{}'", path.display()))?;
        let r = std::io::BufReader::new(f);
        let cfg: Self = serde_json::from_reader(r)
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FloodResult<()> {
        self.canvas.validate()?;

        let LightSource {
            azimuth_deg,
            altitude_deg,
        } = self.light;
        if !azimuth_deg.is_finite() {
            return Err(FloodError::validation("light.azimuth_deg must be finite"));
        }
        if !(0.0..=90.0).contains(&altitude_deg) {
            return Err(FloodError::validation(
                "light.altitude_deg must be in [0, 90]",
            ));
        }

        let OffsetSweep {
            start_m,
            stop_m,
            step_m,
        } = self.offsets;
        if !(start_m.is_finite() && stop_m.is_finite() && step_m.is_finite()) {
            return Err(FloodError::validation("offsets must be finite"));
        }
        if step_m <= 0.0 {
            return Err(FloodError::validation("offsets.step_m must be > 0"));
        }
        if stop_m <= start_m {
            return Err(FloodError::validation(
                "offsets.stop_m must be greater than offsets.start_m",
            ));
        }
        flood_offsets(start_m, stop_m, step_m)?;

        if !(0.0..=1.0).contains(&self.flood_opacity) {
            return Err(FloodError::validation("flood_opacity must be in [0, 1]"));
        }
        if !self.river_stroke_px.is_finite() || self.river_stroke_px <= 0.0 {
            return Err(FloodError::validation("river_stroke_px must be > 0"));
        }
        if !self.title_size_px.is_finite() || self.title_size_px <= 0.0 {
            return Err(FloodError::validation("title_size_px must be > 0"));
        }
        if self.frame_delay_ms == 0 {
            return Err(FloodError::validation("frame_delay_ms must be > 0"));
        }
        Ok(())
    }

    /// Title for one step, e.g. `Flood at 4 m`.
    pub fn title_for(&self, offset_m: f64) -> String {
        self.title_template
            .replace(OFFSET_PLACEHOLDER, &format_offset(offset_m))
    }
}

/// Whole offsets print without a fractional part (`4`, not `4.0`).
fn format_offset(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
