use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::Rgb8;
use crate::foundation::error::{FloodError, FloodResult};
use crate::render::backend::FrameRGBA;

/// Palette quantizer speed, `1` (best) to `30` (fastest).
const QUANTIZER_SPEED: i32 = 10;

/// Animated GIF output.
///
/// Frames are buffered until [`FrameSink::end`], which quantizes and writes the whole file at
/// once; a failed run never leaves a partial GIF behind.
#[derive(Debug)]
pub struct GifSink {
    out_path: PathBuf,
    overwrite: bool,
    background: Rgb8,
    cfg: Option<SinkConfig>,
    frames: Vec<RgbaImage>,
}

impl GifSink {
    pub fn new(out_path: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite,
            background: Rgb8::new(255, 255, 255),
            cfg: None,
            frames: Vec::new(),
        }
    }

    /// Color that translucent pixels are flattened onto (GIF has no partial alpha).
    pub fn with_background(mut self, background: Rgb8) -> Self {
        self.background = background;
        self
    }

    fn encode_all(&self, cfg: SinkConfig) -> FloodResult<Vec<u8>> {
        let mut bytes = Vec::new();
        {
            let mut enc = GifEncoder::new_with_speed(&mut bytes, QUANTIZER_SPEED);
            if cfg.loop_forever {
                enc.set_repeat(Repeat::Infinite)
                    .map_err(|e| FloodError::encode(format!("gif repeat: {e}")))?;
            }
            let delay = Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);
            let frames = self
                .frames
                .iter()
                .map(|img| Frame::from_parts(img.clone(), 0, 0, delay));
            enc.encode_frames(frames)
                .map_err(|e| FloodError::encode(format!("gif frames: {e}")))?;
        }
        Ok(bytes)
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> FloodResult<()> {
        cfg.canvas.validate()?;
        if cfg.canvas.width > u32::from(u16::MAX) || cfg.canvas.height > u32::from(u16::MAX) {
            return Err(FloodError::validation("gif frames are limited to 65535x65535"));
        }
        if !self.overwrite && self.out_path.exists() {
            return Err(FloodError::validation(format!(
                "output file '{}' already exists",
                self.out_path.display()
            )));
        }
        ensure_parent_dir(&self.out_path)?;

        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> FloodResult<()> {
        let Some(cfg) = self.cfg else {
            return Err(FloodError::encode("push_frame called before begin"));
        };
        if idx != self.frames.len() {
            return Err(FloodError::validation(format!(
                "frame {idx} pushed out of order (expected {})",
                self.frames.len()
            )));
        }
        if frame.width != cfg.canvas.width || frame.height != cfg.canvas.height {
            return Err(FloodError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.canvas.width, cfg.canvas.height
            )));
        }
        if frame.data.len() != cfg.canvas.rgba_len() {
            return Err(FloodError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        let rgba = flatten_to_opaque_rgba8(&frame.data, frame.premultiplied, self.background);
        let img = RgbaImage::from_raw(frame.width, frame.height, rgba)
            .ok_or_else(|| FloodError::encode("frame buffer does not fit its dimensions"))?;
        self.frames.push(img);
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %self.out_path.display(), frames = self.frames.len()))]
    fn end(&mut self) -> FloodResult<()> {
        let Some(cfg) = self.cfg.take() else {
            return Err(FloodError::encode("end called before begin"));
        };
        if self.frames.is_empty() {
            return Err(FloodError::encode("no frames to encode"));
        }

        let bytes = self.encode_all(cfg)?;
        std::fs::write(&self.out_path, &bytes).map_err(|e| {
            FloodError::encode(format!(
                "failed to write '{}': {e}",
                self.out_path.display()
            ))
        })?;
        tracing::info!(bytes = bytes.len(), "gif written");
        self.frames.clear();
        Ok(())
    }
}

pub fn ensure_parent_dir(path: &Path) -> FloodResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Composite RGBA8 over an opaque background, undoing premultiplication on the way.
fn flatten_to_opaque_rgba8(src: &[u8], src_is_premul: bool, bg: Rgb8) -> Vec<u8> {
    let mut out = Vec::with_capacity(src.len());
    for s in src.chunks_exact(4) {
        let a = u16::from(s[3]);
        if a == 255 {
            out.extend_from_slice(&[s[0], s[1], s[2], 255]);
            continue;
        }
        let inv = 255 - a;
        let channel = |c: u8, b: u8| -> u8 {
            let fg = if src_is_premul {
                u16::from(c)
            } else {
                mul_div255(u16::from(c), a)
            };
            (fg + mul_div255(u16::from(b), inv)).min(255) as u8
        };
        out.extend_from_slice(&[
            channel(s[0], bg.r),
            channel(s[1], bg.g),
            channel(s[2], bg.b),
            255,
        ]);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
