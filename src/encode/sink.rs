use crate::foundation::core::Canvas;
use crate::foundation::error::FloodResult;
use crate::render::backend::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    pub canvas: Canvas,
    /// Display time of every frame.
    pub frame_delay_ms: u32,
    /// Loop the animation forever instead of playing it once.
    pub loop_forever: bool,
}

/// Sink contract for consuming rendered frames in sweep order.
///
/// Ordering contract: `push_frame` is called with indices `0, 1, 2, ...` in that order, between
/// one `begin` and one `end`.
pub trait FrameSink {
    fn begin(&mut self, cfg: SinkConfig) -> FloodResult<()>;
    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> FloodResult<()>;
    fn end(&mut self) -> FloodResult<()>;
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    finished: bool,
    /// Frames in sweep order.
    pub frames: Vec<(usize, FrameRGBA)>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// `true` once `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FloodResult<()> {
        self.cfg = Some(cfg);
        self.finished = false;
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> FloodResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FloodResult<()> {
        self.finished = true;
        Ok(())
    }
}
