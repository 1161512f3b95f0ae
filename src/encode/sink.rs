use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRgb;

/// Stream parameters handed to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
}

impl SinkConfig {
    /// Bytes in one RGB24 frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

/// Consumer of rendered frames.
///
/// `push_frame` is called in strictly increasing [`FrameIndex`] order between one `begin`
/// and one `end`.
pub trait FrameSink: Send {
    /// Called once before any frame.
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()>;
    /// Append one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb) -> ReelResult<()>;
    /// Finalize the stream.
    fn end(&mut self) -> ReelResult<()>;
}

/// Frame checks shared by sinks: strictly increasing indices and exact RGB24 geometry.
pub(crate) fn check_frame(
    cfg: &SinkConfig,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRgb,
) -> ReelResult<()> {
    if let Some(last) = last
        && idx <= last
    {
        return Err(ReelError::writer(format!(
            "out-of-order frame index {} after {}",
            idx.0, last.0
        )));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(ReelError::writer(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != cfg.frame_len() {
        return Err(ReelError::writer(format!(
            "frame has {} bytes, expected {} (rgb24)",
            frame.data.len(),
            cfg.frame_len()
        )));
    }
    Ok(())
}

/// Sink that keeps frames in memory, or only counts them.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    keep_frames: bool,
    frames: Vec<(FrameIndex, FrameRgb)>,
    count: u64,
    last_idx: Option<FrameIndex>,
    ended: bool,
}

impl InMemorySink {
    /// Sink that stores every frame.
    pub fn new() -> Self {
        Self {
            keep_frames: true,
            ..Self::default()
        }
    }

    /// Sink that validates and counts frames without storing them.
    pub fn counting() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Stored frames in push order. Empty for a counting sink.
    pub fn frames(&self) -> &[(FrameIndex, FrameRgb)] {
        &self.frames
    }

    /// Frames pushed since `begin`.
    pub fn frame_count(&self) -> u64 {
        self.count
    }

    /// Whether `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.count = 0;
        self.last_idx = None;
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::writer("in-memory sink not started"))?;
        check_frame(cfg, self.last_idx, idx, frame)?;
        self.last_idx = Some(idx);
        self.count += 1;
        if self.keep_frames {
            self.frames.push((idx, frame.clone()));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
