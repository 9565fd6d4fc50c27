use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CtaError, CtaResult};
use crate::render::backend::FrameRGBA;

/// Stream parameters handed to a sink before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
}

/// Consumer of rendered frames.
///
/// Frames arrive between `begin` and `end` with strictly increasing indices.
pub trait FrameSink: Send {
    /// Open the sink.
    fn begin(&mut self, cfg: SinkConfig) -> CtaResult<()>;
    /// Accept one premultiplied frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CtaResult<()>;
    /// Flush and close.
    fn end(&mut self) -> CtaResult<()>;
}

/// Ordering and size checks every sink applies to incoming frames.
#[derive(Debug, Default)]
pub(crate) struct FrameGate {
    cfg: Option<SinkConfig>,
    last: Option<FrameIndex>,
}

impl FrameGate {
    pub(crate) fn open(&mut self, cfg: SinkConfig) -> CtaResult<()> {
        if self.cfg.is_some() {
            return Err(CtaError::evaluation("sink begin called twice"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(CtaError::validation("sink width/height must be non-zero"));
        }
        self.cfg = Some(cfg);
        self.last = None;
        Ok(())
    }

    pub(crate) fn check(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CtaResult<SinkConfig> {
        let cfg = self
            .cfg
            .ok_or_else(|| CtaError::evaluation("push_frame called before begin"))?;
        if let Some(prev) = self.last
            && idx.0 <= prev.0
        {
            return Err(CtaError::evaluation(format!(
                "frame {} pushed out of order (after frame {})",
                idx.0, prev.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(CtaError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
            return Err(CtaError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        self.last = Some(idx);
        Ok(cfg)
    }

    pub(crate) fn close(&mut self) -> CtaResult<SinkConfig> {
        self.cfg
            .take()
            .ok_or_else(|| CtaError::evaluation("sink end called before begin"))
    }
}

/// Keeps every frame in memory; used by tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    gate: FrameGate,
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config passed to `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Frames received so far, in push order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Take ownership of the received frames.
    pub fn into_frames(self) -> Vec<(FrameIndex, FrameRGBA)> {
        self.frames
    }

    /// `true` once `end` has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> CtaResult<()> {
        self.gate.open(cfg)?;
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CtaResult<()> {
        self.gate.check(idx, frame)?;
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> CtaResult<()> {
        self.gate.close()?;
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
