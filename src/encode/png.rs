use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::encode::sink::{FrameGate, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CtaError, CtaResult};
use crate::render::backend::FrameRGBA;

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
///
/// Pixels are written with straight alpha so the sequence keeps the transparent background.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    gate: FrameGate,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing into `dir`; the directory is created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            gate: FrameGate::default(),
            written: 0,
        }
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("frame_{:05}.png", idx.0)
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> CtaResult<()> {
        self.gate.open(cfg)?;
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create png output directory '{}'", self.dir.display())
        })?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CtaResult<()> {
        let cfg = self.gate.check(idx, frame)?;

        let straight = frame.to_straight_rgba8();
        let path = self.dir.join(Self::file_name(idx));
        image::save_buffer_with_format(
            &path,
            &straight,
            cfg.width,
            cfg.height,
            image::ExtendedColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| {
            CtaError::evaluation(format!("failed to write '{}': {e}", path.display()))
        })?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> CtaResult<()> {
        self.gate.close()?;
        tracing::info!(dir = %self.dir.display(), frames = self.written, "png sequence written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
