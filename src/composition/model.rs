use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{CtaError, CtaResult};
use crate::metadata::youtube::SubscriberSource;

/// Composition id of the overlay.
pub const COMPOSITION_ID: &str = "YouTubeCTA";

/// Channel name shown on the card.
pub const CHANNEL_NAME: &str = "Build at Scale";

/// Input props of the overlay.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CtaProps {
    /// Subscriber count shown under the channel name.
    #[serde(alias = "subCount")]
    pub sub_count: u64,
    /// Channel name shown in bold.
    #[serde(default = "default_channel_name", alias = "channelName")]
    pub channel_name: String,
}

fn default_channel_name() -> String {
    CHANNEL_NAME.to_owned()
}

impl Default for CtaProps {
    fn default() -> Self {
        Self {
            sub_count: 0,
            channel_name: default_channel_name(),
        }
    }
}

impl CtaProps {
    /// Props with the given subscriber count and the default channel name.
    pub fn with_sub_count(sub_count: u64) -> Self {
        Self {
            sub_count,
            ..Self::default()
        }
    }
}

/// Timing and size facts every per-frame computation reads.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VideoConfig {
    /// Frame rate.
    pub fps: Fps,
    /// Total number of frames.
    pub duration_in_frames: u64,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl VideoConfig {
    /// Frame rate as a float.
    pub fn fps_f64(&self) -> f64 {
        self.fps.as_f64()
    }

    /// Seconds converted to a (possibly fractional) frame position.
    pub fn secs(&self, secs: f64) -> f64 {
        self.fps.secs_to_frames(secs)
    }
}

/// A renderable, timed visual asset.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Composition {
    /// Registration id.
    pub id: String,
    /// Output size.
    pub canvas: Canvas,
    /// Frame rate.
    pub fps: Fps,
    /// Total duration (exclusive end frame).
    pub duration: FrameIndex,
    /// Props used when no metadata is resolved.
    pub default_props: CtaProps,
}

impl Composition {
    /// The subscribe overlay: 1920x1080 at 30 fps for 181 frames.
    pub fn youtube_cta() -> Self {
        Self {
            id: COMPOSITION_ID.to_owned(),
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            fps: Fps { num: 30, den: 1 },
            duration: FrameIndex(181),
            default_props: CtaProps::default(),
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> CtaResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CtaError::validation("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(CtaError::validation(
                "canvas width/height must be even (required for yuv420p output)",
            ));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(CtaError::validation(format!(
                "canvas {}x{} exceeds the raster size limit",
                self.canvas.width, self.canvas.height
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if self.duration.0 == 0 {
            return Err(CtaError::validation("composition duration must be >= 1 frame"));
        }
        Ok(())
    }

    /// Video configuration handed to per-frame evaluation.
    pub fn video_config(&self) -> VideoConfig {
        VideoConfig {
            fps: self.fps,
            duration_in_frames: self.duration.0,
            width: self.canvas.width,
            height: self.canvas.height,
        }
    }

    /// The full frame range `[0, duration)`.
    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: self.duration,
        }
    }

    /// Resolve props before rendering by asking `source` for the live subscriber count.
    ///
    /// Called once per render; failures abort the render.
    #[tracing::instrument(skip_all, fields(id = %self.id))]
    pub fn calculate_metadata(&self, source: &dyn SubscriberSource) -> CtaResult<CtaProps> {
        let count = source.subscriber_count()?;
        tracing::info!("Fetched subscriber count: {count}");
        Ok(CtaProps {
            sub_count: count,
            ..self.default_props.clone()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
