use crate::composition::model::VideoConfig;

/// A click on one of the card controls: press starts, then releases after `duration`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Press {
    /// Frame the press starts.
    pub start: f64,
    /// Press length in frames.
    pub duration: f64,
    /// Frame the release (spring back) starts.
    pub release: f64,
}

impl Press {
    fn new(start: f64, duration: f64) -> Self {
        Self {
            start,
            duration,
            release: start + duration,
        }
    }

    /// `true` from the press start (inclusive) until the release (exclusive).
    pub fn is_pressing(&self, frame: f64) -> bool {
        frame >= self.start && frame < self.release
    }
}

/// Every timeline marker of the overlay, in (possibly fractional) frames.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Timeline {
    /// Frames per second the markers were derived with.
    pub fps: f64,
    /// Thumbs-up click.
    pub thumb: Press,
    /// Subscribe button click.
    pub button: Press,
    /// Bell click.
    pub bell: Press,
    /// Thumb turns black from here on.
    pub liked_at: f64,
    /// Button shows "Subscribed" from here on.
    pub subscribed_at: f64,
    /// Bell turns active from here on.
    pub bell_active_at: f64,
    /// Slide-in spring duration (whole frames).
    pub slide_in_frames: f64,
    /// First frame of the slide-out.
    pub slide_out_start: f64,
    /// Length of the upward pull before sliding out.
    pub wind_up_frames: f64,
    /// Bell swing length after release.
    pub bell_swing_frames: f64,
    /// Hand cursor becomes visible.
    pub hand_appear: f64,
    /// Hand arrives this long before a press.
    pub hand_lead: f64,
    /// Hand leaves this long after a release.
    pub hand_linger: f64,
    /// Hand reaches the exit point.
    pub hand_exit_end: f64,
}

impl Timeline {
    /// Derive the markers for a video configuration.
    pub fn new(video: &VideoConfig) -> Self {
        let s = |secs: f64| video.secs(secs);
        let thumb = Press::new(s(1.0), s(0.12));
        let button = Press::new(s(2.0), s(0.15));
        let bell = Press::new(s(3.0), s(0.12));
        Self {
            fps: video.fps_f64(),
            thumb,
            button,
            bell,
            liked_at: thumb.release + s(0.15),
            subscribed_at: button.release + s(0.2),
            bell_active_at: bell.release + s(0.15),
            slide_in_frames: s(0.6).round(),
            slide_out_start: video.duration_in_frames as f64 - s(0.6),
            wind_up_frames: 4.0,
            bell_swing_frames: s(0.8),
            hand_appear: s(0.4),
            hand_lead: s(0.2),
            hand_linger: s(0.3),
            hand_exit_end: bell.release + s(0.8),
        }
    }

    /// `true` while any of the three controls is being pressed.
    pub fn is_clicking(&self, frame: f64) -> bool {
        self.thumb.is_pressing(frame)
            || self.button.is_pressing(frame)
            || self.bell.is_pressing(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cta/timeline.rs"]
mod tests;
