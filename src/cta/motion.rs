//! Per-frame motion values of the overlay.
//!
//! Everything here is a pure function of the frame index and the video configuration.

use crate::animation::ease::Ease;
use crate::animation::interpolate::{InterpolateOpts, interpolate, interpolate_clamped};
use crate::animation::spring::{SpringConfig, SpringParams, spring};
use crate::composition::model::VideoConfig;
use crate::cta::hand::{HandPath, HandState};
use crate::cta::timeline::{Press, Timeline};
use crate::foundation::core::{FrameIndex, Rgba8Premul};
use crate::foundation::error::CtaResult;

/// Card slide in/out spring.
pub const CARD_SPRING: SpringConfig = SpringConfig::new(16.0, 150.0, 0.8);
/// Thumb and button release spring.
pub const CLICK_SPRING: SpringConfig = SpringConfig::new(8.0, 200.0, 0.8);
/// Bell release spring.
pub const BELL_SPRING: SpringConfig = SpringConfig::new(6.0, 180.0, 0.6);

/// Distance the card travels when sliding in or out.
const SLIDE_DISTANCE: f64 = 400.0;
/// Upward pull before sliding out.
const WIND_UP_DISTANCE: f64 = -30.0;

const THUMB_IDLE_SCALE: f64 = 1.1;
const THUMB_PRESSED_SCALE: f64 = 0.9;
const BUTTON_PRESSED_SCALE: f64 = 0.92;
const BELL_PRESSED_SCALE: f64 = 0.8;
const BUTTON_SNAP_EPSILON: f64 = 0.002;
const BELL_SWING_DEGREES: f64 = 14.0;
const BELL_SWING_TURNS: f64 = 3.0;

/// Subscribe button background before subscribing.
pub const BUTTON_RED: Rgba8Premul = Rgba8Premul::opaque(0xCC, 0x00, 0x00);
/// Subscribe button background after subscribing.
pub const BUTTON_GREY: Rgba8Premul = Rgba8Premul::opaque(0x33, 0x33, 0x33);

/// All motion values for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CtaFrame {
    /// Frame these values belong to.
    pub frame: u64,
    /// Vertical card offset (slide in + slide out), in pixels.
    pub card_offset_y: f64,
    /// Thumbs-up scale about its centre.
    pub thumb_scale: f64,
    /// Thumbs-up is drawn black.
    pub liked: bool,
    /// Subscribe button scale about its centre.
    pub button_scale: f64,
    /// Button shows its subscribed state.
    pub subscribed: bool,
    /// Bell scale about its top centre.
    pub bell_scale: f64,
    /// Bell rotation in degrees about its top centre.
    pub bell_rotation_deg: f64,
    /// Bell is drawn in colour instead of grey.
    pub bell_active: bool,
    /// Hand cursor.
    pub hand: HandState,
}

impl CtaFrame {
    /// Evaluate every motion value at `frame`.
    pub fn evaluate(frame: FrameIndex, video: &VideoConfig) -> CtaResult<Self> {
        let tl = Timeline::new(video);
        let hand = HandPath::new(&tl);
        Self::evaluate_with(frame, &tl, &hand)
    }

    /// [`CtaFrame::evaluate`] with a precomputed timeline and hand path.
    pub fn evaluate_with(frame: FrameIndex, tl: &Timeline, hand: &HandPath) -> CtaResult<Self> {
        let f = frame.as_f64();
        let (bell_scale, bell_rotation_deg) = bell_motion(f, tl)?;
        Ok(Self {
            frame: frame.0,
            card_offset_y: slide_in(f, tl)? + slide_out(f, tl)?,
            thumb_scale: press_scale(f, tl, &tl.thumb, THUMB_IDLE_SCALE, THUMB_PRESSED_SCALE)?,
            liked: f >= tl.liked_at,
            button_scale: button_scale(f, tl)?,
            subscribed: f >= tl.subscribed_at,
            bell_scale,
            bell_rotation_deg,
            bell_active: f >= tl.bell_active_at,
            hand: hand.state(f, tl),
        })
    }

    /// Button background for this frame.
    pub fn button_color(&self) -> Rgba8Premul {
        if self.subscribed {
            BUTTON_GREY
        } else {
            BUTTON_RED
        }
    }

    /// Button label for this frame.
    pub fn button_label(&self) -> &'static str {
        if self.subscribed {
            "Subscribed"
        } else {
            "Subscribe"
        }
    }
}

fn map_unit(v: f64, from: f64, to: f64) -> CtaResult<f64> {
    interpolate(v, &[0.0, 1.0], &[from, to], InterpolateOpts::default())
}

fn slide_in(f: f64, tl: &Timeline) -> CtaResult<f64> {
    let s = spring(SpringParams::new(f, tl.fps, CARD_SPRING).with_duration(tl.slide_in_frames))?;
    map_unit(s, SLIDE_DISTANCE, 0.0)
}

fn slide_out(f: f64, tl: &Timeline) -> CtaResult<f64> {
    let rel = f - tl.slide_out_start;
    if rel < tl.wind_up_frames {
        return interpolate_clamped(
            rel,
            &[0.0, tl.wind_up_frames],
            &[0.0, WIND_UP_DISTANCE],
            Ease::out_quad(),
        );
    }
    let s = spring(SpringParams::new(rel - tl.wind_up_frames, tl.fps, CARD_SPRING))?;
    map_unit(s, WIND_UP_DISTANCE, SLIDE_DISTANCE)
}

/// Eased press progress in `[0, 1]`.
fn press_progress(f: f64, press: &Press) -> CtaResult<f64> {
    interpolate_clamped(
        f,
        &[press.start, press.start + press.duration],
        &[0.0, 1.0],
        Ease::out_quad(),
    )
}

fn release_spring(f: f64, tl: &Timeline, press: &Press, config: SpringConfig) -> CtaResult<f64> {
    spring(SpringParams::new(f - press.release, tl.fps, config))
}

fn press_scale(f: f64, tl: &Timeline, press: &Press, idle: f64, pressed: f64) -> CtaResult<f64> {
    if f >= press.start && f < press.release {
        map_unit(press_progress(f, press)?, idle, pressed)
    } else if f >= press.release {
        map_unit(release_spring(f, tl, press, CLICK_SPRING)?, pressed, idle)
    } else {
        Ok(idle)
    }
}

fn button_scale(f: f64, tl: &Timeline) -> CtaResult<f64> {
    let raw = press_scale(f, tl, &tl.button, 1.0, BUTTON_PRESSED_SCALE)?;
    if f >= tl.button.release && (raw - 1.0).abs() < BUTTON_SNAP_EPSILON {
        return Ok(1.0);
    }
    Ok(raw)
}

fn bell_motion(f: f64, tl: &Timeline) -> CtaResult<(f64, f64)> {
    let bell = &tl.bell;
    if f >= bell.start && f < bell.release {
        let scale = map_unit(press_progress(f, bell)?, 1.0, BELL_PRESSED_SCALE)?;
        return Ok((scale, 0.0));
    }
    if f < bell.start {
        return Ok((1.0, 0.0));
    }

    let scale = map_unit(
        release_spring(f, tl, bell, BELL_SPRING)?,
        BELL_PRESSED_SCALE,
        1.0,
    )?;
    let swing = f - bell.release;
    let rotation = if swing < tl.bell_swing_frames {
        let t = swing / tl.bell_swing_frames;
        (t * std::f64::consts::PI * 2.0 * BELL_SWING_TURNS).sin() * BELL_SWING_DEGREES * (1.0 - t)
    } else {
        0.0
    };
    Ok((scale, rotation))
}

#[cfg(test)]
#[path = "../../tests/unit/cta/motion.rs"]
mod tests;
