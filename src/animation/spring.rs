//! Frame-based damped spring, stepped the same way on every call so that renders are
//! reproducible frame by frame.
//!
//! The spring always runs from 0 to 1 starting at rest; [`spring`] maps the result onto
//! `[from, to]` and optionally stretches the time axis to a requested duration.

use crate::animation::interpolate::{InterpolateOpts, interpolate};
use crate::foundation::error::{CtaError, CtaResult};

/// Largest simulated step, in milliseconds.
const MAX_STEP_MS: f64 = 64.0;

/// Frames a settled spring must stay inside the rest threshold.
const SETTLE_FRAMES: u32 = 20;

/// Default distance to the target below which a spring counts as settled.
pub const DEFAULT_REST_THRESHOLD: f64 = 0.005;

/// Physical spring parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpringConfig {
    /// Damping coefficient, must be > 0.
    pub damping: f64,
    /// Mass, must be > 0.
    pub mass: f64,
    /// Stiffness, must be > 0.
    pub stiffness: f64,
    /// Cap the value at the target instead of overshooting.
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
            overshoot_clamping: false,
        }
    }
}

impl SpringConfig {
    /// Spring with the given damping, stiffness and mass; no overshoot clamping.
    pub const fn new(damping: f64, stiffness: f64, mass: f64) -> Self {
        Self {
            damping,
            mass,
            stiffness,
            overshoot_clamping: false,
        }
    }

    fn validate(&self) -> CtaResult<()> {
        if !(self.damping.is_finite() && self.damping > 0.0) {
            return Err(CtaError::animation(format!(
                "spring damping must be a finite number > 0, got {}",
                self.damping
            )));
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(CtaError::animation(format!(
                "spring mass must be a finite number > 0, got {}",
                self.mass
            )));
        }
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(CtaError::animation(format!(
                "spring stiffness must be a finite number > 0, got {}",
                self.stiffness
            )));
        }
        Ok(())
    }
}

/// Simulated spring state after some number of frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringState {
    /// Current position (0 at rest start, 1 at target).
    pub current: f64,
    /// Current velocity in units per second.
    pub velocity: f64,
    last_timestamp_ms: f64,
}

impl SpringState {
    fn at_rest() -> Self {
        Self {
            current: 0.0,
            velocity: 0.0,
            last_timestamp_ms: 0.0,
        }
    }

    fn advance(self, now_ms: f64, config: &SpringConfig) -> Self {
        let to = 1.0;
        let dt_ms = (now_ms - self.last_timestamp_ms).min(MAX_STEP_MS);

        let c = config.damping;
        let m = config.mass;
        let k = config.stiffness;

        let v0 = -self.velocity;
        let x0 = to - self.current;
        let zeta = c / (2.0 * (k * m).sqrt());
        let omega0 = (k / m).sqrt();
        let t = dt_ms / 1000.0;

        let (current, velocity) = if zeta < 1.0 {
            let omega1 = omega0 * (1.0 - zeta * zeta).sqrt();
            let sin1 = (omega1 * t).sin();
            let cos1 = (omega1 * t).cos();
            let envelope = (-zeta * omega0 * t).exp();
            let frag = envelope * (sin1 * ((v0 + zeta * omega0 * x0) / omega1) + x0 * cos1);
            let position = to - frag;
            let velocity = zeta * omega0 * frag
                - envelope * (cos1 * (v0 + zeta * omega0 * x0) - omega1 * x0 * sin1);
            (position, velocity)
        } else {
            let envelope = (-omega0 * t).exp();
            let position = to - envelope * (x0 + (v0 + omega0 * x0) * t);
            let velocity = envelope * (v0 * (t * omega0 - 1.0) + t * x0 * omega0 * omega0);
            (position, velocity)
        };

        Self {
            current,
            velocity,
            last_timestamp_ms: now_ms,
        }
    }
}

/// Simulate the unit spring up to `frame` (fractional frames allowed, negatives clamp to 0).
///
/// The spring is stepped once per whole frame; the last step lands on the fractional part.
pub fn spring_calculation(frame: f64, fps: f64, config: &SpringConfig) -> CtaResult<SpringState> {
    config.validate()?;
    validate_fps(fps)?;
    if frame.is_nan() {
        return Err(CtaError::animation("spring frame must not be NaN"));
    }

    let frame = frame.max(0.0);
    let whole = frame.floor();
    let rest = frame - whole;
    let steps = whole as u64;

    let mut state = SpringState::at_rest();
    for f in 0..=steps {
        let mut pos = f as f64;
        if f == steps {
            pos += rest;
        }
        state = state.advance(pos / fps * 1000.0, config);
    }
    Ok(state)
}

/// Natural duration of a spring in frames: the first frame after which the value stays within
/// `threshold` of the target for a while.
pub fn measure_spring(fps: f64, config: &SpringConfig, threshold: f64) -> CtaResult<u64> {
    config.validate()?;
    validate_fps(fps)?;
    if threshold.is_nan() || threshold < 0.0 {
        return Err(CtaError::animation(format!(
            "spring rest threshold must be >= 0, got {threshold}"
        )));
    }
    if threshold == 0.0 {
        return Err(CtaError::animation(
            "spring rest threshold of 0 never settles",
        ));
    }
    if threshold > 1.0 {
        return Err(CtaError::animation(format!(
            "spring rest threshold must be <= 1, got {threshold}"
        )));
    }
    if threshold == 1.0 {
        return Ok(0);
    }

    // Stepping frame by frame reproduces `spring_calculation(frame)` exactly for whole frames.
    let mut frame: u64 = 0;
    let mut state = SpringState::at_rest().advance(0.0, config);
    let step =
        |frame: u64, state: SpringState| state.advance(frame as f64 / fps * 1000.0, config);

    while (state.current - 1.0).abs() >= threshold {
        frame += 1;
        state = step(frame, state);
    }

    let mut finished = frame;
    let mut i = 0;
    while i < SETTLE_FRAMES {
        frame += 1;
        state = step(frame, state);
        if (state.current - 1.0).abs() >= threshold {
            // A late bounce restarts the settle window.
            i = 0;
            finished = frame + 1;
        }
        i += 1;
    }
    Ok(finished)
}

/// Parameters for [`spring`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringParams {
    /// Frame relative to the spring start (may be fractional or negative).
    pub frame: f64,
    /// Frames per second of the timeline.
    pub fps: f64,
    /// Physical parameters.
    pub config: SpringConfig,
    /// Output at rest.
    pub from: f64,
    /// Output at the target.
    pub to: f64,
    /// Stretch the natural duration to this many frames.
    pub duration_in_frames: Option<f64>,
    /// Frames to wait before starting.
    pub delay: f64,
    /// Play backwards over the duration.
    pub reverse: bool,
    /// Threshold used to measure the natural duration.
    pub rest_threshold: f64,
}

impl SpringParams {
    /// Unit spring at `frame` with the given config.
    pub fn new(frame: f64, fps: f64, config: SpringConfig) -> Self {
        Self {
            frame,
            fps,
            config,
            from: 0.0,
            to: 1.0,
            duration_in_frames: None,
            delay: 0.0,
            reverse: false,
            rest_threshold: DEFAULT_REST_THRESHOLD,
        }
    }

    /// Stretch the spring to `frames`.
    pub fn with_duration(mut self, frames: f64) -> Self {
        self.duration_in_frames = Some(frames);
        self
    }

    /// Map the output onto `[from, to]`.
    pub fn with_range(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }
}

/// Evaluate a spring animation.
pub fn spring(params: SpringParams) -> CtaResult<f64> {
    let SpringParams {
        frame,
        fps,
        config,
        from,
        to,
        duration_in_frames,
        delay,
        reverse,
        rest_threshold,
    } = params;

    if let Some(d) = duration_in_frames
        && !(d.is_finite() && d > 0.0)
    {
        return Err(CtaError::animation(format!(
            "spring duration_in_frames must be a finite number > 0, got {d}"
        )));
    }

    let natural = if reverse || duration_in_frames.is_some() {
        Some(measure_spring(fps, &config, rest_threshold)? as f64)
    } else {
        None
    };

    let reversed = if reverse {
        let span = duration_in_frames.or(natural).unwrap_or(0.0);
        span - frame
    } else {
        frame
    };
    let delayed = if reverse {
        reversed + delay
    } else {
        reversed - delay
    };

    let stretched = match (duration_in_frames, natural) {
        (Some(d), Some(n)) => {
            if delayed > d {
                return Ok(to);
            }
            delayed / (d / n)
        }
        _ => delayed,
    };

    let state = spring_calculation(stretched, fps, &config)?;
    let inner = if config.overshoot_clamping {
        state.current.min(1.0)
    } else {
        state.current
    };

    if from == 0.0 && to == 1.0 {
        return Ok(inner);
    }
    interpolate(inner, &[0.0, 1.0], &[from, to], InterpolateOpts::default())
}

fn validate_fps(fps: f64) -> CtaResult<()> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(CtaError::animation(format!(
            "spring fps must be a finite number > 0, got {fps}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
