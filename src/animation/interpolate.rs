use crate::animation::ease::Ease;
use crate::foundation::error::{CtaError, CtaResult};

/// Behaviour of [`interpolate`] for inputs outside the input range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolate {
    /// Continue the edge segment linearly (through the easing curve).
    #[default]
    Extend,
    /// Pin the input to the range bound.
    Clamp,
    /// Return the input unchanged.
    Identity,
    /// Fold the input back into the range.
    Wrap,
}

/// Options for [`interpolate`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InterpolateOpts {
    /// Easing applied to the normalized segment progress.
    pub easing: Ease,
    /// Extrapolation below the first input value.
    pub extrapolate_left: Extrapolate,
    /// Extrapolation above the last input value.
    pub extrapolate_right: Extrapolate,
}

impl InterpolateOpts {
    /// Clamp on both sides with the given easing.
    pub fn clamped(easing: Ease) -> Self {
        Self {
            easing,
            extrapolate_left: Extrapolate::Clamp,
            extrapolate_right: Extrapolate::Clamp,
        }
    }
}

/// Map `input` from `input_range` onto `output_range`.
///
/// Both ranges must have the same length (at least two), contain finite values, and
/// `input_range` must be strictly increasing.
pub fn interpolate(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    opts: InterpolateOpts,
) -> CtaResult<f64> {
    if input.is_nan() {
        return Err(CtaError::animation("interpolate input must not be NaN"));
    }
    validate_ranges(input_range, output_range)?;

    let seg = find_segment(input, input_range);
    Ok(interpolate_segment(
        input,
        (input_range[seg], input_range[seg + 1]),
        (output_range[seg], output_range[seg + 1]),
        opts,
    ))
}

/// [`interpolate`] with clamping on both sides.
pub fn interpolate_clamped(
    input: f64,
    input_range: &[f64],
    output_range: &[f64],
    easing: Ease,
) -> CtaResult<f64> {
    interpolate(
        input,
        input_range,
        output_range,
        InterpolateOpts::clamped(easing),
    )
}

fn validate_ranges(input_range: &[f64], output_range: &[f64]) -> CtaResult<()> {
    if input_range.len() != output_range.len() {
        return Err(CtaError::animation(format!(
            "input range ({} values) and output range ({} values) must have the same length",
            input_range.len(),
            output_range.len()
        )));
    }
    if input_range.len() < 2 {
        return Err(CtaError::animation(
            "input and output ranges must contain at least 2 values",
        ));
    }
    if input_range
        .iter()
        .chain(output_range.iter())
        .any(|v| !v.is_finite())
    {
        return Err(CtaError::animation(
            "input and output ranges must only contain finite numbers",
        ));
    }
    if !input_range.windows(2).all(|w| w[0] < w[1]) {
        return Err(CtaError::animation(format!(
            "input range must be strictly monotonically increasing but got {input_range:?}"
        )));
    }
    Ok(())
}

/// Index of the segment `[i, i + 1]` used for `input`: the first segment whose end is
/// `>= input`, or the last segment.
fn find_segment(input: f64, input_range: &[f64]) -> usize {
    let last = input_range.len() - 1;
    let mut i = 1;
    while i < last {
        if input_range[i] >= input {
            break;
        }
        i += 1;
    }
    i - 1
}

fn interpolate_segment(
    input: f64,
    (in_min, in_max): (f64, f64),
    (out_min, out_max): (f64, f64),
    opts: InterpolateOpts,
) -> f64 {
    let mut x = input;

    if x < in_min {
        match opts.extrapolate_left {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = in_min,
            Extrapolate::Wrap => x = wrap(x, in_min, in_max),
            Extrapolate::Extend => {}
        }
    }
    if x > in_max {
        match opts.extrapolate_right {
            Extrapolate::Identity => return x,
            Extrapolate::Clamp => x = in_max,
            Extrapolate::Wrap => x = wrap(x, in_min, in_max),
            Extrapolate::Extend => {}
        }
    }

    if out_min == out_max {
        return out_min;
    }

    let t = (x - in_min) / (in_max - in_min);
    let t = opts.easing.apply(t);
    t * (out_max - out_min) + out_min
}

fn wrap(x: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    (((x - min) % span) + span) % span + min
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
