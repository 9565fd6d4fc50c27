//! CSS `filter` functions applied to RGBA8 pixels.
//!
//! Operations run in sRGB on straight-alpha colour, in order, clamping after each step.

use crate::foundation::error::{CtaError, CtaResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

/// One CSS filter function. Amounts are fractions (`40%` is `0.4`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", content = "amount", rename_all = "snake_case")]
pub enum FilterOp {
    /// `brightness(a)`: multiply.
    Brightness(f32),
    /// `contrast(a)`: scale around mid grey.
    Contrast(f32),
    /// `saturate(a)`.
    Saturate(f32),
    /// `grayscale(a)`.
    Grayscale(f32),
    /// `sepia(a)`.
    Sepia(f32),
    /// `invert(a)`.
    Invert(f32),
    /// `hue-rotate(deg)`.
    HueRotate(f32),
}

type Matrix3 = [[f32; 3]; 3];

impl FilterOp {
    fn apply(self, rgb: [f32; 3]) -> [f32; 3] {
        let out = match self {
            Self::Brightness(a) => rgb.map(|c| c * a),
            Self::Contrast(a) => rgb.map(|c| (c - 0.5) * a + 0.5),
            Self::Invert(a) => rgb.map(|c| a + c * (1.0 - 2.0 * a)),
            Self::Saturate(s) => mul(saturate_matrix(s), rgb),
            Self::Grayscale(a) => mul(grayscale_matrix(1.0 - a.clamp(0.0, 1.0)), rgb),
            Self::Sepia(a) => mul(sepia_matrix(1.0 - a.clamp(0.0, 1.0)), rgb),
            Self::HueRotate(deg) => mul(hue_rotate_matrix(deg), rgb),
        };
        out.map(|c| c.clamp(0.0, 1.0))
    }
}

fn mul(m: Matrix3, v: [f32; 3]) -> [f32; 3] {
    [0, 1, 2].map(|r| m[r][0] * v[0] + m[r][1] * v[1] + m[r][2] * v[2])
}

fn saturate_matrix(s: f32) -> Matrix3 {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn grayscale_matrix(g: f32) -> Matrix3 {
    [
        [0.2126 + 0.7874 * g, 0.7152 - 0.7152 * g, 0.0722 - 0.0722 * g],
        [0.2126 - 0.2126 * g, 0.7152 + 0.2848 * g, 0.0722 - 0.0722 * g],
        [0.2126 - 0.2126 * g, 0.7152 - 0.7152 * g, 0.0722 + 0.9278 * g],
    ]
}

fn sepia_matrix(s: f32) -> Matrix3 {
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn hue_rotate_matrix(deg: f32) -> Matrix3 {
    let (sin, cos) = deg.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

/// Ordered list of filter functions; empty means `none`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterChain(pub Vec<FilterOp>);

impl FilterChain {
    /// No filtering.
    pub fn none() -> Self {
        Self::default()
    }

    /// Return `true` when the chain is empty.
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the CSS text form, e.g. `"brightness(0) invert(40%)"` or `"none"`.
    pub fn parse(css: &str) -> CtaResult<Self> {
        let css = css.trim();
        if css.is_empty() || css == "none" {
            return Ok(Self::none());
        }

        let mut ops = Vec::new();
        let mut rest = css;
        while !rest.is_empty() {
            let open = rest
                .find('(')
                .ok_or_else(|| CtaError::validation(format!("filter '{css}': expected '('")))?;
            let close = rest
                .find(')')
                .ok_or_else(|| CtaError::validation(format!("filter '{css}': expected ')'")))?;
            if close < open {
                return Err(CtaError::validation(format!(
                    "filter '{css}': unbalanced parentheses"
                )));
            }
            let name = rest[..open].trim();
            let arg = rest[open + 1..close].trim();
            ops.push(parse_op(name, arg).map_err(|e| {
                CtaError::validation(format!("filter '{css}': {e}"))
            })?);
            rest = rest[close + 1..].trim_start();
        }
        Ok(Self(ops))
    }

    /// Filter one straight-alpha pixel. Alpha passes through unchanged.
    pub fn apply_straight(&self, px: [u8; 4]) -> [u8; 4] {
        if self.is_none() {
            return px;
        }
        let mut rgb = [px[0], px[1], px[2]].map(|c| f32::from(c) / 255.0);
        for op in &self.0 {
            rgb = op.apply(rgb);
        }
        let [r, g, b] = rgb.map(|c| (c * 255.0).round() as u8);
        [r, g, b, px[3]]
    }

    /// Filter a premultiplied RGBA8 buffer in place.
    pub fn apply_premul_in_place(&self, rgba: &mut [u8]) {
        if self.is_none() {
            return;
        }
        unpremultiply_rgba8_in_place(rgba);
        for px in rgba.chunks_exact_mut(4) {
            if px[3] == 0 {
                continue;
            }
            let out = self.apply_straight([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        }
        premultiply_rgba8_in_place(rgba);
    }
}

fn parse_op(name: &str, arg: &str) -> Result<FilterOp, String> {
    match name {
        "brightness" => Ok(FilterOp::Brightness(parse_amount(arg)?)),
        "contrast" => Ok(FilterOp::Contrast(parse_amount(arg)?)),
        "saturate" => Ok(FilterOp::Saturate(parse_amount(arg)?)),
        "grayscale" => Ok(FilterOp::Grayscale(parse_amount(arg)?)),
        "sepia" => Ok(FilterOp::Sepia(parse_amount(arg)?)),
        "invert" => Ok(FilterOp::Invert(parse_amount(arg)?)),
        "hue-rotate" => Ok(FilterOp::HueRotate(parse_angle(arg)?)),
        other => Err(format!("unsupported filter function '{other}'")),
    }
}

fn parse_number(s: &str) -> Result<f32, String> {
    let v: f32 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number '{s}'"))?;
    if !v.is_finite() {
        return Err(format!("invalid number '{s}'"));
    }
    Ok(v)
}

fn parse_amount(arg: &str) -> Result<f32, String> {
    if arg.is_empty() {
        return Ok(1.0);
    }
    let v = match arg.strip_suffix('%') {
        Some(pct) => parse_number(pct)? / 100.0,
        None => parse_number(arg)?,
    };
    if v < 0.0 {
        return Err(format!("negative amount '{arg}'"));
    }
    Ok(v)
}

fn parse_angle(arg: &str) -> Result<f32, String> {
    if arg.is_empty() {
        return Ok(0.0);
    }
    if let Some(v) = arg.strip_suffix("deg") {
        return parse_number(v);
    }
    if let Some(v) = arg.strip_suffix("grad") {
        return Ok(parse_number(v)? * 0.9);
    }
    if let Some(v) = arg.strip_suffix("rad") {
        return Ok(parse_number(v)?.to_degrees());
    }
    if let Some(v) = arg.strip_suffix("turn") {
        return Ok(parse_number(v)? * 360.0);
    }
    let v = parse_number(arg)?;
    if v == 0.0 {
        return Ok(0.0);
    }
    Err(format!("angle '{arg}' needs a unit"))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/filter.rs"]
mod tests;
