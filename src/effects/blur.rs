use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{CtaError, CtaResult};

/// CSS `box-shadow` (outer, no spread).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxShadow {
    /// Horizontal offset in pixels.
    pub offset_x: f64,
    /// Vertical offset in pixels.
    pub offset_y: f64,
    /// CSS blur radius; the Gaussian sigma is half of it.
    pub blur: f64,
    /// Shadow colour.
    pub color: Rgba8Premul,
}

impl BoxShadow {
    /// Gaussian standard deviation for this blur radius.
    pub fn sigma(&self) -> f32 {
        (self.blur / 2.0) as f32
    }
}

/// Premultiplied shadow bitmap positioned relative to the casting box.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowSprite {
    /// Sprite width.
    pub width: u32,
    /// Sprite height.
    pub height: u32,
    /// Premultiplied RGBA8 pixels.
    pub rgba8_premul: Vec<u8>,
    /// Sprite top-left relative to the box top-left.
    pub offset_x: f64,
    /// Sprite top-left relative to the box top-left.
    pub offset_y: f64,
}

/// Render the shadow of a `width x height` box with corner `radius`.
pub fn render_box_shadow(
    width: f64,
    height: f64,
    radius: f64,
    shadow: &BoxShadow,
) -> CtaResult<ShadowSprite> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(CtaError::validation("shadow box must have a positive size"));
    }
    let sigma = shadow.sigma();
    let blur_radius = if sigma > 0.0 {
        (3.0 * sigma).ceil() as u32
    } else {
        0
    };
    let pad = f64::from(blur_radius) + 1.0;

    let sw = (width + 2.0 * pad).ceil() as u32;
    let sh = (height + 2.0 * pad).ceil() as u32;
    let mut mask = vec![0u8; (sw as usize) * (sh as usize) * 4];
    let radius = radius.clamp(0.0, width.min(height) / 2.0);
    let c = shadow.color;
    for y in 0..sh {
        for x in 0..sw {
            let px = f64::from(x) + 0.5 - pad;
            let py = f64::from(y) + 0.5 - pad;
            let d = rounded_rect_distance(px, py, width, height, radius);
            let cov = (0.5 - d).clamp(0.0, 1.0);
            if cov <= 0.0 {
                continue;
            }
            let idx = ((y * sw + x) as usize) * 4;
            let scale = |v: u8| (f64::from(v) * cov).round() as u8;
            mask[idx] = scale(c.r);
            mask[idx + 1] = scale(c.g);
            mask[idx + 2] = scale(c.b);
            mask[idx + 3] = scale(c.a);
        }
    }

    let rgba8_premul = blur_rgba8_premul(&mask, sw, sh, blur_radius, sigma)?;
    Ok(ShadowSprite {
        width: sw,
        height: sh,
        rgba8_premul,
        offset_x: shadow.offset_x - pad,
        offset_y: shadow.offset_y - pad,
    })
}

/// Signed distance from `(x, y)` to a rounded rect at the origin (negative inside).
fn rounded_rect_distance(x: f64, y: f64, w: f64, h: f64, r: f64) -> f64 {
    let hx = w / 2.0;
    let hy = h / 2.0;
    let qx = (x - hx).abs() - (hx - r);
    let qy = (y - hy).abs() - (hy - r);
    let outside = qx.max(0.0).hypot(qy.max(0.0));
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// Separable Gaussian blur of a premultiplied RGBA8 buffer, clamping at the edges.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    radius: u32,
    sigma: f32,
) -> CtaResult<Vec<u8>> {
    if src.len() != (width as usize) * (height as usize) * 4 {
        return Err(CtaError::validation("blur input size mismatch"));
    }
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; src.len()];
    let mut dst = vec![0u8; src.len()];
    if kernel.len() == 1 {
        dst.copy_from_slice(src);
        return Ok(dst);
    }
    horizontal_blur_q16(src, &mut tmp, width, height, &kernel);
    vertical_blur_q16(&tmp, &mut dst, width, height, &kernel);
    Ok(dst)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CtaResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CtaError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Push rounding drift into the centre tap so the kernel sums to exactly 1.0.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
