use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::foundation::core::{Point, Rect, Rgba8Premul};
use crate::foundation::error::{CtaError, CtaResult};
use crate::foundation::math::mul_div255_u8;

/// Bake a circular badge sprite: `background` disc with `image` drawn object-fit cover into
/// `image_rect` and clipped to the circle.
///
/// `diameter` and `image_rect` are in node units; `scale` is the device pixels per unit.
pub fn bake_avatar_badge(
    image: &PreparedImage,
    diameter: f64,
    background: Rgba8Premul,
    image_rect: Rect,
    scale: f64,
) -> CtaResult<PreparedImage> {
    if !(diameter.is_finite() && diameter > 0.0 && scale.is_finite() && scale > 0.0) {
        return Err(CtaError::validation("badge diameter and scale must be > 0"));
    }
    if image.width == 0 || image.height == 0 {
        return Err(CtaError::validation("badge image is empty"));
    }
    let size = (diameter * scale).ceil() as u32;
    let r = diameter * scale / 2.0;

    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
    let cover = (image_rect.width() / iw).max(image_rect.height() / ih);
    let crop_x = (image_rect.width() - iw * cover) / 2.0;
    let crop_y = (image_rect.height() - ih * cover) / 2.0;

    let mut out = vec![0u8; (size as usize) * (size as usize) * 4];
    for y in 0..size {
        for x in 0..size {
            let dx = f64::from(x) + 0.5 - r;
            let dy = f64::from(y) + 0.5 - r;
            let coverage = (r - dx.hypot(dy) + 0.5).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }

            let u = (f64::from(x) + 0.5) / scale;
            let v = (f64::from(y) + 0.5) / scale;
            let mut px = [background.r, background.g, background.b, background.a];
            if image_rect.contains(Point::new(u, v)) {
                let sx = (u - image_rect.x0 - crop_x) / cover - 0.5;
                let sy = (v - image_rect.y0 - crop_y) / cover - 0.5;
                px = over(sample_bilinear(image, sx, sy), px);
            }

            let cov = (coverage * 255.0).round() as u16;
            let i = ((y * size + x) as usize) * 4;
            for c in 0..4 {
                out[i + c] = mul_div255_u8(u16::from(px[c]), cov);
            }
        }
    }

    Ok(PreparedImage {
        width: size,
        height: size,
        rgba8_premul: Arc::new(out),
    })
}

fn over(src: [u8; 4], dst: [u8; 4]) -> [u8; 4] {
    let inv = 255 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = src[c].saturating_add(mul_div255_u8(u16::from(dst[c]), inv));
    }
    out
}

/// Bilinear sample of premultiplied pixels at pixel-centre coordinates, clamping at the edges.
fn sample_bilinear(image: &PreparedImage, x: f64, y: f64) -> [u8; 4] {
    let max_x = f64::from(image.width - 1);
    let max_y = f64::from(image.height - 1);
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);

    let data = image.rgba8_premul.as_slice();
    let at = |px: f64, py: f64| {
        let i = ((py as usize) * (image.width as usize) + px as usize) * 4;
        [data[i], data[i + 1], data[i + 2], data[i + 3]]
    };
    let (p00, p10, p01, p11) = (at(x0, y0), at(x1, y0), at(x0, y1), at(x1, y1));

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/badge.rs"]
mod tests;
