use crate::foundation::core::{Affine, Size};
use crate::foundation::error::{CtaError, CtaResult};

const MAX_DIM: u32 = 16_384;

/// Raster size for drawing an SVG at `size` under `transform`.
///
/// Returns `(width, height, transform_adjust)`: rasterize into a `width x height` pixmap and draw
/// it with `transform_adjust`, which maps raster pixels back into node space. Rasterizing at the
/// device scale keeps scaled-up icons crisp.
pub fn svg_raster_params(size: Size, transform: Affine) -> CtaResult<(u32, u32, Affine)> {
    if !(size.width.is_finite() && size.height.is_finite())
        || size.width <= 0.0
        || size.height <= 0.0
    {
        return Err(CtaError::evaluation("svg has invalid width/height"));
    }

    let [a, b, c, d, _e, _f] = transform.as_coeffs();
    let sx = (a * a + b * b).sqrt().max(1e-6);
    let sy = (c * c + d * d).sqrt().max(1e-6);

    let w = (size.width * sx).ceil().max(1.0) as u32;
    let h = (size.height * sy).ceil().max(1.0) as u32;

    if w > MAX_DIM || h > MAX_DIM {
        return Err(CtaError::evaluation(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }

    let inv = Affine::scale_non_uniform(size.width / f64::from(w), size.height / f64::from(h));
    Ok((w, h, transform * inv))
}

/// Render `tree` stretched to `width x height` premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> CtaResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| CtaError::evaluation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
