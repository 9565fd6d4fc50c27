use std::collections::HashMap;
use std::sync::Arc;

use vello_cpu::kurbo::Shape as _;

use crate::assets::badge::bake_avatar_badge;
use crate::assets::fonts::FontFace;
use crate::assets::store::{
    AssetKey, AssetStore, PreparedAsset, PreparedImage, TextBrushRgba8, TextLayoutEngine,
    TextStyle,
};
use crate::assets::svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_params};
use crate::effects::blur::{BoxShadow, render_box_shadow};
use crate::effects::filter::FilterChain;
use crate::foundation::core::{Affine, Rect, Rgba8Premul, Size};
use crate::foundation::error::{CtaError, CtaResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::scene::fingerprint::filter_key;
use crate::scene::model::{Node, NodeKind, Scene, TextAlign, TextSpec};

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

#[derive(Clone)]
struct ShadowPaint {
    image: ImagePaint,
    offset_x: f64,
    offset_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct SpriteKey {
    asset: AssetKey,
    w: u32,
    h: u32,
    filter: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct BadgeKey {
    asset: AssetKey,
    px: u32,
    background: Rgba8Premul,
    rect: [u64; 4],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct ShadowKey {
    size: [u64; 2],
    radius: u64,
    blur: u64,
    offset: [u64; 2],
    color: Rgba8Premul,
}

/// CPU raster backend built on `vello_cpu`.
///
/// Decoded sprites (filtered icons, avatar badges, shadows) are cached across frames, so a
/// backend should be reused for a whole render.
pub struct CpuBackend {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,

    sprite_cache: HashMap<SpriteKey, ImagePaint>,
    badge_cache: HashMap<BadgeKey, ImagePaint>,
    shadow_cache: HashMap<ShadowKey, ShadowPaint>,
    font_cache: HashMap<u64, vello_cpu::peniko::FontData>,
    text_engine: TextLayoutEngine,
    warned_missing_fonts: bool,
}

impl CpuBackend {
    /// Create a backend with empty caches.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            sprite_cache: HashMap::new(),
            badge_cache: HashMap::new(),
            shadow_cache: HashMap::new(),
            font_cache: HashMap::new(),
            text_engine: TextLayoutEngine::new(),
            warned_missing_fonts: false,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CtaResult<R>,
    ) -> CtaResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn draw_node(
        &mut self,
        node: &Node,
        parent: Affine,
        assets: &AssetStore,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CtaResult<()> {
        let tr = parent * node.transform;
        let opacity = node.opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }

        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }

        let out = match &node.kind {
            NodeKind::Group { children } => children
                .iter()
                .try_for_each(|c| self.draw_node(c, tr, assets, ctx)),
            NodeKind::Rect { size, radius, fill } => {
                ctx.set_transform(affine_to_cpu(tr));
                ctx.set_paint(color_to_cpu(*fill));
                fill_rounded_rect(ctx, *size, *radius);
                Ok(())
            }
            NodeKind::Image {
                asset,
                size,
                filter,
            } => self.draw_image(*asset, *size, filter, tr, assets, ctx),
            NodeKind::Badge {
                asset,
                diameter,
                background,
                image_rect,
            } => {
                let scale = transform_scale(tr);
                let p = self.badge_paint_for(
                    *asset,
                    *diameter,
                    *background,
                    *image_rect,
                    scale,
                    assets,
                )?;
                let k = *diameter / f64::from(p.w);
                ctx.set_transform(affine_to_cpu(tr * Affine::scale(k)));
                draw_sprite(ctx, &p);
                Ok(())
            }
            NodeKind::Text(spec) => self.draw_text(&node.name, spec, tr, assets, ctx),
            NodeKind::Shadow { size, radius, spec } => {
                let s = self.shadow_paint_for(*size, *radius, spec)?;
                ctx.set_transform(affine_to_cpu(
                    tr * Affine::translate((s.offset_x, s.offset_y)),
                ));
                draw_sprite(ctx, &s.image);
                Ok(())
            }
        };

        if opacity < 1.0 {
            ctx.pop_layer();
        }
        out.map_err(|e| match e {
            CtaError::Evaluation(msg) if !msg.starts_with("node '") => {
                CtaError::evaluation(format!("node '{}': {msg}", node.name))
            }
            other => other,
        })
    }

    fn draw_image(
        &mut self,
        asset: AssetKey,
        size: Size,
        filter: &FilterChain,
        tr: Affine,
        assets: &AssetStore,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CtaResult<()> {
        match assets.get(asset)? {
            PreparedAsset::Svg(svg) => {
                let (w, h, transform_adjust) = svg_raster_params(size, tr)?;
                let key = SpriteKey {
                    asset,
                    w,
                    h,
                    filter: filter_key(filter),
                };
                let p = match self.sprite_cache.get(&key) {
                    Some(p) => p.clone(),
                    None => {
                        tracing::debug!(?asset, w, h, "rasterizing svg sprite");
                        let mut rgba = rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?;
                        filter.apply_premul_in_place(&mut rgba);
                        let p = image_paint(&rgba, w, h)?;
                        self.sprite_cache.insert(key, p.clone());
                        p
                    }
                };
                ctx.set_transform(affine_to_cpu(transform_adjust));
                draw_sprite(ctx, &p);
            }
            PreparedAsset::Image(img) => {
                let key = SpriteKey {
                    asset,
                    w: img.width,
                    h: img.height,
                    filter: filter_key(filter),
                };
                let p = match self.sprite_cache.get(&key) {
                    Some(p) => p.clone(),
                    None => {
                        tracing::debug!(?asset, "preparing raster sprite");
                        let mut rgba = img.rgba8_premul.as_ref().clone();
                        filter.apply_premul_in_place(&mut rgba);
                        let p = image_paint(&rgba, img.width, img.height)?;
                        self.sprite_cache.insert(key, p.clone());
                        p
                    }
                };
                let sx = size.width / f64::from(p.w);
                let sy = size.height / f64::from(p.h);
                ctx.set_transform(affine_to_cpu(tr * Affine::scale_non_uniform(sx, sy)));
                draw_sprite(ctx, &p);
            }
        }
        Ok(())
    }

    fn badge_paint_for(
        &mut self,
        asset: AssetKey,
        diameter: f64,
        background: Rgba8Premul,
        image_rect: Rect,
        scale: f64,
        assets: &AssetStore,
    ) -> CtaResult<ImagePaint> {
        let px = (diameter * scale).ceil().max(1.0) as u32;
        let key = BadgeKey {
            asset,
            px,
            background,
            rect: [
                image_rect.x0.to_bits(),
                image_rect.y0.to_bits(),
                image_rect.x1.to_bits(),
                image_rect.y1.to_bits(),
            ],
        };
        if let Some(p) = self.badge_cache.get(&key) {
            return Ok(p.clone());
        }
        let source = match assets.get(asset)? {
            PreparedAsset::Image(img) => img.clone(),
            PreparedAsset::Svg(svg) => {
                let s = svg.tree.size();
                let (w, h) = (s.width().ceil() as u32, s.height().ceil() as u32);
                PreparedImage {
                    width: w,
                    height: h,
                    rgba8_premul: Arc::new(rasterize_svg_to_premul_rgba8(&svg.tree, w, h)?),
                }
            }
        };
        tracing::debug!(?asset, px, "baking badge sprite");
        let scale = f64::from(px) / diameter;
        let baked = bake_avatar_badge(&source, diameter, background, image_rect, scale)?;
        let p = image_paint(&baked.rgba8_premul, baked.width, baked.height)?;
        self.badge_cache.insert(key, p.clone());
        Ok(p)
    }

    fn shadow_paint_for(
        &mut self,
        size: Size,
        radius: f64,
        spec: &BoxShadow,
    ) -> CtaResult<ShadowPaint> {
        let key = ShadowKey {
            size: [size.width.to_bits(), size.height.to_bits()],
            radius: radius.to_bits(),
            blur: spec.blur.to_bits(),
            offset: [spec.offset_x.to_bits(), spec.offset_y.to_bits()],
            color: spec.color,
        };
        if let Some(s) = self.shadow_cache.get(&key) {
            return Ok(s.clone());
        }
        tracing::debug!(
            w = size.width,
            h = size.height,
            blur = spec.blur,
            "rendering shadow sprite"
        );
        let sprite = render_box_shadow(size.width, size.height, radius, spec)?;
        let s = ShadowPaint {
            image: image_paint(&sprite.rgba8_premul, sprite.width, sprite.height)?,
            offset_x: sprite.offset_x,
            offset_y: sprite.offset_y,
        };
        self.shadow_cache.insert(key, s.clone());
        Ok(s)
    }

    fn font_data_for(&mut self, face: &FontFace) -> vello_cpu::peniko::FontData {
        self.font_cache
            .entry(face.key)
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(face.data.as_ref().clone()),
                    face.index,
                )
            })
            .clone()
    }

    fn draw_text(
        &mut self,
        name: &str,
        spec: &TextSpec,
        tr: Affine,
        assets: &AssetStore,
        ctx: &mut vello_cpu::RenderContext,
    ) -> CtaResult<()> {
        let Some(book) = assets.fonts() else {
            if !self.warned_missing_fonts {
                tracing::warn!(node = name, "no fonts available; skipping text");
                self.warned_missing_fonts = true;
            }
            return Ok(());
        };
        if spec.text.is_empty() {
            return Ok(());
        }

        let face = book.face(spec.weight);
        let [r, g, b, a] = spec.color.to_straight_rgba();
        let style = TextStyle {
            face,
            size_px: spec.font_size,
            weight: spec.weight,
            letter_spacing: spec.letter_spacing,
            brush: TextBrushRgba8 { r, g, b, a },
        };
        let text = if spec.ellipsize {
            self.text_engine
                .ellipsize_to_width(&spec.text, &style, spec.box_size.width as f32)?
        } else {
            spec.text.clone()
        };
        let layout = self.text_engine.layout_line(&text, &style)?;
        let font = self.font_data_for(face);

        let x = match spec.align {
            TextAlign::Start => 0.0,
            TextAlign::Center => (spec.box_size.width - f64::from(layout.width())) / 2.0,
        };
        let y = (spec.box_size.height - f64::from(layout.height())) / 2.0;
        ctx.set_transform(affine_to_cpu(tr * Affine::translate((x, y))));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let mut pen_x = run.offset();
                let baseline = run.baseline();
                let glyphs = run.glyphs().map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: pen_x + g.x,
                        y: baseline - g.y,
                    };
                    pen_x += g.advance;
                    glyph
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    fn render_scene(&mut self, scene: &Scene, assets: &AssetStore) -> CtaResult<FrameRGBA> {
        let width: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| CtaError::evaluation("canvas width exceeds u16"))?;
        let height: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| CtaError::evaluation("canvas height exceeds u16"))?;

        let clear = self.settings.clear_rgba;
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.with_ctx_mut(width, height, |this, ctx| {
            if let Some([r, g, b, a]) = clear {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }
            this.draw_node(&scene.root, Affine::IDENTITY, assets, ctx)?;
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn worker_render_settings(&self) -> Option<RenderSettings> {
        Some(self.settings.clone())
    }
}

fn draw_sprite(ctx: &mut vello_cpu::RenderContext, p: &ImagePaint) {
    ctx.set_paint(p.paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(p.w),
        f64::from(p.h),
    ));
}

fn fill_rounded_rect(ctx: &mut vello_cpu::RenderContext, size: Size, radius: f64) {
    if radius <= 0.0 {
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            size.width,
            size.height,
        ));
        return;
    }
    let rr = vello_cpu::kurbo::RoundedRect::new(0.0, 0.0, size.width, size.height, radius);
    ctx.fill_path(&rr.to_path(0.1));
}

fn transform_scale(tr: Affine) -> f64 {
    let [a, b, c, d, _e, _f] = tr.as_coeffs();
    (a * a + b * b).sqrt().max((c * c + d * d).sqrt()).max(1e-6)
}

fn color_to_cpu(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_straight_rgba();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(bytes_premul: &[u8], width: u32, height: u32) -> CtaResult<ImagePaint> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(ImagePaint {
        paint: vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        },
        w: width,
        h: height,
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> CtaResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CtaError::evaluation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CtaError::evaluation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CtaError::evaluation("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let opaque = pixels.iter().all(|p| p.a == 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, !opaque,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
