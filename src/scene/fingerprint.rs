use xxhash_rust::xxh3::Xxh3;

use crate::effects::blur::BoxShadow;
use crate::effects::filter::{FilterChain, FilterOp};
use crate::foundation::core::{Affine, Rect, Rgba8Premul, Size};
use crate::scene::model::{Node, NodeKind, Scene, TextSpec};

const XXH3_SEED: u64 = 0x8b5ad4a0c7d8e9f1;

/// Stable per-frame fingerprint used by static-frame elision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFingerprint {
    pub(crate) hi: u64,
    pub(crate) lo: u64,
}

/// Fingerprint everything that affects the pixels of `scene`.
///
/// Node names are not hashed; two frames that differ only in naming render identically.
pub fn fingerprint_scene(scene: &Scene) -> FrameFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(scene.canvas.width);
    h.write_u32(scene.canvas.height);
    write_node(&mut h, &scene.root);
    h.finish()
}

/// 64-bit key of a filter chain, for sprite caches.
pub(crate) fn filter_key(filter: &FilterChain) -> u64 {
    let mut h = StableHasher::new();
    write_filter(&mut h, filter);
    h.finish().lo
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f32(&mut self, v: f32) {
        self.write_u32(v.to_bits());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> FrameFingerprint {
        let v = self.inner.digest128();
        FrameFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_node(h: &mut StableHasher, node: &Node) {
    write_affine(h, node.transform);
    h.write_f32(node.opacity);
    match &node.kind {
        NodeKind::Group { children } => {
            h.write_u8(0);
            h.write_u64(children.len() as u64);
            for c in children {
                write_node(h, c);
            }
        }
        NodeKind::Rect { size, radius, fill } => {
            h.write_u8(1);
            write_size(h, *size);
            h.write_f64(*radius);
            write_color(h, *fill);
        }
        NodeKind::Image {
            asset,
            size,
            filter,
        } => {
            h.write_u8(2);
            h.write_u8(*asset as u8);
            write_size(h, *size);
            write_filter(h, filter);
        }
        NodeKind::Badge {
            asset,
            diameter,
            background,
            image_rect,
        } => {
            h.write_u8(3);
            h.write_u8(*asset as u8);
            h.write_f64(*diameter);
            write_color(h, *background);
            write_rect(h, *image_rect);
        }
        NodeKind::Text(t) => {
            h.write_u8(4);
            write_text(h, t);
        }
        NodeKind::Shadow { size, radius, spec } => {
            h.write_u8(5);
            write_size(h, *size);
            h.write_f64(*radius);
            write_shadow(h, spec);
        }
    }
}

fn write_text(h: &mut StableHasher, t: &TextSpec) {
    h.write_str(&t.text);
    h.write_f32(t.font_size);
    h.write_u32(u32::from(t.weight.value()));
    write_color(h, t.color);
    h.write_f32(t.letter_spacing);
    write_size(h, t.box_size);
    h.write_u8(t.align as u8);
    h.write_bool(t.ellipsize);
}

fn write_shadow(h: &mut StableHasher, s: &BoxShadow) {
    h.write_f64(s.offset_x);
    h.write_f64(s.offset_y);
    h.write_f64(s.blur);
    write_color(h, s.color);
}

fn write_filter(h: &mut StableHasher, f: &FilterChain) {
    h.write_u64(f.0.len() as u64);
    for op in &f.0 {
        let (tag, v) = match *op {
            FilterOp::Brightness(v) => (0, v),
            FilterOp::Contrast(v) => (1, v),
            FilterOp::Saturate(v) => (2, v),
            FilterOp::Grayscale(v) => (3, v),
            FilterOp::Sepia(v) => (4, v),
            FilterOp::Invert(v) => (5, v),
            FilterOp::HueRotate(v) => (6, v),
        };
        h.write_u8(tag);
        h.write_f32(v);
    }
}

fn write_affine(h: &mut StableHasher, a: Affine) {
    for c in a.as_coeffs() {
        h.write_f64(c);
    }
}

fn write_size(h: &mut StableHasher, s: Size) {
    h.write_f64(s.width);
    h.write_f64(s.height);
}

fn write_rect(h: &mut StableHasher, r: Rect) {
    h.write_f64(r.x0);
    h.write_f64(r.y0);
    h.write_f64(r.x1);
    h.write_f64(r.y1);
}

fn write_color(h: &mut StableHasher, c: Rgba8Premul) {
    h.write_bytes(&[c.r, c.g, c.b, c.a]);
}

#[cfg(test)]
#[path = "../../tests/unit/scene/fingerprint.rs"]
mod tests;
