use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::{decode_image, parse_svg};
use crate::assets::fonts::{FontBook, FontFace, FontOptions};
use crate::foundation::core::Size;
use crate::foundation::error::{CtaError, CtaResult};
use crate::scene::model::FontWeight;

/// Static files the overlay draws.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AssetKey {
    /// Channel avatar (raster).
    Avatar,
    /// Thumbs-up icon.
    ThumbsUp,
    /// Notification bell icon.
    Bell,
    /// Pointing-hand cursor.
    PointingHand,
}

impl AssetKey {
    /// Every asset, in load order.
    pub const ALL: [AssetKey; 4] = [
        AssetKey::Avatar,
        AssetKey::ThumbsUp,
        AssetKey::Bell,
        AssetKey::PointingHand,
    ];

    /// File name relative to the assets root.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Avatar => "avatar.png",
            Self::ThumbsUp => "thumbs-up.svg",
            Self::Bell => "bell.svg",
            Self::PointingHand => "pointinghand.svg",
        }
    }
}

#[derive(Clone, Debug)]
/// Prepared raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

#[derive(Clone, Debug)]
/// Prepared SVG asset represented as a parsed `usvg` tree.
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

/// Decoded asset.
#[derive(Clone, Debug)]
pub enum PreparedAsset {
    /// Raster image.
    Image(PreparedImage),
    /// Vector image.
    Svg(PreparedSvg),
}

impl PreparedAsset {
    /// Natural size in pixels.
    pub fn intrinsic_size(&self) -> Size {
        match self {
            Self::Image(img) => Size::new(f64::from(img.width), f64::from(img.height)),
            Self::Svg(svg) => {
                let s = svg.tree.size();
                Size::new(f64::from(s.width()), f64::from(s.height()))
            }
        }
    }
}

/// Decoded assets and resolved fonts, shared read-only by every render worker.
#[derive(Clone, Debug)]
pub struct AssetStore {
    root: PathBuf,
    assets: HashMap<AssetKey, PreparedAsset>,
    fonts: Option<FontBook>,
}

impl AssetStore {
    /// Load every [`AssetKey`] from `root` and resolve fonts.
    #[tracing::instrument(skip(fonts), fields(root = %root.as_ref().display()))]
    pub fn load(root: impl AsRef<Path>, fonts: &FontOptions) -> CtaResult<Self> {
        let root = root.as_ref().to_path_buf();
        let mut assets = HashMap::new();
        for key in AssetKey::ALL {
            assets.insert(key, load_asset(&root, key.file_name())?);
        }
        let fonts = FontBook::resolve(fonts)?;
        if fonts.is_none() {
            tracing::warn!("no usable font found; text will not be drawn");
        }
        Ok(Self {
            root,
            assets,
            fonts,
        })
    }

    /// Store with no assets; fill it with [`AssetStore::insert`].
    pub fn empty(fonts: Option<FontBook>) -> Self {
        Self {
            root: PathBuf::new(),
            assets: HashMap::new(),
            fonts,
        }
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, key: AssetKey, asset: PreparedAsset) {
        self.assets.insert(key, asset);
    }

    /// Directory the assets were read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decoded asset for `key`.
    pub fn get(&self, key: AssetKey) -> CtaResult<&PreparedAsset> {
        self.assets
            .get(&key)
            .ok_or_else(|| CtaError::evaluation(format!("asset {key:?} is not loaded")))
    }

    /// Resolved fonts, if any.
    pub fn fonts(&self) -> Option<&FontBook> {
        self.fonts.as_ref()
    }
}

fn load_asset(root: &Path, rel: &str) -> CtaResult<PreparedAsset> {
    let norm = normalize_rel_path(rel)?;
    let path = root.join(Path::new(&norm));
    let bytes = std::fs::read(&path).map_err(|e| {
        CtaError::validation(format!("failed to read asset '{}': {e}", path.display()))
    })?;
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    let decoded = if is_svg {
        parse_svg(&bytes).map(PreparedAsset::Svg)
    } else {
        decode_image(&bytes).map(PreparedAsset::Image)
    };
    decoded.map_err(|e| CtaError::validation(format!("asset '{}': {e:#}", path.display())))
}

/// Normalize and validate asset paths relative to the assets root.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> CtaResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(CtaError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(CtaError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CtaError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CtaError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Styling for one text line.
#[derive(Clone, Copy, Debug)]
pub struct TextStyle<'a> {
    /// Face to shape with.
    pub face: &'a FontFace,
    /// Font size in pixels.
    pub size_px: f32,
    /// Requested weight.
    pub weight: FontWeight,
    /// Extra advance per glyph.
    pub letter_spacing: f32,
    /// Glyph colour.
    pub brush: TextBrushRgba8,
}

const ELLIPSIS: char = '\u{2026}';

/// Stateful helper for building Parley text layouts from raw font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<u64, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> CtaResult<String> {
        if let Some(name) = self.families.get(&face.key) {
            return Ok(name.clone());
        }
        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.data.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CtaError::validation("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CtaError::validation("registered font family has no name"))?
            .to_string();
        self.families.insert(face.key, name.clone());
        Ok(name)
    }

    /// Shape `text` as a single unbroken line.
    pub fn layout_line(
        &mut self,
        text: &str,
        style: &TextStyle<'_>,
    ) -> CtaResult<parley::Layout<TextBrushRgba8>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(CtaError::validation("text size_px must be finite and > 0"));
        }
        let family_name = self.family_for(style.face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(style.weight.value())),
        ));
        builder.push_default(parley::style::StyleProperty::LetterSpacing(
            style.letter_spacing,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(style.brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Width and height of `text` laid out on one line.
    pub fn measure(&mut self, text: &str, style: &TextStyle<'_>) -> CtaResult<(f32, f32)> {
        let layout = self.layout_line(text, style)?;
        Ok((layout.width(), layout.height()))
    }

    /// `text` unchanged if it fits in `max_width`, otherwise the longest prefix followed by an
    /// ellipsis that fits (just the ellipsis if nothing does).
    pub fn ellipsize_to_width(
        &mut self,
        text: &str,
        style: &TextStyle<'_>,
        max_width: f32,
    ) -> CtaResult<String> {
        if self.measure(text, style)?.0 <= max_width {
            return Ok(text.to_owned());
        }

        let boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let candidate = |n: usize| {
            let mut s = text[..boundaries.get(n).copied().unwrap_or(text.len())]
                .trim_end()
                .to_owned();
            s.push(ELLIPSIS);
            s
        };

        // Widths grow monotonically with the prefix length.
        let (mut lo, mut hi) = (0usize, boundaries.len());
        while lo < hi {
            let mid = (lo + hi).div_ceil(2);
            if self.measure(&candidate(mid), style)?.0 <= max_width {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Ok(candidate(lo))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
