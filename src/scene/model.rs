use crate::assets::store::AssetKey;
use crate::effects::blur::BoxShadow;
use crate::effects::filter::FilterChain;
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8Premul, Size};
use crate::foundation::error::{CtaError, CtaResult};

/// One frame worth of drawable content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Output size.
    pub canvas: Canvas,
    /// Root node, drawn in canvas space.
    pub root: Node,
}

/// A drawable node with a local transform relative to its parent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Debug name, also used in error messages.
    pub name: String,
    /// Local transform (parent space <- node space).
    pub transform: Affine,
    /// Opacity in `[0, 1]`, multiplied down the tree.
    pub opacity: f32,
    /// What the node draws.
    pub kind: NodeKind,
}

/// Node payload. Geometry is in node space with the origin at the top-left.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    /// Children drawn in order.
    Group {
        /// Child nodes in paint order.
        children: Vec<Node>,
    },
    /// Solid (optionally rounded) rectangle.
    Rect {
        /// Rectangle size.
        size: Size,
        /// Corner radius.
        radius: f64,
        /// Fill colour.
        fill: Rgba8Premul,
    },
    /// Raster or vector asset stretched to `size`.
    Image {
        /// Asset to draw.
        asset: AssetKey,
        /// Destination size.
        size: Size,
        /// CSS filter applied to the asset pixels.
        filter: FilterChain,
    },
    /// Circular badge: a filled circle with an image clipped to it.
    Badge {
        /// Image drawn inside the circle.
        asset: AssetKey,
        /// Circle diameter.
        diameter: f64,
        /// Circle fill behind the image.
        background: Rgba8Premul,
        /// Image placement relative to the badge top-left (object-fit: cover).
        image_rect: Rect,
    },
    /// Single line of text.
    Text(TextSpec),
    /// Blurred box shadow of a rounded rect of `size`.
    Shadow {
        /// Casting box size.
        size: Size,
        /// Casting box corner radius.
        radius: f64,
        /// Shadow parameters.
        spec: BoxShadow,
    },
}

/// Font weight classes the overlay uses.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    /// 400.
    #[default]
    Regular,
    /// 600.
    Semibold,
    /// 700.
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    pub fn value(self) -> u16 {
        match self {
            Self::Regular => 400,
            Self::Semibold => 600,
            Self::Bold => 700,
        }
    }
}

/// Horizontal placement of a text line inside its box.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Flush left.
    #[default]
    Start,
    /// Centred.
    Center,
}

/// Single-line text run placed in a line box.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextSpec {
    /// Text content.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Weight class.
    pub weight: FontWeight,
    /// Fill colour.
    pub color: Rgba8Premul,
    /// Extra advance after every glyph, in pixels.
    pub letter_spacing: f32,
    /// Line box; the text is vertically centred in it.
    pub box_size: Size,
    /// Horizontal placement.
    pub align: TextAlign,
    /// Replace overflowing text with a trailing ellipsis.
    pub ellipsize: bool,
}

impl Node {
    /// Node with identity transform and full opacity.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: Affine::IDENTITY,
            opacity: 1.0,
            kind,
        }
    }

    /// Group node.
    pub fn group(name: impl Into<String>, children: Vec<Node>) -> Self {
        Self::new(name, NodeKind::Group { children })
    }

    /// Replace the local transform.
    pub fn with_transform(mut self, transform: Affine) -> Self {
        self.transform = transform;
        self
    }

    /// Children when this is a group.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Group { children } => children,
            _ => &[],
        }
    }

    /// Depth-first search by name.
    pub fn find(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(name))
    }

    fn validate(&self) -> CtaResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(CtaError::validation(format!(
                "node '{}' opacity must be in [0, 1], got {}",
                self.name, self.opacity
            )));
        }
        if self.transform.as_coeffs().iter().any(|c| !c.is_finite()) {
            return Err(CtaError::validation(format!(
                "node '{}' has a non-finite transform",
                self.name
            )));
        }
        let positive = |s: Size| {
            s.width.is_finite() && s.height.is_finite() && s.width >= 0.0 && s.height >= 0.0
        };
        match &self.kind {
            NodeKind::Group { children } => children.iter().try_for_each(Node::validate),
            NodeKind::Rect { size, .. }
            | NodeKind::Image { size, .. }
            | NodeKind::Shadow { size, .. }
                if !positive(*size) =>
            {
                Err(CtaError::validation(format!(
                    "node '{}' has an invalid size {size:?}",
                    self.name
                )))
            }
            NodeKind::Text(t) if !(t.font_size.is_finite() && t.font_size > 0.0) => {
                Err(CtaError::validation(format!(
                    "node '{}' font size must be > 0",
                    self.name
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Scene {
    /// Check sizes, opacities and transforms of the whole tree.
    pub fn validate(&self) -> CtaResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CtaError::validation("scene canvas must be non-zero"));
        }
        self.root.validate()
    }

    /// Pretty JSON dump of the scene.
    pub fn to_json(&self) -> CtaResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CtaError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
