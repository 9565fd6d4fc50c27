//! Scene construction: turns per-frame motion values into a drawable node tree.

use crate::assets::store::AssetKey;
use crate::composition::model::{Composition, CtaProps, VideoConfig};
use crate::cta::format::subscribers_label;
use crate::cta::hand::{HAND_SIZE, HandPath};
use crate::cta::layout::{CardLayout, NAME_FONT_SIZE, SUBS_FONT_SIZE};
use crate::cta::motion::CtaFrame;
use crate::cta::timeline::Timeline;
use crate::effects::blur::BoxShadow;
use crate::effects::filter::{FilterChain, FilterOp};
use crate::foundation::core::{Affine, FrameIndex, Point, Rect, Rgba8Premul, Size, Vec2};
use crate::foundation::error::{CtaError, CtaResult};
use crate::scene::model::{FontWeight, Node, NodeKind, Scene, TextAlign, TextSpec};

const CARD_RADIUS: f64 = 16.0;
const BUTTON_RADIUS: f64 = 24.0;
const BUTTON_FONT_SIZE: f32 = 21.0;
const BUTTON_LETTER_SPACING: f32 = 0.8;

const AVATAR_BACKGROUND: Rgba8Premul = Rgba8Premul::opaque(0x1e, 0x2f, 0x49);
const NAME_COLOR: Rgba8Premul = Rgba8Premul::opaque(0x0f, 0x0f, 0x0f);
const SUBS_COLOR: Rgba8Premul = Rgba8Premul::opaque(0x60, 0x60, 0x60);
const WHITE: Rgba8Premul = Rgba8Premul::opaque(0xff, 0xff, 0xff);

/// Avatar image edge relative to the circle diameter.
const AVATAR_IMAGE_RATIO: f64 = 1.1;
/// Avatar image shift as a fraction of its own size, from the circle centre.
const AVATAR_IMAGE_SHIFT: Vec2 = Vec2::new(-0.48, -0.42);

/// `0 4px 24px rgba(0,0,0,0.15)`.
pub fn card_shadow() -> BoxShadow {
    BoxShadow {
        offset_x: 0.0,
        offset_y: 4.0,
        blur: 24.0,
        color: Rgba8Premul::from_straight_rgba(0, 0, 0, 38),
    }
}

/// Filter that turns the thumbs-up black once liked.
pub fn liked_filter() -> FilterChain {
    FilterChain(vec![FilterOp::Brightness(0.0)])
}

/// Grey tint of the bell before it is activated.
pub fn inactive_bell_filter() -> FilterChain {
    FilterChain(vec![
        FilterOp::Brightness(0.0),
        FilterOp::Saturate(1.0),
        FilterOp::Invert(0.4),
        FilterOp::Sepia(0.0),
        FilterOp::Saturate(0.0),
        FilterOp::HueRotate(0.0),
        FilterOp::Brightness(0.95),
        FilterOp::Contrast(0.9),
    ])
}

fn scale_about(center: Point, s: f64) -> Affine {
    Affine::translate(center.to_vec2()) * Affine::scale(s) * Affine::translate(-center.to_vec2())
}

fn at(rect: Rect) -> Affine {
    Affine::translate(rect.origin().to_vec2())
}

fn text_node(name: &str, rect: Rect, spec: TextSpec) -> Node {
    Node::new(name, NodeKind::Text(spec)).with_transform(at(rect))
}

/// Build the scene for one frame.
pub fn build_scene(
    motion: &CtaFrame,
    layout: &CardLayout,
    props: &CtaProps,
    comp: &Composition,
) -> Scene {
    let card_size = layout.card.size();
    let mut children = vec![
        Node::new(
            "shadow",
            NodeKind::Shadow {
                size: card_size,
                radius: CARD_RADIUS,
                spec: card_shadow(),
            },
        ),
        Node::new(
            "card",
            NodeKind::Rect {
                size: card_size,
                radius: CARD_RADIUS,
                fill: WHITE,
            },
        ),
        avatar_node(layout),
        text_node(
            "channel_name",
            layout.name_line,
            TextSpec {
                text: props.channel_name.clone(),
                font_size: NAME_FONT_SIZE,
                weight: FontWeight::Bold,
                color: NAME_COLOR,
                letter_spacing: 0.0,
                box_size: layout.name_line.size(),
                align: TextAlign::Start,
                ellipsize: true,
            },
        ),
        text_node(
            "subscribers",
            layout.subs_line,
            TextSpec {
                text: subscribers_label(props.sub_count),
                font_size: SUBS_FONT_SIZE,
                weight: FontWeight::Regular,
                color: SUBS_COLOR,
                letter_spacing: 0.0,
                box_size: layout.subs_line.size(),
                align: TextAlign::Start,
                ellipsize: true,
            },
        ),
        thumb_node(motion, layout),
        button_node(motion, layout),
        bell_node(motion, layout),
    ];

    let hand = motion.hand;
    if hand.visible {
        let center = Point::new(HAND_SIZE / 2.0, HAND_SIZE / 2.0);
        children.push(
            Node::new(
                "hand",
                NodeKind::Image {
                    asset: AssetKey::PointingHand,
                    size: Size::new(HAND_SIZE, HAND_SIZE),
                    filter: FilterChain::none(),
                },
            )
            .with_transform(
                Affine::translate((hand.x, hand.y)) * scale_about(center, hand.scale),
            ),
        );
    }

    let origin = layout.origin + Vec2::new(0.0, motion.card_offset_y);
    Scene {
        canvas: comp.canvas,
        root: Node::group("cta", children).with_transform(Affine::translate(origin.to_vec2())),
    }
}

fn avatar_node(layout: &CardLayout) -> Node {
    let d = layout.avatar.width();
    let edge = d * AVATAR_IMAGE_RATIO;
    let c = d / 2.0;
    let image_rect = Rect::from_origin_size(
        (c + AVATAR_IMAGE_SHIFT.x * edge, c + AVATAR_IMAGE_SHIFT.y * edge),
        (edge, edge),
    );
    Node::new(
        "avatar",
        NodeKind::Badge {
            asset: AssetKey::Avatar,
            diameter: d,
            background: AVATAR_BACKGROUND,
            image_rect,
        },
    )
    .with_transform(at(layout.avatar))
}

fn thumb_node(motion: &CtaFrame, layout: &CardLayout) -> Node {
    let filter = if motion.liked {
        liked_filter()
    } else {
        FilterChain::none()
    };
    let icon = layout.thumb_icon;
    Node::new(
        "thumbs_up",
        NodeKind::Image {
            asset: AssetKey::ThumbsUp,
            size: icon.size(),
            filter,
        },
    )
    .with_transform(scale_about(layout.thumb_box.center(), motion.thumb_scale) * at(icon))
}

fn button_node(motion: &CtaFrame, layout: &CardLayout) -> Node {
    let b = layout.button;
    let pill = Node::new(
        "button_background",
        NodeKind::Rect {
            size: b.size(),
            radius: BUTTON_RADIUS,
            fill: motion.button_color(),
        },
    );
    let label = Node::new(
        "button_label",
        NodeKind::Text(TextSpec {
            text: motion.button_label().to_owned(),
            font_size: BUTTON_FONT_SIZE,
            weight: FontWeight::Semibold,
            color: WHITE,
            letter_spacing: BUTTON_LETTER_SPACING,
            box_size: b.size(),
            align: TextAlign::Center,
            ellipsize: false,
        }),
    );
    Node::group("button", vec![pill, label])
        .with_transform(scale_about(b.center(), motion.button_scale) * at(b))
}

fn bell_node(motion: &CtaFrame, layout: &CardLayout) -> Node {
    let filter = if motion.bell_active {
        FilterChain::none()
    } else {
        inactive_bell_filter()
    };
    let bx = layout.bell_box;
    let pivot = Point::new(bx.x0 + bx.width() / 2.0, bx.y0).to_vec2();
    let pose = Affine::translate(pivot)
        * Affine::scale(motion.bell_scale)
        * Affine::rotate(motion.bell_rotation_deg.to_radians())
        * Affine::translate(-pivot);
    let icon = layout.bell_icon;
    Node::new(
        "bell",
        NodeKind::Image {
            asset: AssetKey::Bell,
            size: icon.size(),
            filter,
        },
    )
    .with_transform(pose * at(icon))
}

/// Everything needed to turn a frame index into a [`Scene`], computed once per render.
#[derive(Clone, Debug)]
pub struct SceneBuilder {
    comp: Composition,
    props: CtaProps,
    video: VideoConfig,
    timeline: Timeline,
    hand: HandPath,
    layout: CardLayout,
}

impl SceneBuilder {
    /// Validate `comp` and precompute the timeline, hand path and card layout.
    pub fn new(comp: &Composition, props: &CtaProps) -> CtaResult<Self> {
        comp.validate()?;
        let video = comp.video_config();
        let timeline = Timeline::new(&video);
        let hand = HandPath::new(&timeline);
        let layout = CardLayout::compute(comp.canvas)?;
        Ok(Self {
            comp: comp.clone(),
            props: props.clone(),
            video,
            timeline,
            hand,
            layout,
        })
    }

    /// Composition being rendered.
    pub fn composition(&self) -> &Composition {
        &self.comp
    }

    /// Props being rendered.
    pub fn props(&self) -> &CtaProps {
        &self.props
    }

    /// Video configuration derived from the composition.
    pub fn video_config(&self) -> &VideoConfig {
        &self.video
    }

    /// Resolved card layout.
    pub fn layout(&self) -> &CardLayout {
        &self.layout
    }

    /// Motion values at `frame`.
    pub fn motion(&self, frame: FrameIndex) -> CtaResult<CtaFrame> {
        if frame.0 >= self.comp.duration.0 {
            return Err(CtaError::validation(format!(
                "frame {} is out of range for a {}-frame composition",
                frame.0, self.comp.duration.0
            )));
        }
        CtaFrame::evaluate_with(frame, &self.timeline, &self.hand)
    }

    /// Scene at `frame`.
    pub fn scene(&self, frame: FrameIndex) -> CtaResult<Scene> {
        let motion = self.motion(frame)?;
        let scene = build_scene(&motion, &self.layout, &self.props, &self.comp);
        scene.validate()?;
        Ok(scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cta/scene.rs"]
mod tests;
