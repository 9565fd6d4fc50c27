//! Static card layout, computed once with `taffy`.
//!
//! The card is a flex row in CSS content-box sizing. Rects are reported in card padding-box
//! coordinates (the card has no border, so that is also its border box); `origin` places the
//! card on the canvas before the per-frame vertical offset.

use taffy::TaffyTree;
use taffy::prelude::{AvailableSpace, NodeId, Size};
use taffy::style::{
    AlignItems, BoxSizing, Dimension, Display, FlexDirection, JustifyContent, LengthPercentage,
    LengthPercentageAuto, Style,
};

use crate::foundation::core::{Canvas, Point, Rect};
use crate::foundation::error::{CtaError, CtaResult};

/// Card content width.
pub const CARD_WIDTH: f32 = 725.0;
/// Card content height.
pub const CARD_HEIGHT: f32 = 145.0;
const PAD_X: f32 = 24.0;
const PAD_Y: f32 = 20.0;
const GAP: f32 = 14.0;
const BOTTOM_MARGIN: f64 = 80.0;

/// Avatar diameter.
pub const AVATAR_SIZE: f32 = 90.0;
const AVATAR_MARGIN_RIGHT: f32 = 12.0;

const ICON_SIZE: f32 = 28.0;
const ICON_BOX_WIDTH: f32 = ICON_SIZE * 2.5;
const THUMB_ICON_SIZE: f32 = ICON_SIZE * 2.7;
const BELL_ICON_SIZE: f32 = ICON_SIZE * 1.4;

/// Subscribe button width.
pub const BUTTON_WIDTH: f32 = 190.0;
/// Subscribe button height.
pub const BUTTON_HEIGHT: f32 = 48.0;

/// Channel name font size.
pub const NAME_FONT_SIZE: f32 = 28.0;
/// Subscriber line font size.
pub const SUBS_FONT_SIZE: f32 = 20.0;
const NAME_LINE_HEIGHT: f32 = NAME_FONT_SIZE * 1.2;
const SUBS_LINE_HEIGHT: f32 = SUBS_FONT_SIZE * 1.3;

/// Resolved card geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CardLayout {
    /// Card top-left on the canvas, before the slide offset.
    pub origin: Point,
    /// Outer card size (content plus padding).
    pub card: Rect,
    /// Avatar circle bounds.
    pub avatar: Rect,
    /// Channel info column.
    pub info: Rect,
    /// Channel name line box.
    pub name_line: Rect,
    /// Subscriber count line box.
    pub subs_line: Rect,
    /// Thumbs-up box; scaling happens about its centre.
    pub thumb_box: Rect,
    /// Thumbs-up image.
    pub thumb_icon: Rect,
    /// Subscribe button.
    pub button: Rect,
    /// Bell box; scale and rotation happen about its top centre.
    pub bell_box: Rect,
    /// Bell image.
    pub bell_icon: Rect,
}

struct Nodes {
    card: NodeId,
    avatar: NodeId,
    info: NodeId,
    name: NodeId,
    subs: NodeId,
    thumb_box: NodeId,
    thumb_icon: NodeId,
    button: NodeId,
    bell_box: NodeId,
    bell_icon: NodeId,
}

fn fixed(w: f32, h: f32) -> Size<Dimension> {
    Size {
        width: Dimension::length(w),
        height: Dimension::length(h),
    }
}

fn margin(
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
) -> taffy::geometry::Rect<LengthPercentageAuto> {
    taffy::geometry::Rect {
        left: LengthPercentageAuto::length(left),
        right: LengthPercentageAuto::length(right),
        top: LengthPercentageAuto::length(top),
        bottom: LengthPercentageAuto::length(bottom),
    }
}

fn centered_box(width: f32) -> Style {
    Style {
        display: Display::Flex,
        size: Size {
            width: Dimension::length(width),
            height: Dimension::auto(),
        },
        flex_shrink: 0.0,
        align_items: Some(AlignItems::Center),
        justify_content: Some(JustifyContent::Center),
        ..Default::default()
    }
}

fn icon(size: f32, top: f32, left: f32) -> Style {
    Style {
        size: fixed(size, size),
        margin: margin(top, 0.0, 0.0, left),
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn build(tree: &mut TaffyTree<()>) -> Result<Nodes, taffy::TaffyError> {
    let avatar = tree.new_leaf(Style {
        size: fixed(AVATAR_SIZE, AVATAR_SIZE),
        margin: margin(0.0, AVATAR_MARGIN_RIGHT, 0.0, 0.0),
        flex_shrink: 0.0,
        ..Default::default()
    })?;

    let line = |h: f32| Style {
        size: Size {
            width: Dimension::auto(),
            height: Dimension::length(h),
        },
        ..Default::default()
    };
    let name = tree.new_leaf(line(NAME_LINE_HEIGHT))?;
    let subs = tree.new_leaf(line(SUBS_LINE_HEIGHT))?;
    let info = tree.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            justify_content: Some(JustifyContent::Center),
            flex_grow: 1.0,
            flex_shrink: 1.0,
            flex_basis: Dimension::length(0.0),
            min_size: Size {
                width: Dimension::length(0.0),
                height: Dimension::auto(),
            },
            ..Default::default()
        },
        &[name, subs],
    )?;

    let thumb_icon = tree.new_leaf(icon(THUMB_ICON_SIZE, 3.0, 2.0))?;
    let thumb_box = tree.new_with_children(centered_box(ICON_BOX_WIDTH), &[thumb_icon])?;

    let button = tree.new_leaf(Style {
        size: fixed(BUTTON_WIDTH, BUTTON_HEIGHT),
        flex_shrink: 0.0,
        ..Default::default()
    })?;

    let bell_icon = tree.new_leaf(icon(BELL_ICON_SIZE, 2.0, 0.0))?;
    let bell_box = tree.new_with_children(centered_box(ICON_BOX_WIDTH), &[bell_icon])?;

    let card = tree.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            box_sizing: BoxSizing::ContentBox,
            align_items: Some(AlignItems::Center),
            size: fixed(CARD_WIDTH, CARD_HEIGHT),
            padding: taffy::geometry::Rect {
                left: LengthPercentage::length(PAD_X),
                right: LengthPercentage::length(PAD_X),
                top: LengthPercentage::length(PAD_Y),
                bottom: LengthPercentage::length(PAD_Y),
            },
            gap: Size {
                width: LengthPercentage::length(GAP),
                height: LengthPercentage::length(0.0),
            },
            ..Default::default()
        },
        &[avatar, info, thumb_box, button, bell_box],
    )?;

    Ok(Nodes {
        card,
        avatar,
        info,
        name,
        subs,
        thumb_box,
        thumb_icon,
        button,
        bell_box,
        bell_icon,
    })
}

impl CardLayout {
    /// Lay the card out and place it bottom-centre on `canvas`.
    pub fn compute(canvas: Canvas) -> CtaResult<Self> {
        let err = |e: taffy::TaffyError| CtaError::evaluation(format!("card layout failed: {e}"));

        let mut tree = TaffyTree::<()>::new();
        // CSS layout keeps fractional pixels; the icon boxes depend on it.
        tree.disable_rounding();
        let n = build(&mut tree).map_err(err)?;
        tree.compute_layout(
            n.card,
            Size {
                width: AvailableSpace::Definite(canvas.width as f32),
                height: AvailableSpace::Definite(canvas.height as f32),
            },
        )
        .map_err(err)?;

        let rect_in = |node: NodeId, parent: Option<Rect>| -> CtaResult<Rect> {
            let l = tree.layout(node).map_err(err)?;
            let (ox, oy) = parent.map_or((0.0, 0.0), |p| (p.x0, p.y0));
            let x0 = ox + f64::from(l.location.x);
            let y0 = oy + f64::from(l.location.y);
            Ok(Rect::new(
                x0,
                y0,
                x0 + f64::from(l.size.width),
                y0 + f64::from(l.size.height),
            ))
        };

        let card = rect_in(n.card, None)?;
        let card = Rect::new(0.0, 0.0, card.width(), card.height());
        let info = rect_in(n.info, Some(card))?;
        let thumb_box = rect_in(n.thumb_box, Some(card))?;
        let bell_box = rect_in(n.bell_box, Some(card))?;

        let origin = Point::new(
            (f64::from(canvas.width) - card.width()) / 2.0,
            f64::from(canvas.height) - BOTTOM_MARGIN - card.height(),
        );

        Ok(Self {
            origin,
            card,
            avatar: rect_in(n.avatar, Some(card))?,
            info,
            name_line: rect_in(n.name, Some(info))?,
            subs_line: rect_in(n.subs, Some(info))?,
            thumb_box,
            thumb_icon: rect_in(n.thumb_icon, Some(thumb_box))?,
            button: rect_in(n.button, Some(card))?,
            bell_box,
            bell_icon: rect_in(n.bell_icon, Some(bell_box))?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cta/layout.rs"]
mod tests;
