//! Pointing-hand cursor path: holds over each control while it is clicked, arcs between them.

use crate::animation::bezier::{arc_between, cubic_bezier_point};
use crate::animation::ease::Ease;
use crate::cta::timeline::Timeline;
use crate::foundation::core::Point;

/// Rendered hand size in pixels (square).
pub const HAND_SIZE: f64 = 80.0;

/// Scale applied while a control is being pressed.
pub const HAND_CLICK_SCALE: f64 = 0.9;

/// Hand anchor points, relative to the card's padding box.
pub mod targets {
    use crate::foundation::core::Point;

    /// Entry point below the card.
    pub const ENTRY: Point = Point::new(200.0, 350.0);
    /// Over the thumbs-up.
    pub const THUMB: Point = Point::new(350.0, 58.0);
    /// Over the subscribe button.
    pub const SUBSCRIBE: Point = Point::new(550.0, 68.0);
    /// Over the bell.
    pub const BELL: Point = Point::new(635.0, 50.0);
    /// Exit point below and right of the card.
    pub const EXIT: Point = Point::new(800.0, 350.0);
}

/// Travel from `from` to `to` between `start` and `end` along an arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveSegment {
    /// First frame (inclusive).
    pub start: f64,
    /// Last frame (inclusive).
    pub end: f64,
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Vertical offset of the arc control points.
    pub dip: f64,
}

impl MoveSegment {
    fn sample(&self, frame: f64) -> Point {
        let raw = (frame - self.start) / (self.end - self.start);
        let t = Ease::in_out_quad().apply(raw);
        cubic_bezier_point(t, arc_between(self.from, self.to, self.dip))
    }
}

/// Rest at `at` between `start` and `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoldSegment {
    /// First frame (inclusive).
    pub start: f64,
    /// Last frame (inclusive).
    pub end: f64,
    /// Resting point.
    pub at: Point,
}

fn contains(start: f64, end: f64, frame: f64) -> bool {
    frame >= start && frame <= end
}

/// Hand path derived from a [`Timeline`].
#[derive(Clone, Debug, PartialEq)]
pub struct HandPath {
    /// Arcs in timeline order.
    pub moves: [MoveSegment; 4],
    /// Holds in timeline order.
    pub holds: [HoldSegment; 3],
    /// Frame after which the hand is pinned to [`targets::EXIT`].
    pub exit_end: f64,
    appear: f64,
}

/// Hand state at one frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct HandState {
    /// Top-left of the hand image in padding-box coordinates.
    pub x: f64,
    /// Top-left of the hand image in padding-box coordinates.
    pub y: f64,
    /// Scale about the image centre.
    pub scale: f64,
    /// Whether the hand is drawn.
    pub visible: bool,
}

impl HandPath {
    /// Build the path for a timeline.
    pub fn new(tl: &Timeline) -> Self {
        use targets::*;

        let arrive = |press: f64| press - tl.hand_lead;
        let leave = |release: f64| release + tl.hand_linger;

        let moves = [
            MoveSegment {
                start: tl.hand_appear,
                end: arrive(tl.thumb.start),
                from: ENTRY,
                to: THUMB,
                dip: -25.0,
            },
            MoveSegment {
                start: leave(tl.thumb.release),
                end: arrive(tl.button.start),
                from: THUMB,
                to: SUBSCRIBE,
                dip: 25.0,
            },
            MoveSegment {
                start: leave(tl.button.release),
                end: arrive(tl.bell.start),
                from: SUBSCRIBE,
                to: BELL,
                dip: 20.0,
            },
            MoveSegment {
                start: leave(tl.bell.release),
                end: tl.hand_exit_end,
                from: BELL,
                to: EXIT,
                dip: 18.0,
            },
        ];
        let holds = [
            HoldSegment {
                start: arrive(tl.thumb.start),
                end: leave(tl.thumb.release),
                at: THUMB,
            },
            HoldSegment {
                start: arrive(tl.button.start),
                end: leave(tl.button.release),
                at: SUBSCRIBE,
            },
            HoldSegment {
                start: arrive(tl.bell.start),
                end: leave(tl.bell.release),
                at: BELL,
            },
        ];

        Self {
            moves,
            holds,
            exit_end: tl.hand_exit_end,
            appear: tl.hand_appear,
        }
    }

    /// Hand position at `frame`.
    ///
    /// A matching hold sets the position first; a matching move then overrides it, so a frame
    /// on a shared boundary follows the arc.
    pub fn position(&self, frame: f64) -> Point {
        let mut pos = targets::ENTRY;
        if let Some(hold) = self
            .holds
            .iter()
            .find(|h| contains(h.start, h.end, frame))
        {
            pos = hold.at;
        }
        if let Some(mv) = self
            .moves
            .iter()
            .find(|m| contains(m.start, m.end, frame))
        {
            pos = mv.sample(frame);
        }
        if frame > self.exit_end {
            pos = targets::EXIT;
        }
        pos
    }

    /// Full hand state at `frame`.
    pub fn state(&self, frame: f64, tl: &Timeline) -> HandState {
        let p = self.position(frame);
        HandState {
            x: p.x,
            y: p.y,
            scale: if tl.is_clicking(frame) {
                HAND_CLICK_SCALE
            } else {
                1.0
            },
            visible: frame >= self.appear,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cta/hand.rs"]
mod tests;
