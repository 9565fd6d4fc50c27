use crate::foundation::core::Point;

/// Scalar cubic Bézier in Bernstein form.
pub fn cubic_bezier(t: f64, p0: f64, p1: f64, p2: f64, p3: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

/// Point on a cubic Bézier curve, evaluated per axis.
pub fn cubic_bezier_point(t: f64, [p0, p1, p2, p3]: [Point; 4]) -> Point {
    Point::new(
        cubic_bezier(t, p0.x, p1.x, p2.x, p3.x),
        cubic_bezier(t, p0.y, p1.y, p2.y, p3.y),
    )
}

/// Control polygon for a cursor arc from `from` to `to`.
///
/// Both inner control points sit at the midpoint, shifted vertically by `dip` (negative lifts
/// the arc, positive sags it).
pub fn arc_between(from: Point, to: Point, dip: f64) -> [Point; 4] {
    let mid = from.midpoint(to);
    let ctrl = Point::new(mid.x, mid.y + dip);
    [from, ctrl, ctrl, to]
}

#[cfg(test)]
#[path = "../../tests/unit/animation/bezier.rs"]
mod tests;
