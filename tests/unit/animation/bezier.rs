use super::*;

#[test]
fn scalar_curve_hits_endpoints() {
    assert_eq!(cubic_bezier(0.0, 3.0, 10.0, -4.0, 7.0), 3.0);
    assert_eq!(cubic_bezier(1.0, 3.0, 10.0, -4.0, 7.0), 7.0);
    assert_eq!(cubic_bezier(0.5, 0.0, 1.0, 1.0, 0.0), 0.75);
}

#[test]
fn arc_control_points_share_the_offset_midpoint() {
    let [a, b, c, d] = arc_between(Point::new(200.0, 350.0), Point::new(350.0, 58.0), -25.0);
    assert_eq!(a, Point::new(200.0, 350.0));
    assert_eq!(b, Point::new(275.0, 179.0));
    assert_eq!(b, c);
    assert_eq!(d, Point::new(350.0, 58.0));
}

#[test]
fn arc_midpoint_is_pulled_towards_the_dip() {
    let arc = arc_between(Point::new(200.0, 350.0), Point::new(350.0, 58.0), -25.0);
    let p = cubic_bezier_point(0.5, arc);
    assert_eq!(p, Point::new(275.0, 185.25));
}
