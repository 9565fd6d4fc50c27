use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn endpoints_are_fixed() {
    for ease in [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::CubicBezier {
            x1: 0.25,
            y1: 0.1,
            x2: 0.25,
            y2: 1.0,
        },
    ] {
        assert!(close(ease.apply(0.0), 0.0), "{ease:?} at 0");
        assert!(close(ease.apply(1.0), 1.0), "{ease:?} at 1");
    }
}

#[test]
fn out_quad_matches_reflected_quad() {
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        let quad = |x: f64| x * x;
        assert!(close(Ease::out_quad().apply(t), 1.0 - quad(1.0 - t)));
    }
}

#[test]
fn in_out_quad_is_symmetric() {
    assert!(close(Ease::in_out_quad().apply(0.5), 0.5));
    assert!(close(Ease::InOutQuad.apply(0.25), 0.125));
    assert!(close(Ease::InOutQuad.apply(0.75), 0.875));
}

#[test]
fn polynomial_curves_extend_past_unit_range() {
    assert!(close(Ease::InQuad.apply(2.0), 4.0));
    assert!(close(Ease::OutQuad.apply(-1.0), -3.0));
}

#[test]
fn css_ease_is_monotonic() {
    let ease = Ease::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };
    let mut prev = 0.0;
    for i in 1..=20 {
        let v = ease.apply(f64::from(i) / 20.0);
        assert!(v >= prev - 1e-9);
        prev = v;
    }
    assert!(close(ease.apply(0.5), 0.5));
}

#[test]
fn ease_deserializes_from_snake_case() {
    let v: Ease = serde_json::from_str("\"in_out_quad\"").unwrap();
    assert_eq!(v, Ease::InOutQuad);
}
