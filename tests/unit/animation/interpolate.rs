use super::*;

#[test]
fn maps_linearly_inside_range() {
    let v = interpolate(5.0, &[0.0, 10.0], &[0.0, 100.0], InterpolateOpts::default()).unwrap();
    assert_eq!(v, 50.0);
    let v = interpolate(0.25, &[0.0, 1.0], &[400.0, 0.0], InterpolateOpts::default()).unwrap();
    assert_eq!(v, 300.0);
}

#[test]
fn extend_is_the_default() {
    let v = interpolate(1.1, &[0.0, 1.0], &[0.9, 1.1], InterpolateOpts::default()).unwrap();
    assert!((v - 1.12).abs() < 1e-12);
    let v = interpolate(-1.0, &[0.0, 1.0], &[0.0, 10.0], InterpolateOpts::default()).unwrap();
    assert_eq!(v, -10.0);
}

#[test]
fn clamp_pins_both_sides() {
    let v = interpolate_clamped(-5.0, &[0.0, 4.0], &[0.0, -30.0], Ease::OutQuad).unwrap();
    assert_eq!(v, 0.0);
    let v = interpolate_clamped(50.0, &[0.0, 4.0], &[0.0, -30.0], Ease::OutQuad).unwrap();
    assert_eq!(v, -30.0);
    let v = interpolate_clamped(2.0, &[0.0, 4.0], &[0.0, -30.0], Ease::OutQuad).unwrap();
    assert_eq!(v, -22.5);
}

#[test]
fn identity_returns_input_outside_range() {
    let opts = InterpolateOpts {
        extrapolate_left: Extrapolate::Identity,
        extrapolate_right: Extrapolate::Identity,
        ..InterpolateOpts::default()
    };
    assert_eq!(interpolate(-3.0, &[0.0, 1.0], &[5.0, 6.0], opts).unwrap(), -3.0);
    assert_eq!(interpolate(7.0, &[0.0, 1.0], &[5.0, 6.0], opts).unwrap(), 7.0);
}

#[test]
fn wrap_folds_into_range() {
    let opts = InterpolateOpts {
        extrapolate_right: Extrapolate::Wrap,
        ..InterpolateOpts::default()
    };
    let v = interpolate(12.5, &[0.0, 10.0], &[0.0, 1.0], opts).unwrap();
    assert!((v - 0.25).abs() < 1e-12);
}

#[test]
fn multi_segment_ranges_pick_the_right_segment() {
    let input = [0.0, 10.0, 20.0];
    let output = [0.0, 100.0, 0.0];
    let opts = InterpolateOpts::default();
    assert_eq!(interpolate(10.0, &input, &output, opts).unwrap(), 100.0);
    assert_eq!(interpolate(15.0, &input, &output, opts).unwrap(), 50.0);
    assert_eq!(interpolate(25.0, &input, &output, opts).unwrap(), -50.0);
}

#[test]
fn constant_output_segment_short_circuits() {
    let v = interpolate(3.0, &[0.0, 1.0], &[7.0, 7.0], InterpolateOpts::default()).unwrap();
    assert_eq!(v, 7.0);
}

#[test]
fn invalid_ranges_are_rejected() {
    let opts = InterpolateOpts::default();
    assert!(interpolate(0.0, &[0.0], &[1.0], opts).is_err());
    assert!(interpolate(0.0, &[0.0, 1.0], &[1.0], opts).is_err());
    assert!(interpolate(0.0, &[1.0, 1.0], &[0.0, 1.0], opts).is_err());
    assert!(interpolate(0.0, &[1.0, 0.0], &[0.0, 1.0], opts).is_err());
    assert!(interpolate(0.0, &[0.0, f64::INFINITY], &[0.0, 1.0], opts).is_err());
    assert!(interpolate(f64::NAN, &[0.0, 1.0], &[0.0, 1.0], opts).is_err());
}
