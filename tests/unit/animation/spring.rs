use super::*;

const FPS: f64 = 30.0;

fn unit(frame: f64, config: SpringConfig) -> f64 {
    spring(SpringParams::new(frame, FPS, config)).unwrap()
}

#[test]
fn starts_at_rest_and_settles_at_target() {
    let cfg = SpringConfig::default();
    assert_eq!(unit(0.0, cfg), 0.0);
    assert_eq!(unit(-12.0, cfg), 0.0);
    assert!((unit(300.0, cfg) - 1.0).abs() < 1e-3);
}

#[test]
fn fractional_frames_land_between_steps() {
    let cfg = SpringConfig::default();
    let a = spring_calculation(2.0, FPS, &cfg).unwrap().current;
    let b = spring_calculation(2.5, FPS, &cfg).unwrap().current;
    let c = spring_calculation(3.0, FPS, &cfg).unwrap().current;
    assert!(a < b && b < c, "{a} {b} {c}");
}

#[test]
fn default_spring_overshoots_unless_clamped() {
    let cfg = SpringConfig::default();
    let peak = (0..60).map(|f| unit(f64::from(f), cfg)).fold(f64::MIN, f64::max);
    assert!(peak > 1.0, "peak {peak}");

    let clamped = SpringConfig {
        overshoot_clamping: true,
        ..cfg
    };
    for f in 0..60 {
        assert!(unit(f64::from(f), clamped) <= 1.0);
    }
}

#[test]
fn critically_damped_spring_does_not_overshoot() {
    let cfg = SpringConfig::new(20.0, 100.0, 1.0);
    let mut prev = 0.0;
    for f in 0..90 {
        let v = unit(f64::from(f), cfg);
        assert!(v >= prev - 1e-12 && v <= 1.0 + 1e-12, "frame {f}: {v}");
        prev = v;
    }
}

#[test]
fn measured_duration_stays_settled() {
    let cfg = SpringConfig::default();
    let n = measure_spring(FPS, &cfg, DEFAULT_REST_THRESHOLD).unwrap();
    assert!(n > 0);
    for f in n..n + 19 {
        let v = spring_calculation(f as f64, FPS, &cfg).unwrap().current;
        assert!((v - 1.0).abs() < DEFAULT_REST_THRESHOLD, "frame {f}: {v}");
    }
    let before = spring_calculation((n - 1) as f64, FPS, &cfg).unwrap().current;
    assert!((before - 1.0).abs() >= DEFAULT_REST_THRESHOLD);
}

#[test]
fn measure_spring_threshold_edges() {
    let cfg = SpringConfig::default();
    assert_eq!(measure_spring(FPS, &cfg, 1.0).unwrap(), 0);
    let err = measure_spring(FPS, &cfg, 1.5).unwrap_err();
    assert!(matches!(err, CtaError::Animation(_)), "{err}");
    assert!(measure_spring(FPS, &cfg, 0.0).is_err());
    assert!(measure_spring(FPS, &cfg, -0.1).is_err());
}

#[test]
fn duration_stretch_returns_target_past_the_end() {
    let cfg = SpringConfig {
        damping: 16.0,
        stiffness: 150.0,
        mass: 0.8,
        overshoot_clamping: false,
    };
    let p = |frame: f64| SpringParams::new(frame, FPS, cfg).with_duration(18.0);
    assert_eq!(spring(p(19.0)).unwrap(), 1.0);
    assert_eq!(spring(p(0.0)).unwrap(), 0.0);
    assert!((spring(p(18.0)).unwrap() - 1.0).abs() < 0.006);
    assert_eq!(spring(p(40.0).with_range(400.0, 0.0)).unwrap(), 0.0);
}

#[test]
fn range_mapping_and_delay() {
    let cfg = SpringConfig::default();
    let v = spring(SpringParams::new(0.0, FPS, cfg).with_range(400.0, 0.0)).unwrap();
    assert_eq!(v, 400.0);

    let delayed = SpringParams {
        delay: 5.0,
        ..SpringParams::new(5.0, FPS, cfg)
    };
    assert_eq!(spring(delayed).unwrap(), 0.0);
    let later = SpringParams {
        delay: 5.0,
        ..SpringParams::new(8.0, FPS, cfg)
    };
    assert_eq!(spring(later).unwrap(), unit(3.0, cfg));
}

#[test]
fn reverse_plays_backwards_over_the_duration() {
    let cfg = SpringConfig::default();
    let p = |frame: f64| SpringParams {
        reverse: true,
        ..SpringParams::new(frame, FPS, cfg).with_duration(30.0)
    };
    assert_eq!(spring(p(30.0)).unwrap(), 0.0);
    assert!((spring(p(0.0)).unwrap() - 1.0).abs() < 0.006);
}

#[test]
fn invalid_parameters_are_rejected() {
    let bad_damping = SpringConfig::new(0.0, 100.0, 1.0);
    assert!(spring(SpringParams::new(3.0, FPS, bad_damping)).is_err());
    let bad_mass = SpringConfig::new(10.0, 100.0, -1.0);
    assert!(spring(SpringParams::new(3.0, FPS, bad_mass)).is_err());
    assert!(spring(SpringParams::new(3.0, 0.0, SpringConfig::default())).is_err());
    assert!(spring(SpringParams::new(f64::NAN, FPS, SpringConfig::default())).is_err());
    assert!(
        spring(SpringParams::new(3.0, FPS, SpringConfig::default()).with_duration(0.0)).is_err()
    );
}

fn assert_near(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn default_spring_matches_reference_values() {
    let cfg = SpringConfig::default();
    let s = spring_calculation(5.0, FPS, &cfg).unwrap();
    assert_near(s.current, 0.6958917272121958);
    assert_near(s.velocity, 4.977624262194076);
    assert_near(
        spring_calculation(2.5, FPS, &cfg).unwrap().current,
        0.25366068574198597,
    );
}

#[test]
fn natural_durations_match_reference_values() {
    assert_eq!(
        measure_spring(FPS, &SpringConfig::default(), DEFAULT_REST_THRESHOLD).unwrap(),
        28
    );
    let slide = SpringConfig::new(16.0, 150.0, 0.8);
    assert_eq!(measure_spring(FPS, &slide, DEFAULT_REST_THRESHOLD).unwrap(), 16);
}
