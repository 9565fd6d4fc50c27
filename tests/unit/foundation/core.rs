use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn frame_range_clamp_and_iter() {
    let r = FrameRange::new(FrameIndex(10), FrameIndex(13)).unwrap();
    assert_eq!(r.clamp(FrameIndex(0)), FrameIndex(10));
    assert_eq!(r.clamp(FrameIndex(99)), FrameIndex(12));
    let frames: Vec<u64> = r.iter().map(|f| f.0).collect();
    assert_eq!(frames, vec![10, 11, 12]);
}

#[test]
fn fps_secs_to_frames_keeps_fractions() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames(1.0), 30.0);
    assert_eq!(fps.secs_to_frames(0.15), 0.15 * 30.0);
    assert!(fps.secs_to_frames(0.12).fract() > 0.0);
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn hex_colors_parse() {
    assert_eq!(
        Rgba8Premul::from_hex("#CC0000").unwrap(),
        Rgba8Premul::opaque(0xCC, 0, 0)
    );
    assert_eq!(
        Rgba8Premul::from_hex("#333").unwrap(),
        Rgba8Premul::opaque(0x33, 0x33, 0x33)
    );
    let half = Rgba8Premul::from_hex("#ffffff80").unwrap();
    assert_eq!(half.a, 0x80);
    assert_eq!(half.r, 0x80);
    assert!(Rgba8Premul::from_hex("fff").is_err());
    assert!(Rgba8Premul::from_hex("#ggg").is_err());
    assert!(Rgba8Premul::from_hex("#12345").is_err());
}

#[test]
fn straight_roundtrip_for_opaque_and_transparent() {
    let c = Rgba8Premul::opaque(10, 20, 30);
    assert_eq!(c.to_straight_rgba(), [10, 20, 30, 255]);
    assert_eq!(Rgba8Premul::transparent().to_straight_rgba(), [0, 0, 0, 0]);
}
