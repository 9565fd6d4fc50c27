use super::*;
use crate::composition::model::Composition;

fn timeline() -> Timeline {
    Timeline::new(&Composition::youtube_cta().video_config())
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn presses_start_on_whole_seconds() {
    let t = timeline();
    assert_eq!(t.thumb.start, 30.0);
    assert_eq!(t.button.start, 60.0);
    assert_eq!(t.bell.start, 90.0);
    assert!(close(t.thumb.release, 33.6));
    assert!(close(t.button.release, 64.5));
    assert!(close(t.bell.release, 93.6));
}

#[test]
fn state_markers_fall_between_frames() {
    let t = timeline();
    assert!(close(t.liked_at, 38.1));
    assert!(close(t.subscribed_at, 70.5));
    assert!(close(t.bell_active_at, 98.1));
}

#[test]
fn card_and_hand_markers() {
    let t = timeline();
    assert_eq!(t.slide_in_frames, 18.0);
    assert!(close(t.slide_out_start, 163.0));
    assert_eq!(t.wind_up_frames, 4.0);
    assert!(close(t.bell_swing_frames, 24.0));
    assert!(close(t.hand_appear, 12.0));
    assert!(close(t.hand_exit_end, 117.6));
}

#[test]
fn clicking_is_press_inclusive_release_exclusive() {
    let t = timeline();
    assert!(!t.is_clicking(29.0));
    assert!(t.is_clicking(30.0));
    assert!(t.is_clicking(33.0));
    assert!(!t.is_clicking(34.0));
    assert!(t.is_clicking(64.0));
    assert!(!t.is_clicking(65.0));
    assert!(t.is_clicking(93.0));
    assert!(!t.is_clicking(94.0));
}
