use super::*;

fn layout() -> CardLayout {
    CardLayout::compute(Canvas {
        width: 1920,
        height: 1080,
    })
    .unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn card_sits_bottom_centre() {
    let l = layout();
    assert!(close(l.card.width(), 773.0));
    assert!(close(l.card.height(), 185.0));
    assert!(close(l.origin.x, 573.5));
    assert!(close(l.origin.y, 815.0));
}

#[test]
fn row_children_follow_gap_and_margins() {
    let l = layout();
    assert!(close(l.avatar.x0, 24.0));
    assert!(close(l.avatar.width(), 90.0));
    assert!(close(l.info.x0, 24.0 + 116.0));
    assert!(close(l.info.width(), 237.0));
    assert!(close(l.thumb_box.x0, 24.0 + 367.0));
    assert!(close(l.button.x0, 24.0 + 451.0));
    assert!(close(l.bell_box.x0, 24.0 + 655.0));
    assert!(close(l.bell_box.x1, 24.0 + 725.0));
}

#[test]
fn children_are_vertically_centred() {
    let l = layout();
    assert!(close(l.avatar.y0, 20.0 + 27.5));
    assert!(close(l.button.y0, 20.0 + 48.5));
    assert!(close(l.thumb_box.height(), 78.6));
    assert!(close(l.bell_box.height(), 41.2));
}

#[test]
fn text_lines_stack_inside_the_info_column() {
    let l = layout();
    assert!(close(l.name_line.height(), 33.6));
    assert!(close(l.subs_line.height(), 26.0));
    assert!(close(l.subs_line.y0, l.name_line.y1));
    assert!(close(l.name_line.width(), 237.0));
    let mid = (l.name_line.y0 + l.subs_line.y1) / 2.0;
    assert!(close(mid, 92.5));
}

#[test]
fn icons_keep_their_size_and_margins() {
    let l = layout();
    assert!(close(l.thumb_icon.width(), 75.6));
    assert!(close(l.thumb_icon.y0, l.thumb_box.y0 + 3.0));
    assert!(close(l.thumb_icon.x0, l.thumb_box.x0 - 1.8));
    assert!(close(l.bell_icon.width(), 39.2));
    assert!(close(l.bell_icon.x0, l.bell_box.x0 + 15.4));
    assert!(close(l.bell_icon.y0, l.bell_box.y0 + 2.0));
}

#[test]
fn fractional_sizes_are_not_snapped_to_pixels() {
    let l = layout();
    assert!(close(l.thumb_icon.height(), 75.6));
    assert!(close(l.bell_icon.height(), 39.2));
    assert!(close(l.bell_icon.width(), l.bell_icon.height()));
    assert!(close(l.name_line.y0 + l.name_line.height(), l.subs_line.y0));
    assert!(l.avatar.y0.fract() > 0.0);
}
