use super::*;

fn frame(data: Vec<u8>, premultiplied: bool) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data,
        premultiplied,
    }
}

#[test]
fn pixel_lookup_is_bounds_checked() {
    let f = frame(vec![1, 2, 3, 4, 5, 6, 7, 8], true);
    assert_eq!(f.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn straight_copy_unpremultiplies_only_when_needed() {
    let premul = frame(vec![64, 0, 0, 128, 0, 0, 0, 0], true);
    assert_eq!(premul.to_straight_rgba8(), vec![128, 0, 0, 128, 0, 0, 0, 0]);

    let straight = frame(vec![64, 0, 0, 128, 0, 0, 0, 0], false);
    assert_eq!(straight.to_straight_rgba8(), straight.data);
}

#[test]
fn cpu_backend_is_available() {
    let backend = create_backend(BackendKind::Cpu, &RenderSettings::default()).unwrap();
    assert!(backend.worker_render_settings().is_some());
}
