use super::*;
use crate::foundation::core::Fps;

fn temp_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("youtube_cta_png_{tag}_{}", std::process::id()))
}

#[test]
fn file_names_are_zero_padded() {
    assert_eq!(PngSequenceSink::file_name(FrameIndex(0)), "frame_00000.png");
    assert_eq!(PngSequenceSink::file_name(FrameIndex(181)), "frame_00181.png");
}

#[test]
fn writes_unpremultiplied_pngs() {
    let dir = temp_dir("write");
    let _ = std::fs::remove_dir_all(&dir);

    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
        fps: Fps { num: 30, den: 1 },
    })
    .unwrap();
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![100, 0, 0, 128, 0, 0, 0, 0],
        premultiplied: true,
    };
    sink.push_frame(FrameIndex(7), &frame).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 1);

    let img = image::open(dir.join("frame_00007.png")).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(0, 0).0, [199, 0, 0, 128]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);

    let _ = std::fs::remove_dir_all(&dir);
}
