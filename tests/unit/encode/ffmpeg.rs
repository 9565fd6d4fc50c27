use super::*;
use crate::foundation::core::Fps;

fn cfg(width: u32, height: u32) -> SinkConfig {
    SinkConfig {
        width,
        height,
        fps: Fps { num: 30, den: 1 },
    }
}

#[test]
fn flatten_premul_over_black_produces_expected_rgb() {
    let src = vec![128u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128u8, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_black_produces_expected_rgb() {
    let src = vec![255u8, 0, 0, 128];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, false, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128u8, 0, 0, 255]);
}

#[test]
fn flatten_transparent_returns_background() {
    let src = vec![0u8, 0, 0, 0];
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &src, true, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10u8, 20, 30, 255]);
}

#[test]
fn codec_arguments() {
    assert!(VideoCodec::H264.encoder_args().contains(&"yuv420p"));
    assert!(VideoCodec::H264.encoder_args().contains(&"+faststart"));
    assert!(VideoCodec::ProRes4444.encoder_args().contains(&"yuva444p10le"));
    assert_eq!(VideoCodec::ProRes4444.extension(), "mov");
}

#[test]
fn command_line_uses_rational_rate_and_overwrite_flag() {
    let mut opts = FfmpegSinkOpts::new("out/cta.mp4");
    opts.overwrite = false;
    let sink = FfmpegSink::new(opts);
    let cmd = sink.command(&SinkConfig {
        fps: Fps { num: 30000, den: 1001 },
        ..cfg(1920, 1080)
    });
    let args: Vec<String> = cmd
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    assert_eq!(args[0], "-n");
    assert!(args.windows(2).any(|w| w[0] == "-r" && w[1] == "30000/1001"));
    assert!(args.windows(2).any(|w| w[0] == "-s" && w[1] == "1920x1080"));
    assert_eq!(args.last().map(String::as_str), Some("out/cta.mp4"));
}

#[test]
fn odd_dimensions_are_rejected_before_spawning() {
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(
        std::env::temp_dir().join("youtube_cta_odd.mp4"),
    ));
    let err = sink.begin(cfg(11, 10)).unwrap_err();
    assert!(err.to_string().contains("even"), "{err}");
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let path = std::env::temp_dir().join(format!("youtube_cta_exists_{}.mp4", std::process::id()));
    std::fs::write(&path, b"x").unwrap();
    let mut opts = FfmpegSinkOpts::new(&path);
    opts.overwrite = false;
    let err = FfmpegSink::new(opts).begin(cfg(2, 2)).unwrap_err();
    assert!(err.to_string().contains("already exists"), "{err}");
    let _ = std::fs::remove_file(&path);
}
