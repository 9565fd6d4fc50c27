use super::*;
use crate::assets::fonts::FontOptions;
use crate::foundation::core::Canvas;

fn small_comp() -> Composition {
    Composition {
        canvas: Canvas {
            width: 480,
            height: 270,
        },
        ..Composition::youtube_cta()
    }
}

fn assets() -> AssetStore {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets");
    AssetStore::load(
        root,
        &FontOptions {
            font_file: None,
            system_fonts: false,
        },
    )
    .unwrap()
}

fn range(start: u64, end: u64) -> FrameRange {
    FrameRange::new(FrameIndex(start), FrameIndex(end)).unwrap()
}

#[test]
fn render_frame_rejects_frames_past_the_end() {
    let comp = small_comp();
    let mut backend = CpuBackend::new(RenderSettings::default());
    let err = render_frame(
        &comp,
        &CtaProps::default(),
        FrameIndex(181),
        &mut backend,
        &assets(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("out of range"), "{err}");
}

#[test]
fn range_validation() {
    let comp = small_comp();
    let props = CtaProps::default();
    let store = assets();
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut sink = InMemorySink::new();
    let threading = RenderThreading::default();

    let empty = FrameRange {
        start: FrameIndex(3),
        end: FrameIndex(3),
    };
    assert!(
        render_range(&comp, &props, empty, &mut backend, &store, &mut sink, &threading).is_err()
    );
    assert!(
        render_range(
            &comp,
            &props,
            range(170, 182),
            &mut backend,
            &store,
            &mut sink,
            &threading
        )
        .is_err()
    );
    assert!(sink.config().is_none(), "sink must not be opened on invalid input");
}

#[test]
fn frames_reach_the_sink_in_order_across_chunks() {
    let comp = small_comp();
    let mut backend = CpuBackend::new(RenderSettings::default());
    let mut sink = InMemorySink::new();
    let threading = RenderThreading {
        chunk_size: 3,
        ..RenderThreading::default()
    };
    let stats = render_range(
        &comp,
        &CtaProps::default(),
        range(40, 48),
        &mut backend,
        &assets(),
        &mut sink,
        &threading,
    )
    .unwrap();

    assert!(sink.is_finished());
    let idx: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(idx, (40..48).collect::<Vec<_>>());
    assert_eq!(
        stats,
        RenderStats {
            frames_total: 8,
            frames_rendered: 8,
            frames_elided: 0,
        }
    );
}

#[test]
fn parallel_matches_sequential() {
    let comp = small_comp();
    let props = CtaProps::with_sub_count(1234);
    let store = assets();
    let r = range(85, 95);

    let mut backend = CpuBackend::new(RenderSettings::default());
    let (seq, _) = render_frames_with_stats(
        &comp,
        &props,
        r,
        &mut backend,
        &store,
        &RenderThreading::default(),
    )
    .unwrap();
    let (par, stats) = render_frames_with_stats(
        &comp,
        &props,
        r,
        &mut backend,
        &store,
        &RenderThreading {
            parallel: true,
            chunk_size: 4,
            threads: Some(2),
            static_frame_elision: true,
        },
    )
    .unwrap();

    assert_eq!(seq.len(), par.len());
    for (i, (a, b)) in seq.iter().zip(&par).enumerate() {
        assert!(a.data == b.data, "frame {} differs", 85 + i);
    }
    assert_eq!(stats.frames_total, 10);
    assert_eq!(stats.frames_total, stats.frames_rendered + stats.frames_elided);
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
    assert_eq!(normalized_chunk_size(0), 1);
    assert_eq!(normalized_chunk_size(64), 64);
}

#[test]
fn expand_unique_reuses_frames() {
    let frame = |v: u8| FrameRGBA {
        width: 1,
        height: 1,
        data: vec![v; 4],
        premultiplied: true,
    };
    let out = expand_unique(vec![Some(frame(1)), Some(frame(2))], &[0, 0, 1, 0]).unwrap();
    let firsts: Vec<u8> = out.iter().map(|f| f.data[0]).collect();
    assert_eq!(firsts, [1, 1, 2, 1]);
}

#[test]
fn elision_collapses_identical_scenes() {
    let comp = small_comp();
    let builder = SceneBuilder::new(&comp, &CtaProps::default()).unwrap();
    let chunk = build_chunk_scenes(&builder, range(100, 110), true).unwrap();
    assert_eq!(chunk.frame_to_unique.len(), 10);
    assert!(chunk.unique_indices.len() <= 10);
    for (i, &u) in chunk.frame_to_unique.iter().enumerate() {
        let first = chunk.unique_indices[u];
        assert!(first <= i);
        assert_eq!(
            fingerprint_scene(&chunk.scenes[first]),
            fingerprint_scene(&chunk.scenes[i])
        );
    }

    let plain = build_chunk_scenes(&builder, range(100, 110), false).unwrap();
    assert_eq!(plain.unique_indices, (0..10).collect::<Vec<_>>());
}
