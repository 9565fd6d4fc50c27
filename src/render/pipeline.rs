use std::collections::HashMap;

use rayon::prelude::*;

use crate::assets::store::AssetStore;
use crate::composition::model::{Composition, CtaProps};
use crate::cta::scene::SceneBuilder;
use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{CtaError, CtaResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::cpu::CpuBackend;
use crate::scene::fingerprint::{FrameFingerprint, fingerprint_scene};
use crate::scene::model::Scene;

/// Build + render a single frame.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
#[tracing::instrument(skip_all, fields(frame = frame.0))]
pub fn render_frame(
    comp: &Composition,
    props: &CtaProps,
    frame: FrameIndex,
    backend: &mut dyn RenderBackend,
    assets: &AssetStore,
) -> CtaResult<FrameRGBA> {
    let builder = SceneBuilder::new(comp, props)?;
    let scene = builder.scene(frame)?;
    backend.render_scene(&scene, assets)
}

/// How a range of frames is scheduled.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render each chunk on a rayon pool with one backend per worker.
    pub parallel: bool,
    /// Frames per chunk; `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker count; `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Render identical scenes once and reuse the pixels.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
            static_frame_elision: false,
        }
    }
}

/// Frame counters of a finished render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Frames delivered to the sink.
    pub frames_total: u64,
    /// Frames actually rasterized.
    pub frames_rendered: u64,
    /// Frames reused from an identical earlier scene.
    pub frames_elided: u64,
}

impl RenderStats {
    fn add(&mut self, other: RenderStats) {
        self.frames_total += other.frames_total;
        self.frames_rendered += other.frames_rendered;
        self.frames_elided += other.frames_elided;
    }
}

/// Render `range` and stream the frames, in order, into `sink`.
///
/// `sink.begin` runs before the first frame and `sink.end` after the last one; `end` is skipped
/// when rendering fails.
#[tracing::instrument(skip_all, fields(start = range.start.0, end = range.end.0))]
pub fn render_range(
    comp: &Composition,
    props: &CtaProps,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    assets: &AssetStore,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
) -> CtaResult<RenderStats> {
    if range.is_empty() {
        return Err(CtaError::validation("render range must be non-empty"));
    }
    if range.end.0 > comp.duration.0 {
        return Err(CtaError::validation(format!(
            "render range {}..{} exceeds the composition duration of {} frames",
            range.start.0, range.end.0, comp.duration.0
        )));
    }

    let builder = SceneBuilder::new(comp, props)?;
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    let parallel = if threading.parallel {
        let settings = backend.worker_render_settings().ok_or_else(|| {
            CtaError::evaluation("parallel render requires backend worker settings (CpuBackend)")
        })?;
        Some((build_thread_pool(threading.threads)?, settings))
    } else {
        None
    };

    sink.begin(SinkConfig {
        width: comp.canvas.width,
        height: comp.canvas.height,
        fps: comp.fps,
    })?;

    let mut stats = RenderStats::default();
    let mut chunk_start = range.start.0;
    while chunk_start < range.end.0 {
        let chunk_end = (chunk_start + chunk_size).min(range.end.0);
        let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;

        let (frames, chunk_stats) = match &parallel {
            Some((pool, settings)) => {
                render_chunk_parallel_cpu(&builder, chunk, assets, settings, threading, pool)?
            }
            None => render_chunk_sequential(&builder, chunk, backend, assets, threading)?,
        };

        for (idx, frame) in chunk.iter().zip(&frames) {
            sink.push_frame(idx, frame)?;
        }
        stats.add(chunk_stats);
        chunk_start = chunk_end;
    }

    sink.end()?;
    tracing::info!(
        total = stats.frames_total,
        rendered = stats.frames_rendered,
        elided = stats.frames_elided,
        "render finished"
    );
    Ok(stats)
}

/// Render `range` into memory.
pub fn render_frames_with_stats(
    comp: &Composition,
    props: &CtaProps,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    assets: &AssetStore,
    threading: &RenderThreading,
) -> CtaResult<(Vec<FrameRGBA>, RenderStats)> {
    let mut sink = InMemorySink::new();
    let stats = render_range(comp, props, range, backend, assets, &mut sink, threading)?;
    let frames = sink.into_frames().into_iter().map(|(_, f)| f).collect();
    Ok((frames, stats))
}

struct ChunkScenes {
    scenes: Vec<Scene>,
    unique_indices: Vec<usize>,
    frame_to_unique: Vec<usize>,
}

fn build_chunk_scenes(
    builder: &SceneBuilder,
    range: FrameRange,
    elide: bool,
) -> CtaResult<ChunkScenes> {
    let scenes = range
        .iter()
        .map(|f| builder.scene(f))
        .collect::<CtaResult<Vec<_>>>()?;

    let mut unique_indices = Vec::<usize>::with_capacity(scenes.len());
    let mut frame_to_unique = Vec::<usize>::with_capacity(scenes.len());
    if elide {
        let mut first = HashMap::<FrameFingerprint, usize>::new();
        for (idx, scene) in scenes.iter().enumerate() {
            let fp = fingerprint_scene(scene);
            if let Some(existing) = first.get(&fp).copied() {
                frame_to_unique.push(existing);
            } else {
                let slot = unique_indices.len();
                unique_indices.push(idx);
                first.insert(fp, slot);
                frame_to_unique.push(slot);
            }
        }
    } else {
        for idx in 0..scenes.len() {
            frame_to_unique.push(idx);
            unique_indices.push(idx);
        }
    }

    Ok(ChunkScenes {
        scenes,
        unique_indices,
        frame_to_unique,
    })
}

fn expand_unique(
    mut unique_frames: Vec<Option<FrameRGBA>>,
    frame_to_unique: &[usize],
) -> CtaResult<Vec<FrameRGBA>> {
    let mut remaining = vec![0usize; unique_frames.len()];
    for &u in frame_to_unique {
        remaining[u] += 1;
    }

    let mut out = Vec::<FrameRGBA>::with_capacity(frame_to_unique.len());
    for &u in frame_to_unique {
        let frame = if remaining[u] == 1 {
            unique_frames[u].take()
        } else {
            unique_frames[u].clone()
        };
        out.push(frame.ok_or_else(|| {
            CtaError::evaluation("internal error: unique frame missing while expanding chunk")
        })?);
        remaining[u] -= 1;
    }
    Ok(out)
}

fn chunk_stats(chunk: &ChunkScenes) -> RenderStats {
    let total = chunk.scenes.len() as u64;
    let rendered = chunk.unique_indices.len() as u64;
    RenderStats {
        frames_total: total,
        frames_rendered: rendered,
        frames_elided: total.saturating_sub(rendered),
    }
}

fn render_chunk_sequential(
    builder: &SceneBuilder,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
    assets: &AssetStore,
    threading: &RenderThreading,
) -> CtaResult<(Vec<FrameRGBA>, RenderStats)> {
    let chunk = build_chunk_scenes(builder, range, threading.static_frame_elision)?;
    let mut unique = Vec::with_capacity(chunk.unique_indices.len());
    for &idx in &chunk.unique_indices {
        unique.push(Some(backend.render_scene(&chunk.scenes[idx], assets)?));
    }
    let frames = expand_unique(unique, &chunk.frame_to_unique)?;
    Ok((frames, chunk_stats(&chunk)))
}

fn render_chunk_parallel_cpu(
    builder: &SceneBuilder,
    range: FrameRange,
    assets: &AssetStore,
    settings: &RenderSettings,
    threading: &RenderThreading,
    pool: &rayon::ThreadPool,
) -> CtaResult<(Vec<FrameRGBA>, RenderStats)> {
    let chunk = build_chunk_scenes(builder, range, threading.static_frame_elision)?;

    let rendered = pool.install(|| {
        chunk
            .unique_indices
            .par_iter()
            .map_init(
                || CpuBackend::new(settings.clone()),
                |worker, &idx| worker.render_scene(&chunk.scenes[idx], assets),
            )
            .collect::<Vec<_>>()
    });

    let unique = rendered
        .into_iter()
        .map(|r| r.map(Some))
        .collect::<CtaResult<Vec<_>>>()?;
    let frames = expand_unique(unique, &chunk.frame_to_unique)?;
    Ok((frames, chunk_stats(&chunk)))
}

fn build_thread_pool(threads: Option<usize>) -> CtaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CtaError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CtaError::evaluation(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
