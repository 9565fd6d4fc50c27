//! Animated "subscribe" call-to-action overlay for YouTube videos.
//!
//! A white channel card slides up, a hand cursor likes the video, subscribes and rings the
//! bell, then the card drops out again. Everything is a pure function of the frame index:
//!
//! - Resolve [`CtaProps`] (optionally through [`Composition::calculate_metadata`])
//! - Build a [`Scene`] per frame with [`SceneBuilder`]
//! - Rasterize with [`CpuBackend`] and stream the frames into a [`FrameSink`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod animation;
pub(crate) mod composition;
pub(crate) mod config;
pub(crate) mod cta;
pub(crate) mod effects;
pub(crate) mod encode;
pub(crate) mod metadata;
pub(crate) mod render;
pub(crate) mod scene;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Size, Vec2,
};
pub use crate::foundation::error::{CtaError, CtaResult};

pub use crate::animation::bezier::{arc_between, cubic_bezier, cubic_bezier_point};
pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{
    Extrapolate, InterpolateOpts, interpolate, interpolate_clamped,
};
pub use crate::animation::spring::{
    DEFAULT_REST_THRESHOLD, SpringConfig, SpringParams, SpringState, measure_spring, spring,
    spring_calculation,
};

pub use crate::assets::fonts::{FontBook, FontFace, FontOptions};
pub use crate::assets::store::{AssetKey, AssetStore, PreparedAsset, PreparedImage, PreparedSvg};
pub use crate::composition::model::{
    CHANNEL_NAME, COMPOSITION_ID, Composition, CtaProps, VideoConfig,
};
pub use crate::config::{YoutubeConfig, load_dotenv};
pub use crate::cta::format::{format_sub_count, subscribers_label};
pub use crate::cta::hand::{HandPath, HandState};
pub use crate::cta::layout::CardLayout;
pub use crate::cta::motion::CtaFrame;
pub use crate::cta::scene::{SceneBuilder, build_scene};
pub use crate::cta::timeline::{Press, Timeline};
pub use crate::effects::blur::BoxShadow;
pub use crate::effects::filter::{FilterChain, FilterOp};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, VideoCodec, is_ffmpeg_on_path};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::metadata::youtube::{
    StaticSubscriberCount, SubscriberSource, YoutubeClient, parse_subscriber_count,
};
pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{
    RenderStats, RenderThreading, render_frame, render_frames_with_stats, render_range,
};
pub use crate::scene::fingerprint::{FrameFingerprint, fingerprint_scene};
pub use crate::scene::model::{FontWeight, Node, NodeKind, Scene, TextAlign, TextSpec};
