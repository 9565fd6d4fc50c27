use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sha2::Digest as _;

use youtube_cta::{
    AssetStore, Composition, CtaFrame, CtaProps, FfmpegSink, FfmpegSinkOpts, FontOptions,
    FrameIndex, FrameRange, FrameSink, PngSequenceSink, RenderSettings, RenderThreading,
    SceneBuilder, StaticSubscriberCount, SubscriberSource, VideoCodec, YoutubeClient,
    YoutubeConfig,
};

#[derive(Parser, Debug)]
#[command(name = "youtube-cta", version, about = "Render the YouTube subscribe overlay")]
struct Cli {
    #[command(flatten)]
    shared: SharedArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct SharedArgs {
    /// Directory holding avatar.png, thumbs-up.svg, bell.svg and pointinghand.svg.
    #[arg(long, global = true, default_value = "assets")]
    assets: PathBuf,

    /// Font file used for every text weight (defaults to a system sans-serif).
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    /// Use this subscriber count instead of asking the YouTube API.
    #[arg(long, global = true)]
    sub_count: Option<u64>,

    /// Channel name shown on the card.
    #[arg(long, global = true)]
    channel_name: Option<String>,

    /// YouTube Data API key.
    #[arg(long, global = true, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Channel whose subscriber count is shown.
    #[arg(long, global = true, env = "YOUTUBE_CHANNEL_ID")]
    channel_id: Option<String>,

    /// Print the resolved fonts (family, weight, SHA-256 of the font bytes).
    #[arg(long, global = true)]
    dump_fonts: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the live subscriber count.
    Fetch,
    /// Print motion values as JSON lines.
    Params(ParamsArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the overlay as a video (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ParamsArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: Option<u64>,

    /// Every frame of the composition.
    #[arg(long)]
    all: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Also write the frame's scene graph as JSON.
    #[arg(long)]
    scene_json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output video path.
    #[arg(long, required_unless_present = "png_dir", conflicts_with = "png_dir")]
    out: Option<PathBuf>,

    /// Write `frame_00000.png`... into this directory instead of a video.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Video codec.
    #[arg(long, value_enum, default_value_t = CodecChoice::H264)]
    codec: CodecChoice,

    /// Overwrite the output if it already exists.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    overwrite: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Render identical frames once.
    #[arg(long, default_value_t = false)]
    static_frame_elision: bool,

    /// First frame (inclusive).
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Last frame (exclusive); defaults to the composition duration.
    #[arg(long)]
    end: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CodecChoice {
    /// H.264 MP4 over black.
    H264,
    /// ProRes 4444 with alpha.
    Prores,
}

impl From<CodecChoice> for VideoCodec {
    fn from(c: CodecChoice) -> Self {
        match c {
            CodecChoice::H264 => VideoCodec::H264,
            CodecChoice::Prores => VideoCodec::ProRes4444,
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    // `.env` must be loaded before clap reads the `env` fallbacks.
    youtube_cta::load_dotenv();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Fetch => cmd_fetch(&cli.shared),
        Command::Params(args) => cmd_params(&cli.shared, args),
        Command::Frame(args) => cmd_frame(&cli.shared, args),
        Command::Render(args) => cmd_render(&cli.shared, args),
    }
}

fn youtube_client(shared: &SharedArgs) -> anyhow::Result<YoutubeClient> {
    let config = YoutubeConfig::from_values(shared.api_key.clone(), shared.channel_id.clone())?;
    Ok(YoutubeClient::new(config)?)
}

fn resolve_props(shared: &SharedArgs, comp: &Composition) -> anyhow::Result<CtaProps> {
    let source: Box<dyn SubscriberSource> = match shared.sub_count {
        Some(n) => Box::new(StaticSubscriberCount(n)),
        None => Box::new(youtube_client(shared)?),
    };
    let mut props = comp
        .calculate_metadata(source.as_ref())
        .context("resolve subscriber count")?;
    if let Some(name) = &shared.channel_name {
        props.channel_name = name.clone();
    }
    Ok(props)
}

fn font_options(shared: &SharedArgs) -> FontOptions {
    match &shared.font {
        Some(path) => FontOptions::file(path),
        None => FontOptions::system(),
    }
}

fn load_assets(shared: &SharedArgs) -> anyhow::Result<AssetStore> {
    let assets = AssetStore::load(&shared.assets, &font_options(shared))
        .with_context(|| format!("load assets from '{}'", shared.assets.display()))?;
    if shared.dump_fonts {
        dump_font_diagnostics(&assets);
    }
    Ok(assets)
}

fn cmd_fetch(shared: &SharedArgs) -> anyhow::Result<()> {
    let client = youtube_client(shared)?;
    let count = client.subscriber_count()?;
    println!("{count}");
    eprintln!("{}", youtube_cta::subscribers_label(count));
    Ok(())
}

fn cmd_params(shared: &SharedArgs, args: ParamsArgs) -> anyhow::Result<()> {
    let comp = Composition::youtube_cta();
    let props = CtaProps {
        channel_name: shared
            .channel_name
            .clone()
            .unwrap_or_else(|| comp.default_props.channel_name.clone()),
        sub_count: shared.sub_count.unwrap_or(comp.default_props.sub_count),
    };
    let builder = SceneBuilder::new(&comp, &props)?;

    let frames: Vec<FrameIndex> = match args.frame {
        Some(f) => vec![FrameIndex(f)],
        None => comp.frame_range().iter().collect(),
    };
    for f in frames {
        let motion: CtaFrame = builder.motion(f)?;
        println!("{}", serde_json::to_string(&motion)?);
    }
    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(shared: &SharedArgs, args: FrameArgs) -> anyhow::Result<()> {
    let comp = Composition::youtube_cta();
    let props = resolve_props(shared, &comp)?;
    let assets = load_assets(shared)?;

    let mut backend = youtube_cta::create_backend(
        youtube_cta::BackendKind::Cpu,
        &RenderSettings::default(),
    )?;
    let frame = youtube_cta::render_frame(
        &comp,
        &props,
        FrameIndex(args.frame),
        backend.as_mut(),
        &assets,
    )?;

    if let Some(path) = &args.scene_json {
        let scene = SceneBuilder::new(&comp, &props)?.scene(FrameIndex(args.frame))?;
        ensure_parent(path)?;
        std::fs::write(path, scene.to_json()?)
            .with_context(|| format!("write scene json '{}'", path.display()))?;
    }

    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(shared: &SharedArgs, args: RenderArgs) -> anyhow::Result<()> {
    let comp = Composition::youtube_cta();
    let end = args.end.unwrap_or(comp.duration.0);
    let range = FrameRange::new(FrameIndex(args.start), FrameIndex(end))?;

    let props = resolve_props(shared, &comp)?;
    let assets = load_assets(shared)?;
    let mut backend = youtube_cta::CpuBackend::new(RenderSettings::default());

    let threading = RenderThreading {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        static_frame_elision: args.static_frame_elision,
    };

    let (mut sink, target): (Box<dyn FrameSink>, PathBuf) = match (&args.png_dir, &args.out) {
        (Some(dir), _) => (Box::new(PngSequenceSink::new(dir)), dir.clone()),
        (None, Some(out)) => {
            let opts = FfmpegSinkOpts {
                overwrite: args.overwrite,
                ..FfmpegSinkOpts::new(out).with_codec(args.codec.into())
            };
            (Box::new(FfmpegSink::new(opts)), out.clone())
        }
        (None, None) => anyhow::bail!("either --out or --png-dir is required"),
    };

    let stats = youtube_cta::render_range(
        &comp,
        &props,
        range,
        &mut backend,
        &assets,
        sink.as_mut(),
        &threading,
    )?;

    eprintln!(
        "wrote {} ({} frames, {} rendered, {} elided)",
        target.display(),
        stats.frames_total,
        stats.frames_rendered,
        stats.frames_elided
    );
    Ok(())
}

fn dump_font_diagnostics(assets: &AssetStore) {
    eprintln!("text font diagnostics:");
    let Some(book) = assets.fonts() else {
        eprintln!("  no fonts resolved; text will be skipped");
        return;
    };
    for (weight, face) in book.faces() {
        eprintln!("  {weight:?}:");
        eprintln!("    family:  {}", face.family);
        eprintln!("    weight:  {}", face.weight);
        if let Some(path) = &face.path {
            eprintln!("    path:    {}", path.display());
        }
        eprintln!("    sha256:  {}", sha256_hex(&face.data));
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
