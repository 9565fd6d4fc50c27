use std::io::{Read as _, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::Context as _;

use crate::encode::sink::{FrameGate, FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{CtaError, CtaResult};
use crate::foundation::math::{mul_div255_u16, unpremultiply_rgba8_in_place};
use crate::render::backend::FrameRGBA;

/// Output codec.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCodec {
    /// `libx264` / `yuv420p` MP4; alpha is flattened over the background colour.
    #[default]
    H264,
    /// `prores_ks` 4444 with alpha (`yuva444p10le`), for compositing in an editor.
    ProRes4444,
}

impl VideoCodec {
    fn encoder_args(self) -> &'static [&'static str] {
        match self {
            Self::H264 => &[
                "-c:v",
                "libx264",
                "-pix_fmt",
                "yuv420p",
                "-movflags",
                "+faststart",
            ],
            Self::ProRes4444 => &[
                "-c:v",
                "prores_ks",
                "-profile:v",
                "4444",
                "-pix_fmt",
                "yuva444p10le",
            ],
        }
    }

    /// Conventional file extension for the container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::H264 => "mp4",
            Self::ProRes4444 => "mov",
        }
    }
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Output file.
    pub out_path: PathBuf,
    /// Replace an existing output file.
    pub overwrite: bool,
    /// Straight RGBA8 background used when flattening alpha for H.264.
    pub bg_rgba: [u8; 4],
    /// Output codec.
    pub codec: VideoCodec,
}

impl FfmpegSinkOpts {
    /// H.264 output over opaque black, overwriting existing files.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
            codec: VideoCodec::H264,
        }
    }

    /// Select the output codec.
    pub fn with_codec(mut self, codec: VideoCodec) -> Self {
        self.codec = codec;
        self
    }
}

/// `true` when a runnable `ffmpeg` binary is on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> CtaResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct Running {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<String>>,
}

/// Streams raw RGBA frames into the system `ffmpeg` binary.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    gate: FrameGate,
    running: Option<Running>,
    scratch: Vec<u8>,
}

impl std::fmt::Debug for FfmpegSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegSink")
            .field("opts", &self.opts)
            .field("running", &self.running.is_some())
            .finish()
    }
}

impl FfmpegSink {
    /// Sink that starts `ffmpeg` on `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            gate: FrameGate::default(),
            running: None,
            scratch: Vec::new(),
        }
    }

    /// Options the sink was created with.
    pub fn opts(&self) -> &FfmpegSinkOpts {
        &self.opts
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        // The system binary avoids linking against FFmpeg dev libraries.
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd.arg(if self.opts.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
            "-r",
            &format!("{}/{}", cfg.fps.num, cfg.fps.den),
            "-i",
            "pipe:0",
            "-an",
        ])
        .args(self.opts.codec.encoder_args())
        .arg(&self.opts.out_path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> CtaResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(CtaError::validation("encode fps must be non-zero"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(CtaError::validation(
                "encode width/height must be even (required for yuv420p output)",
            ));
        }
        self.gate.open(cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;

        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(CtaError::validation(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(CtaError::evaluation(
                "ffmpeg is required for video encoding, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg).spawn().map_err(|e| {
            CtaError::evaluation(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CtaError::evaluation("failed to open ffmpeg stdin"))?;
        // Drained on a thread so a chatty ffmpeg cannot fill the pipe and stall the writer.
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = String::new();
                let _ = pipe.read_to_string(&mut buf);
                buf
            })
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            codec = ?self.opts.codec,
            "ffmpeg started"
        );
        self.scratch = vec![0u8; (cfg.width as usize) * (cfg.height as usize) * 4];
        self.running = Some(Running {
            child,
            stdin: Some(stdin),
            stderr,
        });
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> CtaResult<()> {
        self.gate.check(idx, frame)?;
        match self.opts.codec {
            VideoCodec::H264 => flatten_to_opaque_rgba8(
                &mut self.scratch,
                &frame.data,
                frame.premultiplied,
                self.opts.bg_rgba,
            )?,
            VideoCodec::ProRes4444 => {
                self.scratch.copy_from_slice(&frame.data);
                if frame.premultiplied {
                    unpremultiply_rgba8_in_place(&mut self.scratch);
                }
            }
        }

        let stdin = self
            .running
            .as_mut()
            .and_then(|r| r.stdin.as_mut())
            .ok_or_else(|| CtaError::evaluation("ffmpeg encoder is not running"))?;
        stdin.write_all(&self.scratch).map_err(|e| {
            CtaError::evaluation(format!("failed to write frame {} to ffmpeg stdin: {e}", idx.0))
        })?;
        Ok(())
    }

    fn end(&mut self) -> CtaResult<()> {
        self.gate.close()?;
        let mut running = self
            .running
            .take()
            .ok_or_else(|| CtaError::evaluation("ffmpeg encoder is not running"))?;
        drop(running.stdin.take());

        let status = running
            .child
            .wait()
            .map_err(|e| CtaError::evaluation(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr = running
            .stderr
            .take()
            .and_then(|h| h.join().ok())
            .unwrap_or_default();

        if !status.success() {
            return Err(CtaError::evaluation(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        tracing::info!(out = %self.opts.out_path.display(), "video written");
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(mut running) = self.running.take() {
            drop(running.stdin.take());
            let _ = running.child.kill();
            let _ = running.child.wait();
        }
    }
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> CtaResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CtaError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [
        u16::from(bg_rgba[0]),
        u16::from(bg_rgba[1]),
        u16::from(bg_rgba[2]),
    ];

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for c in 0..3 {
            let fg = if src_is_premul {
                u16::from(s[c])
            } else {
                mul_div255_u16(u16::from(s[c]), a)
            };
            d[c] = (fg + mul_div255_u16(bg[c], inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
