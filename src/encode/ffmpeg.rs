use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::config::EncodeSettings;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRgb;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Silent video output path.
    pub out_path: PathBuf,
    /// Overwrite `out_path` if it exists.
    pub overwrite: bool,
    /// Video encoder settings.
    pub encode: EncodeSettings,
}

impl FfmpegSinkOpts {
    /// Default options writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            encode: EncodeSettings::default(),
        }
    }
}

/// Writes an audio-less H.264 stream by piping raw RGB24 frames into the system `ffmpeg`.
///
/// Dropping a sink that was started but not ended kills the encoder.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
    finished: bool,
}

impl FfmpegSink {
    /// Create a sink; `ffmpeg` is spawned in `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
            finished: false,
        }
    }

    /// Arguments passed to `ffmpeg` for `cfg`.
    pub fn encoder_args(&self, cfg: &SinkConfig) -> Vec<OsString> {
        let enc = &self.opts.encode;
        let mut args: Vec<OsString> = Vec::new();
        let mut push = |s: &str| args.push(OsString::from(s));

        push(if self.opts.overwrite { "-y" } else { "-n" });
        for a in ["-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgb24", "-s"] {
            push(a);
        }
        push(&format!("{}x{}", cfg.width, cfg.height));
        // `-r` before `-i` sets the input rate of raw frames.
        push("-r");
        push(&format!("{}/{}", cfg.fps.num, cfg.fps.den));
        for a in ["-i", "pipe:0", "-an", "-c:v", enc.video_codec.as_str()] {
            push(a);
        }
        push("-preset");
        push(&enc.preset);
        push("-crf");
        push(&enc.crf.to_string());
        for a in ["-pix_fmt", "yuv420p", "-movflags", "+faststart"] {
            push(a);
        }
        args.push(self.opts.out_path.clone().into_os_string());
        args
    }

    fn fail_with_stderr(&mut self, msg: String) -> ReelError {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.wait();
        }
        let stderr = self.join_stderr().unwrap_or_default();
        let stderr = String::from_utf8_lossy(&stderr);
        ReelError::writer(format!("{msg}: {}", stderr.trim()))
    }

    fn join_stderr(&mut self) -> ReelResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ReelError::writer("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| ReelError::writer(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ReelResult<()> {
        if self.child.is_some() {
            return Err(ReelError::writer("ffmpeg sink already started"));
        }
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(ReelError::writer("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ReelError::writer("width/height must be non-zero"));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ReelError::writer(
                "width/height must be even (required for yuv420p output)",
            ));
        }

        ensure_parent_dir(&self.opts.out_path)?;
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ReelError::writer(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }

        let mut child = Command::new("ffmpeg")
            .args(self.encoder_args(&cfg))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReelError::writer(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ReelError::writer("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ReelError::writer("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        tracing::debug!(out = %self.opts.out_path.display(), width = cfg.width, height = cfg.height, "ffmpeg sink started");
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgb) -> ReelResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| ReelError::writer("ffmpeg sink not started"))?;
        check_frame(cfg, self.last_idx, idx, frame)?;
        self.last_idx = Some(idx);

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ReelError::writer("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        if let Err(e) = stdin.write_all(&frame.data) {
            return Err(self.fail_with_stderr(format!(
                "failed to write frame {} to ffmpeg: {e}",
                idx.0
            )));
        }
        Ok(())
    }

    fn end(&mut self) -> ReelResult<()> {
        if self.finished {
            return Ok(());
        }
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| ReelError::writer("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| ReelError::writer(format!("failed to wait for ffmpeg: {e}")))?;
        let stderr_bytes = self.join_stderr()?;
        self.finished = true;
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ReelError::writer(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        tracing::debug!(out = %self.opts.out_path.display(), "ffmpeg sink finished");
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_tool_on_path("ffmpeg")
}

/// Return `true` when `ffprobe` can be invoked from `PATH`.
pub fn is_ffprobe_on_path() -> bool {
    is_tool_on_path("ffprobe")
}

fn is_tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
