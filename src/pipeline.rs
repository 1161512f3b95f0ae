//! End-to-end orchestration: subtitles → plan → frames → silent stream → muxed reel.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::ReelConfig;
use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffprobe_on_path};
use crate::encode::mux::AudioMuxer;
use crate::encode::probe::probe_media;
use crate::foundation::error::{ReelError, ReelResult};
use crate::plan::assets::AssetSet;
use crate::plan::builder::{RenderPlan, build_plan};
use crate::render::pipeline::{RenderStats, RenderThreading, render_plan};
use crate::subtitle::load_cues;

/// Result of a full pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReelOutput {
    /// Final muxed video.
    pub path: PathBuf,
    /// Silent intermediate, when it was kept.
    pub silent_path: Option<PathBuf>,
    /// Render summary.
    pub stats: RenderStats,
}

/// Runs the stages in order and fails fast on the first error.
#[derive(Clone, Debug)]
pub struct ReelPipeline {
    config: ReelConfig,
    threading: RenderThreading,
    mux_timeout: Option<Duration>,
}

impl ReelPipeline {
    /// Pipeline for a validated configuration.
    pub fn new(config: ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            threading: RenderThreading::default(),
            mux_timeout: None,
        })
    }

    /// Frame rendering parallelism.
    pub fn with_threading(mut self, threading: RenderThreading) -> Self {
        self.threading = threading;
        self
    }

    /// Deadline for the mux step.
    pub fn with_mux_timeout(mut self, timeout: Duration) -> Self {
        self.mux_timeout = Some(timeout);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &ReelConfig {
        &self.config
    }

    /// Load the cues and pair them with the images.
    pub fn plan(&self, assets: &AssetSet) -> ReelResult<RenderPlan> {
        let cues = load_cues(&assets.subtitles, self.config.parse_mode)?;
        build_plan(assets, cues, self.config.fps()?, self.config.rounding)
    }

    /// Render the silent video stream to `silent_out`.
    #[tracing::instrument(skip(self, assets))]
    pub fn render_silent(&self, assets: &AssetSet, silent_out: &Path) -> ReelResult<RenderStats> {
        let plan = self.plan(assets)?;
        self.render_plan_to(&plan, silent_out)
    }

    fn render_plan_to(&self, plan: &RenderPlan, silent_out: &Path) -> ReelResult<RenderStats> {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: silent_out.to_path_buf(),
            overwrite: true,
            encode: self.config.encode.clone(),
        });
        render_plan(plan, &self.config, &mut sink, &self.threading)
    }

    /// Render and mux the reel into `out`.
    ///
    /// Cues, images and the narration file are checked before any frame is rendered.
    /// The silent stream is written to [`silent_path_for`]`(out)`. It is removed once the mux
    /// succeeds unless `keep_intermediate` is set, and left in place when anything fails.
    #[tracing::instrument(skip(self, assets))]
    pub fn run(&self, assets: &AssetSet, out: &Path) -> ReelResult<ReelOutput> {
        let plan = self.plan(assets)?;
        if !assets.audio.is_file() {
            return Err(ReelError::validation(format!(
                "audio input '{}' does not exist",
                assets.audio.display()
            )));
        }

        let silent = silent_path_for(out);
        let stats = self.render_plan_to(&plan, &silent)?;
        self.warn_on_drift(assets, &stats);

        let mut muxer = AudioMuxer::new(self.config.encode.clone());
        if let Some(t) = self.mux_timeout {
            muxer = muxer.with_timeout(t);
        }
        let path = muxer.mux(&silent, &assets.audio, out)?;

        let silent_path = if self.config.keep_intermediate {
            Some(silent)
        } else {
            if let Err(e) = std::fs::remove_file(&silent) {
                tracing::warn!(path = %silent.display(), error = %e, "could not remove silent intermediate");
            }
            None
        };

        tracing::info!(out = %path.display(), frames = stats.frames, "reel written");
        Ok(ReelOutput {
            path,
            silent_path,
            stats,
        })
    }

    fn warn_on_drift(&self, assets: &AssetSet, stats: &RenderStats) {
        if !is_ffprobe_on_path() {
            return;
        }
        let Ok(fps) = self.config.fps() else {
            return;
        };
        match probe_media(&assets.audio) {
            Ok(info) if info.duration_secs > 0.0 => {
                let video_secs = fps.frames_to_secs(stats.frames);
                let drift = video_secs - info.duration_secs;
                if drift.abs() > fps.frame_duration_secs() {
                    tracing::warn!(
                        video_secs,
                        audio_secs = info.duration_secs,
                        drift_secs = drift,
                        "video and narration lengths differ by more than one frame"
                    );
                }
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "narration probe failed"),
        }
    }
}

/// `<dir>/<stem>.silent.mp4` next to `out`.
pub fn silent_path_for(out: &Path) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "reel".to_string());
    out.with_file_name(format!("{stem}.silent.mp4"))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
