//! Pipeline configuration.
//!
//! Every constant that affects pixel output or pacing lives here so that a pipeline run is
//! reproducible from its [`ReelConfig`] alone. The `pub const` values are the defaults.

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::plan::builder::FrameRounding;
use crate::subtitle::srt::ParseMode;

/// Output width in pixels (9:16 portrait).
pub const VIDEO_WIDTH: u32 = 1080;
/// Output height in pixels (9:16 portrait).
pub const VIDEO_HEIGHT: u32 = 1920;
/// Output frame rate, held fixed for a pipeline run.
pub const FRAME_RATE: u32 = 25;
/// Zoom reached on the last frame of every cue.
pub const MAX_ZOOM: f64 = 1.1;
/// Pan offset `(dx, dy)` in pixels reached on the last frame of every cue.
pub const MAX_PAN: (f64, f64) = (40.0, 60.0);
/// Length of the fade-in and fade-out window of every cue.
pub const FADE_FRAMES: u32 = 15;
/// Maximum caption line length in characters.
pub const MAX_LINE_CHARS: usize = 20;
/// Default caption font.
pub const FONT_PATH: &str = "assets/fonts/Roboto-Bold.ttf";
/// Caption font size in pixels.
pub const FONT_SIZE: f32 = 96.0;
/// Caption outline radius in pixels.
pub const OUTLINE_RADIUS: u32 = 4;
/// Largest accepted caption outline radius in pixels.
pub const MAX_OUTLINE_RADIUS: u32 = 64;

/// Camera motion applied to every cue.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionConfig {
    /// Zoom cap (`>= 1.0`).
    pub max_zoom: f64,
    /// Pan cap `[dx, dy]` in pixels.
    pub max_pan: [f64; 2],
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            max_zoom: MAX_ZOOM,
            max_pan: [MAX_PAN.0, MAX_PAN.1],
        }
    }
}

/// Burned-in caption styling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// TrueType/OpenType font file.
    pub font_path: PathBuf,
    /// Font size in pixels.
    pub font_size: f32,
    /// Greedy wrap limit in characters.
    pub max_line_chars: usize,
    /// Outline radius in pixels; `0` disables the outline pass.
    pub outline_radius: u32,
    /// Glyph fill color.
    pub fill_rgb: [u8; 3],
    /// Glyph outline color.
    pub outline_rgb: [u8; 3],
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(FONT_PATH),
            font_size: FONT_SIZE,
            max_line_chars: MAX_LINE_CHARS,
            outline_radius: OUTLINE_RADIUS,
            fill_rgb: [255, 255, 255],
            outline_rgb: [0, 0, 0],
        }
    }
}

/// Encoder settings shared by the silent stream writer and the muxer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeSettings {
    /// ffmpeg video encoder.
    pub video_codec: String,
    /// Constant rate factor for the video encoder.
    pub crf: u8,
    /// Encoder speed preset.
    pub preset: String,
    /// ffmpeg audio encoder used when muxing.
    pub audio_codec: String,
    /// Audio bitrate, e.g. `192k`.
    pub audio_bitrate: String,
    /// Re-encode the video stream while muxing instead of stream-copying it.
    pub reencode_on_mux: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            crf: 23,
            preset: "medium".to_string(),
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
            reencode_on_mux: false,
        }
    }
}

/// Full configuration of one pipeline run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReelConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Integer frame rate.
    pub frame_rate: u32,
    /// Ken Burns motion caps.
    pub motion: MotionConfig,
    /// Fade window per cue boundary, in frames.
    pub fade_frames: u32,
    /// Caption styling.
    pub caption: CaptionConfig,
    /// How malformed subtitle tokens are treated.
    pub parse_mode: ParseMode,
    /// How per-cue frame counts are rounded.
    pub rounding: FrameRounding,
    /// Encoder settings.
    pub encode: EncodeSettings,
    /// Keep the silent intermediate after a successful mux.
    pub keep_intermediate: bool,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            width: VIDEO_WIDTH,
            height: VIDEO_HEIGHT,
            frame_rate: FRAME_RATE,
            motion: MotionConfig::default(),
            fade_frames: FADE_FRAMES,
            caption: CaptionConfig::default(),
            parse_mode: ParseMode::Strict,
            rounding: FrameRounding::PerCue,
            encode: EncodeSettings::default(),
            keep_intermediate: false,
        }
    }
}

impl ReelConfig {
    /// Load a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| ReelError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "width/height must be even (required for yuv420p output)",
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ReelError::validation("width/height must fit in u16"));
        }
        if self.frame_rate == 0 {
            return Err(ReelError::validation("frame_rate must be > 0"));
        }
        if !self.motion.max_zoom.is_finite() || self.motion.max_zoom < 1.0 {
            return Err(ReelError::validation("motion.max_zoom must be finite and >= 1.0"));
        }
        if self.motion.max_pan.iter().any(|v| !v.is_finite()) {
            return Err(ReelError::validation("motion.max_pan must be finite"));
        }
        if !self.caption.font_size.is_finite() || self.caption.font_size <= 0.0 {
            return Err(ReelError::validation(
                "caption.font_size must be finite and > 0",
            ));
        }
        if self.caption.outline_radius > MAX_OUTLINE_RADIUS {
            return Err(ReelError::validation(format!(
                "caption.outline_radius must be <= {MAX_OUTLINE_RADIUS}"
            )));
        }
        if self.caption.max_line_chars == 0 {
            return Err(ReelError::validation("caption.max_line_chars must be > 0"));
        }
        if self.encode.video_codec.trim().is_empty() || self.encode.audio_codec.trim().is_empty()
        {
            return Err(ReelError::validation("encoder names must be non-empty"));
        }
        Ok(())
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Output frame rate.
    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::integer(self.frame_rate)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
