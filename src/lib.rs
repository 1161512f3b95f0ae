//! reelstitch turns a narration, its subtitles and a numbered set of scene images into a
//! portrait video reel.
//!
//! Every subtitle cue is paired with one image. Its frames get a slow Ken Burns push, fades at
//! the cue boundaries and a burned-in caption. Frames are rasterized on the CPU, streamed to
//! `ffmpeg` as a silent MP4 and finally muxed with the narration audio.
//!
//! - Collect inputs into an [`AssetSet`]
//! - Build a [`RenderPlan`] from the cues
//! - Stream frames into a [`FrameSink`] with [`render_plan`], or run everything through
//!   [`ReelPipeline::run`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Pipeline configuration and its defaults.
pub mod config;
/// Frame sinks, the audio muxer and the media probe.
pub mod encode;
/// End-to-end orchestration.
pub mod pipeline;
/// Image/cue pairing and frame budgeting.
pub mod plan;
/// CPU frame rendering.
pub mod render;
/// SRT and transcript parsing.
pub mod subtitle;

pub use crate::foundation::core::{Affine, Canvas, Fps, FrameIndex, Point, Vec2};
pub use crate::foundation::error::{ErrorKind, ReelError, ReelResult};

pub use crate::config::{CaptionConfig, EncodeSettings, MotionConfig, ReelConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::mux::AudioMuxer;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::{ReelOutput, ReelPipeline};
pub use crate::plan::assets::AssetSet;
pub use crate::plan::builder::{FrameRounding, PlannedScene, RenderPlan, build_plan};
pub use crate::render::frame::FrameRgb;
pub use crate::render::pipeline::{RenderStats, RenderThreading, render_plan};
pub use crate::subtitle::srt::{Cue, ParseMode};
