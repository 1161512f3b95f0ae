//! Getting frames out: the silent stream writer, the audio muxer and the media probe.
//!
//! Sinks consume rendered frames in timeline order and are driven by
//! [`render_plan`](crate::render::render_plan).

/// `ffmpeg`-based silent MP4 sink.
pub mod ffmpeg;
/// Audio muxing through an external `ffmpeg` process.
pub mod mux;
/// `ffprobe` duration and stream inspection.
pub mod probe;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

pub use ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, is_ffmpeg_on_path, is_ffprobe_on_path,
};
pub use mux::AudioMuxer;
pub use probe::{MediaInfo, parse_probe_json, probe_media};
pub use sink::{FrameSink, InMemorySink, SinkConfig};
