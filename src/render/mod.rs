//! CPU rendering: per-cue preparation, camera motion, captions and the ordered render driver.

pub mod caption;
/// Premultiplied RGBA8 source-over blending.
pub mod composite;
/// Per-cue scene preparation and frame rasterization on `vello_cpu`.
pub mod cpu;
/// Packed RGB24 output frames.
pub mod frame;
pub mod motion;
/// Ordered, optionally parallel render driver.
pub mod pipeline;

pub use caption::{
    CaptionEngine, CaptionLayout, CaptionLine, CaptionOverlay, outline_offsets, wrap_caption,
};
pub use cpu::{FrameRenderer, PreparedScene, load_scene_image};
pub use frame::FrameRgb;
pub use motion::{Camera, fade_alpha, progress};
pub use pipeline::{RenderStats, RenderThreading, render_plan};
