//! Pairing scene images with cues and budgeting frames.

/// Scene image discovery and ordinal ordering.
pub mod assets;
/// Cue-to-frame budgeting.
pub mod builder;

pub use assets::{AssetSet, discover_images, image_ordinal, order_images};
pub use builder::{FrameRounding, PlannedScene, RenderPlan, build_plan};
