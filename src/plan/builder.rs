use std::path::PathBuf;
use std::time::Duration;

use crate::foundation::core::{FrameIndex, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::plan::assets::AssetSet;
use crate::subtitle::srt::Cue;

/// How cue durations are turned into whole frame counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameRounding {
    /// Round each cue on its own. Sub-frame error accumulates across cues.
    #[default]
    PerCue,
    /// Round the running total and give each cue the difference, so the stream never
    /// drifts more than half a frame from the summed cue durations.
    CarryRemainder,
}

/// One image paired with its cue and frame budget.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlannedScene {
    /// Source image.
    pub image_path: PathBuf,
    /// Caption and timing.
    pub cue: Cue,
    /// Output frames for this scene, always `>= 1`.
    pub frame_count: u64,
    /// Index of the scene's first frame in the output stream.
    pub first_frame: FrameIndex,
}

/// Ordered scenes at a fixed frame rate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderPlan {
    /// Output frame rate.
    pub fps: Fps,
    /// Scenes in presentation order.
    pub scenes: Vec<PlannedScene>,
}

impl RenderPlan {
    /// Frames across all scenes.
    pub fn total_frames(&self) -> u64 {
        self.scenes.iter().map(|s| s.frame_count).sum()
    }

    /// Length of the rendered stream.
    pub fn duration_secs(&self) -> f64 {
        self.fps.frames_to_secs(self.total_frames())
    }
}

/// Pair images with cues positionally and compute frame counts.
#[tracing::instrument(skip(assets, cues), fields(images = assets.images.len(), cues = cues.len()))]
pub fn build_plan(
    assets: &AssetSet,
    cues: Vec<Cue>,
    fps: Fps,
    rounding: FrameRounding,
) -> ReelResult<RenderPlan> {
    if assets.images.len() != cues.len() {
        return Err(ReelError::Mismatch {
            image_count: assets.images.len(),
            cue_count: cues.len(),
        });
    }

    let mut scenes = Vec::with_capacity(cues.len());
    let mut elapsed = Duration::ZERO;
    let mut emitted = 0u64;
    for (image_path, cue) in assets.images.iter().zip(cues) {
        let frame_count = match rounding {
            FrameRounding::PerCue => fps.duration_to_frames_round(cue.duration()),
            FrameRounding::CarryRemainder => {
                elapsed += cue.duration();
                fps.duration_to_frames_round(elapsed).saturating_sub(emitted)
            }
        }
        .max(1);

        scenes.push(PlannedScene {
            image_path: image_path.clone(),
            cue,
            frame_count,
            first_frame: FrameIndex(emitted),
        });
        emitted += frame_count;
    }

    tracing::debug!(frames = emitted, "render plan built");
    Ok(RenderPlan { fps, scenes })
}

#[cfg(test)]
#[path = "../../tests/unit/plan/builder.rs"]
mod tests;
