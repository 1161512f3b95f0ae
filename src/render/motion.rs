//! Ken Burns camera and cue-boundary fades.
//!
//! Every quantity here is a pure function of the frame index `j` within a cue and the cue's
//! frame count `n`, so frames can be rendered in any order.

use crate::config::MotionConfig;
use crate::foundation::core::{Affine, Canvas, Vec2};
use crate::foundation::math::clamped_progress;

/// Linear progress through a cue: `0` on the first frame, `1` on the last.
///
/// A single-frame cue stays at `0`.
pub fn progress(j: u64, n: u64) -> f64 {
    clamped_progress(j, n.saturating_sub(1))
}

/// Camera zoom and pan caps for one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Zoom on the last frame.
    pub max_zoom: f64,
    /// Pan offset on the last frame.
    pub max_pan: Vec2,
}

impl Camera {
    /// Camera from configuration.
    pub fn from_config(cfg: &MotionConfig) -> Self {
        Self {
            max_zoom: cfg.max_zoom,
            max_pan: Vec2::new(cfg.max_pan[0], cfg.max_pan[1]),
        }
    }

    /// `1 + (max_zoom - 1) * p`.
    pub fn zoom_at(&self, j: u64, n: u64) -> f64 {
        1.0 + (self.max_zoom - 1.0) * progress(j, n)
    }

    /// `max_pan * p`.
    pub fn pan_at(&self, j: u64, n: u64) -> Vec2 {
        self.max_pan * progress(j, n)
    }

    /// Image-to-canvas transform: scale by the current zoom about the panned canvas center.
    pub fn transform_at(&self, canvas: Canvas, j: u64, n: u64) -> Affine {
        let c = canvas.center() + self.pan_at(j, n);
        Affine::translate(c.to_vec2())
            * Affine::scale(self.zoom_at(j, n))
            * Affine::translate(-c.to_vec2())
    }
}

/// Brightness factor for frame `j` of `n` with a fade window of `fade` frames at each end.
///
/// `min(j / fade, (n - 1 - j) / fade, 1)`; a zero window disables fading.
///
/// Both end frames of a cue are always black, so a cue of one or two frames never shows its
/// image.
pub fn fade_alpha(j: u64, n: u64, fade: u32) -> f64 {
    if fade == 0 {
        return 1.0;
    }
    let fade = f64::from(fade);
    let tail = n.saturating_sub(1).saturating_sub(j);
    ((j as f64) / fade).min((tail as f64) / fade).min(1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/render/motion.rs"]
mod tests;
