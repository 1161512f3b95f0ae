use rayon::prelude::*;
use xxhash_rust::xxh3::Xxh3;

use crate::config::ReelConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::plan::builder::RenderPlan;
use crate::render::cpu::{FrameRenderer, PreparedScene};
use crate::render::frame::FrameRgb;

/// Parallel frame rendering options.
///
/// Frames of one cue are rendered in batches of `chunk_size` on a rayon pool and pushed to
/// the sink in order, so the output is identical to the sequential path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderThreading {
    /// Render batches in parallel.
    pub parallel: bool,
    /// Frames per batch; `0` is treated as `1`.
    pub chunk_size: usize,
    /// Worker threads; `None` uses rayon's default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 16,
            threads: None,
        }
    }
}

/// Summary of a render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Cues rendered.
    pub cues: usize,
    /// Frames pushed to the sink.
    pub frames: u64,
    /// xxh3 over every frame's bytes in push order.
    pub digest: u64,
}

/// Render every scene of `plan` into `sink`, cue by cue and frame by frame.
#[tracing::instrument(skip_all, fields(cues = plan.scenes.len(), frames = plan.total_frames()))]
pub fn render_plan(
    plan: &RenderPlan,
    config: &ReelConfig,
    sink: &mut dyn FrameSink,
    threading: &RenderThreading,
) -> ReelResult<RenderStats> {
    let mut renderer = FrameRenderer::new(config)?;
    let canvas = renderer.canvas();
    let pool = if threading.parallel {
        Some(build_thread_pool(threading.threads)?)
    } else {
        None
    };
    let chunk_size = normalized_chunk_size(threading.chunk_size);

    sink.begin(SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: plan.fps,
    })?;

    let mut out = OrderedPush {
        sink,
        hasher: Xxh3::new(),
        next: 0,
    };
    for scene in &plan.scenes {
        let prepared = renderer.prepare(scene)?;
        match &pool {
            None => {
                for j in 0..prepared.frame_count() {
                    out.push(&prepared.render_frame(j)?)?;
                }
            }
            Some(pool) => render_scene_parallel(&prepared, pool, chunk_size, &mut out)?,
        }
        tracing::debug!(cue = scene.cue.index, next_frame = out.next, "cue rendered");
    }

    let stats = RenderStats {
        cues: plan.scenes.len(),
        frames: out.next,
        digest: out.hasher.digest(),
    };
    out.sink.end()?;
    tracing::info!(frames = stats.frames, digest = %format!("{:016x}", stats.digest), "render finished");
    Ok(stats)
}

struct OrderedPush<'a> {
    sink: &'a mut dyn FrameSink,
    hasher: Xxh3,
    next: u64,
}

impl OrderedPush<'_> {
    fn push(&mut self, frame: &FrameRgb) -> ReelResult<()> {
        self.hasher.update(&frame.data);
        self.sink.push_frame(FrameIndex(self.next), frame)?;
        self.next += 1;
        Ok(())
    }
}

fn render_scene_parallel(
    prepared: &PreparedScene,
    pool: &rayon::ThreadPool,
    chunk_size: u64,
    out: &mut OrderedPush<'_>,
) -> ReelResult<()> {
    let n = prepared.frame_count();
    let mut chunk_start = 0;
    while chunk_start < n {
        let chunk_end = (chunk_start + chunk_size).min(n);
        let frames = pool.install(|| {
            (chunk_start..chunk_end)
                .into_par_iter()
                .map(|j| prepared.render_frame(j))
                .collect::<Vec<_>>()
        });
        for frame in frames {
            out.push(&frame?)?;
        }
        chunk_start = chunk_end;
    }
    Ok(())
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if threads == Some(0) {
        return Err(ReelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    chunk_size.max(1) as u64
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
