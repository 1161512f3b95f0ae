use std::path::Path;

use crate::config::ReelConfig;
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};
use crate::plan::builder::PlannedScene;
use crate::render::caption::{CaptionEngine, CaptionOverlay};
use crate::render::composite::over_rows_in_place;
use crate::render::frame::FrameRgb;
use crate::render::motion::{Camera, fade_alpha};

/// Turns planned scenes into frame-ready state.
///
/// Owns the caption font and shaping contexts; everything per-cue lives in the
/// [`PreparedScene`] it returns.
#[derive(Debug)]
pub struct FrameRenderer {
    canvas: Canvas,
    camera: Camera,
    fade_frames: u32,
    captions: CaptionEngine,
}

impl FrameRenderer {
    /// Validate the canvas and load the caption font.
    pub fn new(config: &ReelConfig) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self {
            canvas: config.canvas(),
            camera: Camera::from_config(&config.motion),
            fade_frames: config.fade_frames,
            captions: CaptionEngine::load(&config.caption)?,
        })
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Decode and resize the scene image and rasterize its caption.
    #[tracing::instrument(skip(self, scene), fields(cue = scene.cue.index, frames = scene.frame_count))]
    pub fn prepare(&mut self, scene: &PlannedScene) -> ReelResult<PreparedScene> {
        let image = load_scene_image(&scene.image_path, self.canvas)?;
        let layout = self.captions.layout(&scene.cue.text, self.canvas);
        let caption = self.captions.rasterize(&layout, self.canvas)?;
        tracing::debug!(lines = layout.lines.len(), "scene prepared");

        Ok(PreparedScene {
            canvas: self.canvas,
            frame_count: scene.frame_count,
            camera: self.camera,
            fade_frames: self.fade_frames,
            image,
            caption,
        })
    }
}

/// Read-only per-cue state. Frames can be rendered in any order and from any thread.
#[derive(Clone)]
pub struct PreparedScene {
    canvas: Canvas,
    frame_count: u64,
    camera: Camera,
    fade_frames: u32,
    image: vello_cpu::Image,
    caption: Option<CaptionOverlay>,
}

impl PreparedScene {
    /// Frames in this cue.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Render frame `j` of the cue.
    pub fn render_frame(&self, j: u64) -> ReelResult<FrameRgb> {
        if j >= self.frame_count {
            return Err(ReelError::validation(format!(
                "frame {j} out of range for a cue of {} frames",
                self.frame_count
            )));
        }
        let (w, h) = canvas_u16(self.canvas)?;
        let full = vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(w), f64::from(h));

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_rect(&full);

        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(self.camera.transform_at(
            self.canvas,
            j,
            self.frame_count,
        )));
        ctx.set_paint(self.image.clone());
        ctx.fill_rect(&full);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        if let Some(caption) = &self.caption {
            over_rows_in_place(
                pixmap.data_as_u8_slice_mut(),
                &caption.rgba,
                self.canvas.width,
                caption.rows.clone(),
            )?;
        }

        let mut frame = FrameRgb::from_premul_rgba(
            pixmap.data_as_u8_slice(),
            self.canvas.width,
            self.canvas.height,
        )?;
        frame.fade_to_black(unit_to_u8(fade_alpha(
            j,
            self.frame_count,
            self.fade_frames,
        )));
        Ok(frame)
    }
}

/// Decode `path` and resize it to exactly the canvas size with a Catmull-Rom filter.
pub fn load_scene_image(path: &Path, canvas: Canvas) -> ReelResult<vello_cpu::Image> {
    let decoded = image::ImageReader::open(path)
        .map_err(|e| ReelError::decode(path, e))?
        .with_guessed_format()
        .map_err(|e| ReelError::decode(path, e))?
        .decode()
        .map_err(|e| ReelError::decode(path, e))?;
    let resized = decoded
        .resize_exact(
            canvas.width,
            canvas.height,
            image::imageops::FilterType::CatmullRom,
        )
        .to_rgba8();

    let pixmap = rgba8_to_pixmap(resized.as_raw(), canvas)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn rgba8_to_pixmap(rgba8: &[u8], canvas: Canvas) -> ReelResult<vello_cpu::Pixmap> {
    let (w, h) = canvas_u16(canvas)?;
    if rgba8.len() != canvas.width as usize * canvas.height as usize * 4 {
        return Err(ReelError::Other(anyhow::anyhow!(
            "resized image byte length mismatch"
        )));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(rgba8.len() / 4);
    for px in rgba8.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        let premul = |c: u8| mul_div255_u8(u16::from(c), u16::from(a));
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: premul(px[0]),
            g: premul(px[1]),
            b: premul(px[2]),
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

fn canvas_u16(canvas: Canvas) -> ReelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ReelError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ReelError::validation("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: crate::foundation::core::Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
