//! Burned-in captions.
//!
//! Text is wrapped by character count, each line is shaped with `parley`, and the whole
//! block is rasterized once per cue into a premultiplied RGBA overlay. Captions do not move
//! with the camera, so the overlay is reused for every frame of the cue.

use std::ops::Range;
use std::path::Path;

use crate::config::{CaptionConfig, MAX_OUTLINE_RADIUS};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::composite::covered_rows;

/// Greedy word wrap to lines of at most `max_chars` characters.
///
/// Words longer than the limit are split so that no line exceeds it. Whitespace runs
/// collapse to a single space.
pub fn wrap_caption(text: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        for piece in chars.chunks(max) {
            let len = piece.len();
            if current_len > 0 && current_len + 1 + len > max {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(piece);
            current_len += len;
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Integer offsets `(dx, dy)` with `dx² + dy² < radius²`, in row-major order.
///
/// `radius` is capped at [`MAX_OUTLINE_RADIUS`].
pub fn outline_offsets(radius: u32) -> Vec<(i32, i32)> {
    let r = radius.min(MAX_OUTLINE_RADIUS) as i32;
    let mut out = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy < r * r {
                out.push((dx, dy));
            }
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct PlacedGlyph {
    id: u32,
    x: f32,
    y: f32,
}

/// One shaped caption line in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptionLine {
    /// Line text.
    pub text: String,
    /// Left edge of the line box.
    pub x: f32,
    /// Top edge of the line box.
    pub top: f32,
    /// Advance width.
    pub width: f32,
    /// Line box height.
    pub height: f32,
    glyphs: Vec<PlacedGlyph>,
}

/// Shaped caption block.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptionLayout {
    /// Lines top to bottom.
    pub lines: Vec<CaptionLine>,
}

impl CaptionLayout {
    /// Vertical extent `(top, bottom)` of the block, if any line exists.
    pub fn bounds_y(&self) -> Option<(f32, f32)> {
        let first = self.lines.first()?;
        let last = self.lines.last()?;
        Some((first.top, last.top + last.height))
    }
}

/// Caption raster for one cue.
#[derive(Clone, Debug)]
pub struct CaptionOverlay {
    /// Premultiplied RGBA8, canvas-sized.
    pub rgba: Vec<u8>,
    /// Rows holding visible pixels.
    pub rows: Range<usize>,
}

/// Font, shaping contexts and styling for captions.
pub struct CaptionEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    style: CaptionConfig,
}

impl std::fmt::Debug for CaptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptionEngine")
            .field("family_name", &self.family_name)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl CaptionEngine {
    /// Load the configured font file.
    pub fn load(style: &CaptionConfig) -> ReelResult<Self> {
        let bytes = std::fs::read(&style.font_path)
            .map_err(|e| ReelError::font(&style.font_path, e))?;
        Self::from_font_bytes(bytes, &style.font_path, style)
    }

    /// Build an engine from font bytes. `origin` is only used in error messages.
    pub fn from_font_bytes(bytes: Vec<u8>, origin: &Path, style: &CaptionConfig) -> ReelResult<Self> {
        if !style.font_size.is_finite() || style.font_size <= 0.0 {
            return Err(ReelError::validation("caption font_size must be finite and > 0"));
        }

        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::font(origin, "no font families found in file"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::font(origin, "registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, "caption font loaded");
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
            style: style.clone(),
        })
    }

    /// Family name of the loaded font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Wrap and shape `text`, centering each line horizontally and the block around
    /// `5/6` of the canvas height, kept inside the canvas.
    pub fn layout(&mut self, text: &str, canvas: Canvas) -> CaptionLayout {
        let mut lines = Vec::new();
        for line in wrap_caption(text, self.style.max_line_chars) {
            lines.push(self.shape_line(line));
        }

        let canvas_w = canvas.width as f32;
        let canvas_h = canvas.height as f32;
        let block_h: f32 = lines.iter().map(|l| l.height).sum();
        let center_y = canvas_h * 5.0 / 6.0;
        let mut top = (center_y - block_h / 2.0).min(canvas_h - block_h).max(0.0);
        for line in &mut lines {
            line.x = (canvas_w - line.width) / 2.0;
            line.top = top;
            top += line.height;
        }

        CaptionLayout { lines }
    }

    fn shape_line(&mut self, text: String) -> CaptionLine {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(self.style.font_size));

        let mut layout: parley::Layout<()> = builder.build(&text);
        layout.break_all_lines(None);

        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.positioned_glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                }));
            }
        }

        CaptionLine {
            text,
            x: 0.0,
            top: 0.0,
            width: layout.width(),
            height: layout.height(),
            glyphs,
        }
    }

    /// Rasterize a layout: outline copies at every offset of the outline disc in the dark
    /// color, then the fill pass in the light color. `None` when there is nothing to draw.
    pub fn rasterize(
        &self,
        layout: &CaptionLayout,
        canvas: Canvas,
    ) -> ReelResult<Option<CaptionOverlay>> {
        if layout.lines.iter().all(|l| l.glyphs.is_empty()) {
            return Ok(None);
        }
        let w: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::validation("canvas width exceeds u16"))?;
        let h: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::validation("canvas height exceeds u16"))?;

        let glyphs = || {
            layout.lines.iter().flat_map(|l| {
                l.glyphs.iter().map(move |g| vello_cpu::Glyph {
                    id: g.id,
                    x: l.x + g.x,
                    y: l.top + g.y,
                })
            })
        };
        let [or, og, ob] = self.style.outline_rgb;
        let [fr, fg, fb] = self.style.fill_rgb;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(or, og, ob, 255));
        for (dx, dy) in outline_offsets(self.style.outline_radius) {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(dx),
                f64::from(dy),
            )));
            ctx.glyph_run(&self.font)
                .font_size(self.style.font_size)
                .fill_glyphs(glyphs());
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(fr, fg, fb, 255));
        ctx.glyph_run(&self.font)
            .font_size(self.style.font_size)
            .fill_glyphs(glyphs());
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        let rgba = pixmap.data_as_u8_slice().to_vec();
        let rows = covered_rows(&rgba, canvas.width);
        Ok(Some(CaptionOverlay { rgba, rows }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
