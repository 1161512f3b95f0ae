use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;

/// One output frame: RGB24, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgb {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl FrameRgb {
    /// An all-black frame.
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Drop the alpha channel of premultiplied RGBA8 pixels, i.e. flatten over black.
    pub fn from_premul_rgba(rgba: &[u8], width: u32, height: u32) -> ReelResult<Self> {
        let px = width as usize * height as usize;
        if rgba.len() != px * 4 {
            return Err(ReelError::Other(anyhow::anyhow!(
                "rgba buffer is {} bytes, expected {} for {width}x{height}",
                rgba.len(),
                px * 4
            )));
        }
        let mut data = Vec::with_capacity(px * 3);
        for p in rgba.chunks_exact(4) {
            data.extend_from_slice(&p[..3]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// RGB triple at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Scale every channel by `alpha / 255`, which blends the frame with black.
    pub fn fade_to_black(&mut self, alpha: u8) {
        if alpha == 255 {
            return;
        }
        let a = u16::from(alpha);
        for c in &mut self.data {
            *c = mul_div255_u8(u16::from(*c), a);
        }
    }

    /// Write the frame as a PNG.
    pub fn save_png(&self, path: &Path) -> ReelResult<()> {
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
