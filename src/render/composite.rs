use std::ops::Range;

use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            std::array::from_fn(|i| src[i].saturating_add(mul_div255_u8(u16::from(dst[i]), inv)))
        }
    }
}

/// Composite `src` over `dst`, touching only the given pixel rows.
pub fn over_rows_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    rows: Range<usize>,
) -> ReelResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ReelError::Other(anyhow::anyhow!(
            "over_rows_in_place expects equal-length rgba8 buffers"
        )));
    }
    let stride = width as usize * 4;
    let start = (rows.start * stride).min(dst.len());
    let end = (rows.end * stride).min(dst.len());
    for (d, s) in dst[start..end]
        .chunks_exact_mut(4)
        .zip(src[start..end].chunks_exact(4))
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Rows of an RGBA8 buffer that contain any non-transparent pixel.
pub fn covered_rows(rgba: &[u8], width: u32) -> Range<usize> {
    let stride = (width as usize * 4).max(4);
    let opaque_row = |row: &[u8]| row.chunks_exact(4).any(|p| p[3] != 0);
    let mut rows = rgba.chunks_exact(stride).enumerate().filter(|(_, r)| opaque_row(r));
    match rows.next() {
        None => 0..0,
        Some((first, _)) => {
            let last = rows.last().map_or(first, |(i, _)| i);
            first..last + 1
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
