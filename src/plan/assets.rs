use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// Local inputs of one reel.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AssetSet {
    /// Scene images in presentation order.
    pub images: Vec<PathBuf>,
    /// Narration audio.
    pub audio: PathBuf,
    /// Subtitle file (SRT or transcript JSON).
    pub subtitles: PathBuf,
}

impl AssetSet {
    /// Build an asset set, ordering `images` by their numeric ordinal.
    pub fn new(
        images: impl IntoIterator<Item = PathBuf>,
        audio: impl Into<PathBuf>,
        subtitles: impl Into<PathBuf>,
    ) -> ReelResult<Self> {
        Ok(Self {
            images: order_images(images)?,
            audio: audio.into(),
            subtitles: subtitles.into(),
        })
    }

    /// Build an asset set from every numbered image in `dir`.
    pub fn discover(
        dir: &Path,
        audio: impl Into<PathBuf>,
        subtitles: impl Into<PathBuf>,
    ) -> ReelResult<Self> {
        Self::new(discover_images(dir)?, audio, subtitles)
    }
}

/// Numeric ordinal of a `<prefix>_<n>.<ext>` file name.
pub fn image_ordinal(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let (_, digits) = stem.rsplit_once('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Sort image paths by ordinal.
///
/// Ordinals must form the dense range `1..=n`; a missing ordinal, a duplicate or an
/// unnumbered file name is a validation error.
pub fn order_images(paths: impl IntoIterator<Item = PathBuf>) -> ReelResult<Vec<PathBuf>> {
    let mut numbered = paths
        .into_iter()
        .map(|p| match image_ordinal(&p) {
            Some(n) => Ok((n, p)),
            None => Err(ReelError::validation(format!(
                "image '{}' has no numeric ordinal (expected <name>_<n>.<ext>)",
                p.display()
            ))),
        })
        .collect::<ReelResult<Vec<_>>>()?;
    numbered.sort_by_key(|(n, _)| *n);

    for (expected, (n, p)) in (1u64..).zip(&numbered) {
        if *n < expected {
            return Err(ReelError::validation(format!(
                "duplicate image ordinal {n} ('{}')",
                p.display()
            )));
        }
        if *n > expected {
            return Err(ReelError::validation(format!(
                "missing image ordinal {expected} (next is {n})"
            )));
        }
    }

    Ok(numbered.into_iter().map(|(_, p)| p).collect())
}

/// Numbered image files directly inside `dir`, ordered by ordinal.
pub fn discover_images(dir: &Path) -> ReelResult<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read image dir '{}'", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read image dir '{}'", dir.display()))?
            .path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        if !path.is_file() || !is_image {
            continue;
        }
        if image_ordinal(&path).is_none() {
            tracing::debug!(path = %path.display(), "skipping unnumbered image");
            continue;
        }
        found.push(path);
    }

    order_images(found)
}

#[cfg(test)]
#[path = "../../tests/unit/plan/assets.rs"]
mod tests;
