use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::ReelResult;

/// Container facts reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct MediaInfo {
    /// Container duration in seconds (`0.0` when unknown).
    pub duration_secs: f64,
    /// Frame count of the first video stream, when the container records it.
    pub video_frames: Option<u64>,
    /// Whether a video stream exists.
    pub has_video: bool,
    /// Whether an audio stream exists.
    pub has_audio: bool,
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Probe `path` with `ffprobe`.
pub fn probe_media(path: &Path) -> ReelResult<MediaInfo> {
    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .context("failed to run ffprobe")?;
    if !out.status.success() {
        return Err(anyhow::anyhow!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )
        .into());
    }
    parse_probe_json(&out.stdout)
}

/// Interpret `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_json(bytes: &[u8]) -> ReelResult<MediaInfo> {
    let parsed: ProbeOut = serde_json::from_slice(bytes).context("ffprobe json parse failed")?;

    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));
    let duration_secs = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or_else(|| video.and_then(|v| v.duration.as_deref()))
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(MediaInfo {
        duration_secs,
        video_frames: video
            .and_then(|v| v.nb_frames.as_deref())
            .and_then(|s| s.parse().ok()),
        has_video: video.is_some(),
        has_audio,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/probe.rs"]
mod tests;
