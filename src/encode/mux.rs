use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::config::EncodeSettings;
use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{ReelError, ReelResult};

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Combines a silent video stream with a narration track via `ffmpeg`.
#[derive(Clone, Debug)]
pub struct AudioMuxer {
    settings: EncodeSettings,
    timeout: Option<Duration>,
    program: OsString,
}

impl AudioMuxer {
    /// Muxer using `settings` and the `ffmpeg` found on `PATH`.
    pub fn new(settings: EncodeSettings) -> Self {
        Self {
            settings,
            timeout: None,
            program: OsString::from("ffmpeg"),
        }
    }

    /// Kill the encoder if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use another executable in place of `ffmpeg`.
    pub fn with_program(mut self, program: impl AsRef<OsStr>) -> Self {
        self.program = program.as_ref().to_os_string();
        self
    }

    /// Encoder arguments: first video stream of `video`, first audio stream of `audio`,
    /// trimmed to the shorter of the two.
    pub fn build_args(&self, video: &Path, audio: &Path, out: &Path) -> Vec<OsString> {
        let s = &self.settings;
        let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(video.as_os_str().to_os_string());
        args.push("-i".into());
        args.push(audio.as_os_str().to_os_string());
        for a in ["-map", "0:v:0", "-map", "1:a:0"] {
            args.push(a.into());
        }
        if s.reencode_on_mux {
            for a in [
                "-c:v",
                s.video_codec.as_str(),
                "-preset",
                s.preset.as_str(),
                "-crf",
            ] {
                args.push(a.into());
            }
            args.push(s.crf.to_string().into());
            for a in ["-pix_fmt", "yuv420p"] {
                args.push(a.into());
            }
        } else {
            for a in ["-c:v", "copy"] {
                args.push(a.into());
            }
        }
        for a in [
            "-c:a",
            s.audio_codec.as_str(),
            "-b:a",
            s.audio_bitrate.as_str(),
            "-shortest",
            "-movflags",
            "+faststart",
        ] {
            args.push(a.into());
        }
        args.push(out.as_os_str().to_os_string());
        args
    }

    /// Mux `video` and `audio` into `out` and return `out`.
    #[tracing::instrument(skip(self))]
    pub fn mux(&self, video: &Path, audio: &Path, out: &Path) -> ReelResult<PathBuf> {
        if same_file(video, out) {
            return Err(ReelError::validation(format!(
                "mux output '{}' would overwrite the video input",
                out.display()
            )));
        }
        for (role, p) in [("video", video), ("audio", audio)] {
            if !p.is_file() {
                return Err(ReelError::validation(format!(
                    "{role} input '{}' does not exist",
                    p.display()
                )));
            }
        }
        ensure_parent_dir(out)?;

        let mut child = Command::new(&self.program)
            .args(self.build_args(video, audio, out))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ReelError::Mux {
                exit_code: None,
                output: format!(
                    "failed to spawn '{}': {e}",
                    Path::new(&self.program).display()
                ),
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) => {}
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ReelError::Mux {
                        exit_code: None,
                        output: format!("failed to wait for encoder: {e}"),
                    });
                }
            }
            if self.timeout.is_some_and(|t| started.elapsed() >= t) {
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            std::thread::sleep(POLL_INTERVAL);
        };

        let mut output = join_drain(stdout);
        let err_text = join_drain(stderr);
        if !output.is_empty() && !err_text.is_empty() {
            output.push('\n');
        }
        output.push_str(&err_text);
        let output = output.trim().to_string();

        let Some(status) = status else {
            return Err(ReelError::Mux {
                exit_code: None,
                output: format!(
                    "encoder timed out after {:.1}s: {output}",
                    started.elapsed().as_secs_f64()
                ),
            });
        };
        if !status.success() {
            return Err(ReelError::Mux {
                exit_code: status.code(),
                output,
            });
        }

        let produced = std::fs::metadata(out).map(|m| m.len()).unwrap_or(0);
        if produced == 0 {
            return Err(ReelError::Mux {
                exit_code: status.code(),
                output: format!(
                    "encoder reported success but '{}' is missing or empty. {output}",
                    out.display()
                ),
            });
        }

        tracing::info!(out = %out.display(), bytes = produced, "muxed audio into video");
        Ok(out.to_path_buf())
    }
}

type Drain = Option<std::thread::JoinHandle<Vec<u8>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut r| {
        std::thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = r.read_to_end(&mut bytes);
            bytes
        })
    })
}

fn join_drain(handle: Drain) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default()
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mux.rs"]
mod tests;
