use std::path::PathBuf;

/// Convenience result type used across reelstitch.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error taxonomy. One variant per pipeline stage boundary.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// Subtitle input could not be read or is malformed.
    #[error("parse error (line {line}): {reason}")]
    Parse {
        /// 1-based line number, `0` when the failure is not tied to a line.
        line: usize,
        /// Human-readable cause.
        reason: String,
    },

    /// The number of scene images does not match the number of cues.
    #[error("mismatch error: {image_count} images for {cue_count} cues")]
    Mismatch {
        /// Ordered images found.
        image_count: usize,
        /// Cues parsed from the subtitle file.
        cue_count: usize,
    },

    /// A scene image could not be decoded.
    #[error("decode error: '{}': {reason}", .path.display())]
    Decode {
        /// Offending image path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// The caption font is missing or unusable.
    #[error("font error: '{}': {reason}", .path.display())]
    Font {
        /// Font file path.
        path: PathBuf,
        /// Loader message.
        reason: String,
    },

    /// The silent video stream could not be opened or written.
    #[error("writer error: {0}")]
    Writer(String),

    /// The external muxer failed or produced no output.
    #[error("mux error (exit code {}): {output}", display_exit_code(.exit_code))]
    Mux {
        /// Process exit code; `None` when the process was killed or never exited.
        exit_code: Option<i32>,
        /// Captured stdout/stderr or a description of the failure.
        output: String,
    },

    /// Invalid configuration or asset naming.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Stage tag for [`ReelError`], so callers can branch without matching payloads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`ReelError::Parse`].
    Parse,
    /// See [`ReelError::Mismatch`].
    Mismatch,
    /// See [`ReelError::Decode`].
    Decode,
    /// See [`ReelError::Font`].
    Font,
    /// See [`ReelError::Writer`].
    Writer,
    /// See [`ReelError::Mux`].
    Mux,
    /// See [`ReelError::Validation`].
    Validation,
    /// See [`ReelError::Other`].
    Other,
}

impl ReelError {
    /// Build a [`ReelError::Parse`] value.
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            reason: reason.into(),
        }
    }

    /// Build a [`ReelError::Decode`] value.
    pub fn decode(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`ReelError::Font`] value.
    pub fn font(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::Font {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`ReelError::Writer`] value.
    pub fn writer(msg: impl Into<String>) -> Self {
        Self::Writer(msg.into())
    }

    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Return the stage tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Mismatch { .. } => ErrorKind::Mismatch,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Font { .. } => ErrorKind::Font,
            Self::Writer(_) => ErrorKind::Writer,
            Self::Mux { .. } => ErrorKind::Mux,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Other(_) => ErrorKind::Other,
        }
    }
}

fn display_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
