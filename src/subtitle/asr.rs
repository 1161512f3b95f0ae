//! Speech-recognizer transcripts.
//!
//! The narration step produces a JSON document with sentence and word timings in seconds:
//! `{ "sentences": [{ "start", "end", "text" }], "words": [{ "start", "end", "word" }] }`.

use std::path::Path;
use std::time::Duration;

use crate::foundation::error::{ReelError, ReelResult};
use crate::subtitle::srt::Cue;

/// One recognized sentence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AsrSentence {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Sentence text.
    pub text: String,
}

/// One recognized word.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AsrWord {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// The word.
    pub word: String,
}

/// Full transcript as emitted by the recognizer.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AsrTranscript {
    /// Sentence timings, one scene each.
    pub sentences: Vec<AsrSentence>,
    /// Word timings.
    #[serde(default)]
    pub words: Vec<AsrWord>,
}

/// Which transcript entries become cues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueGranularity {
    /// One cue per sentence.
    #[default]
    Sentence,
    /// One cue per word.
    Word,
}

impl AsrTranscript {
    /// Read and parse a transcript file.
    pub fn from_path(path: &Path) -> ReelResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReelError::parse(0, format!("read '{}': {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Parse a transcript document.
    pub fn from_json_str(text: &str) -> ReelResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ReelError::parse(e.line(), format!("invalid transcript json: {e}")))
    }

    /// Convert entries to cues with 1-based indices in transcript order.
    pub fn to_cues(&self, granularity: CueGranularity) -> ReelResult<Vec<Cue>> {
        let entries: Vec<(f64, f64, &str)> = match granularity {
            CueGranularity::Sentence => self
                .sentences
                .iter()
                .map(|s| (s.start, s.end, s.text.as_str()))
                .collect(),
            CueGranularity::Word => self
                .words
                .iter()
                .map(|w| (w.start, w.end, w.word.as_str()))
                .collect(),
        };

        entries
            .into_iter()
            .enumerate()
            .map(|(i, (start, end, text))| {
                let index = u32::try_from(i + 1)
                    .map_err(|_| ReelError::parse(0, "too many transcript entries"))?;
                let start = secs_to_duration(start, index)?;
                let end = secs_to_duration(end, index)?;
                if end <= start {
                    return Err(ReelError::parse(
                        0,
                        format!("transcript entry {index} must end after it starts"),
                    ));
                }
                let text = text.trim();
                if text.is_empty() {
                    return Err(ReelError::parse(
                        0,
                        format!("transcript entry {index} has no text"),
                    ));
                }
                Ok(Cue {
                    index,
                    start,
                    end,
                    text: text.to_string(),
                })
            })
            .collect()
    }
}

fn secs_to_duration(secs: f64, index: u32) -> ReelResult<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|e| {
        ReelError::parse(0, format!("transcript entry {index} has invalid time {secs}: {e}"))
    })
}

/// Sentence-level cues from a transcript file.
pub fn cues_from_asr_json(path: &Path) -> ReelResult<Vec<Cue>> {
    AsrTranscript::from_path(path)?.to_cues(CueGranularity::Sentence)
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/asr.rs"]
mod tests;
