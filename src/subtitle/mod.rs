//! Caption sources: SRT files and speech-recognizer transcripts.

use std::path::Path;

use crate::foundation::error::ReelResult;

pub mod asr;
/// SRT parsing and writing.
pub mod srt;

pub use asr::{AsrTranscript, CueGranularity, cues_from_asr_json};
pub use srt::{Cue, ParseMode, format_timestamp, parse_srt_file, parse_srt_str, write_srt};

/// Load cues from `path`: `.json` files are read as transcripts, anything else as SRT.
#[tracing::instrument]
pub fn load_cues(path: &Path, mode: ParseMode) -> ReelResult<Vec<Cue>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let cues = if is_json {
        cues_from_asr_json(path)?
    } else {
        parse_srt_file(path, mode)?
    };
    tracing::debug!(count = cues.len(), "loaded cues");
    Ok(cues)
}
