use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// One timed caption entry.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Cue {
    /// 1-based position in the subtitle file.
    pub index: u32,
    /// Start time.
    #[serde(serialize_with = "serialize_secs")]
    pub start: Duration,
    /// End time.
    #[serde(serialize_with = "serialize_secs")]
    pub end: Duration,
    /// Caption text, lines joined with a single space.
    pub text: String,
}

impl Cue {
    /// `end - start`, saturating at zero.
    pub fn duration(&self) -> Duration {
        self.end.saturating_sub(self.start)
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// How malformed index or time tokens are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Malformed tokens, empty captions and non-positive durations are errors.
    #[default]
    Strict,
    /// Malformed tokens become zero; blocks whose index ends up zero are dropped.
    Lenient,
}

/// Read and parse an SRT file.
pub fn parse_srt_file(path: &Path, mode: ParseMode) -> ReelResult<Vec<Cue>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ReelError::parse(0, format!("read '{}': {e}", path.display())))?;
    parse_srt_str(&text, mode)
}

/// Parse SRT text into cues in file order.
///
/// A blank line closes the current block. Inside a block the first line is the index, the
/// second the time range, and every further line is caption text.
pub fn parse_srt_str(text: &str, mode: ParseMode) -> ReelResult<Vec<Cue>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut cues = Vec::new();
    let mut block = BlockBuilder::default();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            block.finish(mode, &mut cues)?;
            continue;
        }
        block.feed(line, line_no, mode)?;
    }
    block.finish(mode, &mut cues)?;

    Ok(cues)
}

#[derive(Default)]
struct BlockBuilder {
    first_line: usize,
    index: Option<u32>,
    range: Option<(Duration, Duration)>,
    text: Vec<String>,
}

impl BlockBuilder {
    fn feed(&mut self, line: &str, line_no: usize, mode: ParseMode) -> ReelResult<()> {
        if self.index.is_none() {
            self.first_line = line_no;
            self.index = Some(parse_index(line, line_no, mode)?);
        } else if self.range.is_none() {
            self.range = Some(parse_range(line, line_no, mode)?);
        } else {
            self.text.push(line.to_string());
        }
        Ok(())
    }

    fn finish(&mut self, mode: ParseMode, cues: &mut Vec<Cue>) -> ReelResult<()> {
        let block = std::mem::take(self);
        let Some(index) = block.index else {
            return Ok(());
        };
        if index == 0 {
            return Ok(());
        }

        let (start, end) = match (block.range, mode) {
            (Some(r), _) => r,
            (None, ParseMode::Lenient) => (Duration::ZERO, Duration::ZERO),
            (None, ParseMode::Strict) => {
                return Err(ReelError::parse(
                    block.first_line,
                    format!("cue {index} has no time range"),
                ));
            }
        };
        let text = block.text.join(" ");

        if mode == ParseMode::Strict {
            if end <= start {
                return Err(ReelError::parse(
                    block.first_line,
                    format!("cue {index} must end after it starts"),
                ));
            }
            if text.trim().is_empty() {
                return Err(ReelError::parse(
                    block.first_line,
                    format!("cue {index} has no caption text"),
                ));
            }
            if let Some(prev) = cues.last()
                && index <= prev.index
            {
                return Err(ReelError::parse(
                    block.first_line,
                    format!(
                        "cue indices must be strictly increasing ({} then {index})",
                        prev.index
                    ),
                ));
            }
        }

        cues.push(Cue {
            index,
            start,
            end,
            text,
        });
        Ok(())
    }
}

fn parse_index(line: &str, line_no: usize, mode: ParseMode) -> ReelResult<u32> {
    match (line.parse::<u32>(), mode) {
        (Ok(0), ParseMode::Strict) => Err(ReelError::parse(line_no, "cue index must be >= 1")),
        (Ok(v), _) => Ok(v),
        (Err(_), ParseMode::Lenient) => Ok(0),
        (Err(e), ParseMode::Strict) => Err(ReelError::parse(
            line_no,
            format!("invalid cue index '{line}': {e}"),
        )),
    }
}

fn parse_range(line: &str, line_no: usize, mode: ParseMode) -> ReelResult<(Duration, Duration)> {
    let parsed = line.split_once("-->").map(|(a, b)| {
        // Anything after the end timestamp (SRT position hints) is ignored.
        let b = b.split_whitespace().next().unwrap_or("");
        (parse_timestamp(a.trim()), parse_timestamp(b))
    });

    match (parsed, mode) {
        (Some((Some(start), Some(end))), _) => Ok((start, end)),
        (Some((start, end)), ParseMode::Lenient) => {
            Ok((start.unwrap_or_default(), end.unwrap_or_default()))
        }
        (None, ParseMode::Lenient) => Ok((Duration::ZERO, Duration::ZERO)),
        (_, ParseMode::Strict) => Err(ReelError::parse(
            line_no,
            format!("invalid time range '{line}'"),
        )),
    }
}

/// Parse `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`).
pub fn parse_timestamp(s: &str) -> Option<Duration> {
    let mut parts = s.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let sec_part = parts.next()?;
    if parts.next().is_some() || minutes >= 60 {
        return None;
    }

    let (secs, frac) = sec_part.split_once([',', '.']).unwrap_or((sec_part, "0"));
    let secs: u64 = secs.parse().ok()?;
    if secs >= 60 || frac.is_empty() || frac.len() > 3 || !frac.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let millis: u64 = format!("{frac:0<3}").parse().ok()?;

    Some(Duration::from_millis(
        ((hours * 60 + minutes) * 60 + secs) * 1000 + millis,
    ))
}

/// Format a duration as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_timestamp(d: Duration) -> String {
    let total_ms = d.as_millis();
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Render cues as SRT text.
pub fn to_srt_string(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            format_timestamp(cue.start),
            format_timestamp(cue.end),
            cue.text
        );
    }
    out
}

/// Write cues to an SRT file.
pub fn write_srt(cues: &[Cue], path: &Path) -> ReelResult<()> {
    std::fs::write(path, to_srt_string(cues))
        .with_context(|| format!("write subtitles '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/subtitle/srt.rs"]
mod tests;
