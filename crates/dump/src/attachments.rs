//! Attachment records: `file_id<TAB>json` per line.
//!
//! The JSON is a positional array of up to four elements:
//!
//! | index | contents |
//! |-------|----------|
//! | 0 | fonts |
//! | 1 | subtitle tracks (array of objects) |
//! | 2 | chapter ids |
//! | 3 | tag ids |
//!
//! Only the subtitle array is of interest here.

use crate::error::{ErrorKind, Result};
use crate::models::SubtitleTrack;
use derive_more::Display;
use exn::ResultExt;
use serde_json::Value;
use std::io::{BufRead, Lines};

const SEPARATOR: char = '\t';
const SUBTITLES_POSITION: usize = 1;

/// Why a line produced nothing at all, not even a file id.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    #[display("missing tab separator")]
    MissingSeparator,
    #[display("malformed JSON")]
    MalformedJson,
}

/// The result of decoding one attachments line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The record carries a non-empty subtitle array.
    ///
    /// `tracks` holds the object entries in source order; `dropped` counts the
    /// entries that weren't objects. `tracks` may be empty if nothing was an
    /// object.
    Subtitles {
        file_id: String,
        tracks: Vec<SubtitleTrack>,
        dropped: usize,
    },
    /// Well-formed record, but the subtitle array is missing, `null`, not an
    /// array, or empty.
    NoSubtitles { file_id: String },
    Skipped(SkipReason),
}

/// Decode one line of the attachments dump.
///
/// # Examples
///
/// ```
/// use subindex_dump::{LineOutcome, SkipReason, parse_line};
///
/// let outcome = parse_line("F1\t[null, [{\"lang\": \"eng\", \"codec\": \"srt\"}]]");
/// assert!(matches!(outcome, LineOutcome::Subtitles { ref tracks, .. } if tracks[0].lang == "eng"));
///
/// assert!(matches!(parse_line("F2\t[null, []]"), LineOutcome::NoSubtitles { .. }));
/// assert_eq!(parse_line("F4\tNOT_JSON"), LineOutcome::Skipped(SkipReason::MalformedJson));
/// ```
pub fn parse_line(line: &str) -> LineOutcome {
    let Some((file_id, json)) = line.trim().split_once(SEPARATOR) else {
        return LineOutcome::Skipped(SkipReason::MissingSeparator);
    };
    let file_id = file_id.to_string();
    let record: Value = match serde_json::from_str(json) {
        Ok(record) => record,
        Err(err) => {
            tracing::trace!(file_id = %file_id, error = %err, "Skipping attachment record with malformed JSON");
            return LineOutcome::Skipped(SkipReason::MalformedJson);
        },
    };
    let subtitles = match record.as_array().and_then(|record| record.get(SUBTITLES_POSITION)) {
        Some(Value::Array(subtitles)) if !subtitles.is_empty() => subtitles,
        _ => return LineOutcome::NoSubtitles { file_id },
    };
    let tracks: Vec<SubtitleTrack> =
        subtitles.iter().filter_map(Value::as_object).map(SubtitleTrack::from_entry).collect();
    let dropped = subtitles.len() - tracks.len();
    if dropped > 0 {
        tracing::trace!(file_id = %file_id, dropped, "Ignoring subtitle entries that aren't objects");
    }
    LineOutcome::Subtitles { file_id, tracks, dropped }
}

/// Streams [`LineOutcome`]s from an attachments dump.
pub struct Attachments<R> {
    lines: Lines<R>,
    line: usize,
}
impl<R: BufRead> Attachments<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }
}
impl<R: BufRead> Iterator for Attachments<R> {
    type Item = Result<LineOutcome>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        self.line += 1;
        Some(line.map(|line| parse_line(&line)).or_raise(|| ErrorKind::Read(self.line)))
    }
}
