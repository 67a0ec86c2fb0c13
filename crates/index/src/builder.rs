use crate::error::Result;
use crate::model::{LangIndex, SubtitleIndex, SubtitlesOnly, timestamp};
use subindex_dump::{Files, LineOutcome, SkipReason, SubtitleTrack, Torrents};
use time::UtcDateTime;

/// Line counters for the attachments dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttachmentStats {
    pub lines: usize,
    /// Records with a non-empty subtitle array.
    pub with_subtitles: usize,
    /// Records whose subtitle array is missing, `null` or empty.
    pub without_subtitles: usize,
    pub missing_separator: usize,
    pub malformed_json: usize,
    /// Subtitle array entries that weren't objects.
    pub dropped_entries: usize,
}
impl AttachmentStats {
    pub fn skipped(&self) -> usize {
        self.missing_separator + self.malformed_json
    }
}

/// Accumulates subtitle tracks in a single forward pass over the attachments
/// dump, then freezes them into a [`SubtitleIndex`].
///
/// Every track is filed twice, once under its file and once under its
/// language; the language list is derived from the language index so the two
/// can't drift apart.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    subtitles_only: SubtitlesOnly,
    lang_index: LangIndex,
    total: usize,
    stats: AttachmentStats,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append tracks to a file, in order. Nothing is recorded for an empty
    /// list, so a file never maps to zero tracks.
    ///
    /// A file id seen on several attachment lines accumulates the tracks of
    /// all of them.
    pub fn add_tracks(&mut self, file_id: &str, tracks: Vec<SubtitleTrack>) {
        if tracks.is_empty() {
            return;
        }
        self.total += tracks.len();
        for track in &tracks {
            self.lang_index
                .entry(track.lang.clone())
                .or_default()
                .push((file_id.to_string(), track.clone()));
        }
        self.subtitles_only.entry(file_id.to_string()).or_default().extend(tracks);
    }

    /// Route one decoded attachments line.
    pub fn ingest(&mut self, outcome: LineOutcome) {
        self.stats.lines += 1;
        match outcome {
            LineOutcome::Subtitles { file_id, tracks, dropped } => {
                self.stats.with_subtitles += 1;
                self.stats.dropped_entries += dropped;
                self.add_tracks(&file_id, tracks);
            },
            LineOutcome::NoSubtitles { .. } => self.stats.without_subtitles += 1,
            LineOutcome::Skipped(SkipReason::MissingSeparator) => self.stats.missing_separator += 1,
            LineOutcome::Skipped(SkipReason::MalformedJson) => self.stats.malformed_json += 1,
        }
    }

    pub fn total_tracks(&self) -> usize {
        self.total
    }

    pub fn stats(&self) -> &AttachmentStats {
        &self.stats
    }

    /// Stamp the current time and produce the finished index.
    pub fn finish(self, torrents: Torrents, files: Files) -> Result<SubtitleIndex> {
        self.finish_at(torrents, files, UtcDateTime::now())
    }

    pub(crate) fn finish_at(self, torrents: Torrents, files: Files, at: UtcDateTime) -> Result<SubtitleIndex> {
        Ok(SubtitleIndex {
            torrents,
            files,
            all_languages: self.lang_index.keys().cloned().collect(),
            subtitles_only: self.subtitles_only,
            lang_index: self.lang_index,
            total_subtitle_tracks: self.total,
            updated: timestamp(at)?,
        })
    }
}

impl Extend<LineOutcome> for IndexBuilder {
    fn extend<I: IntoIterator<Item = LineOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.ingest(outcome);
        }
    }
}
