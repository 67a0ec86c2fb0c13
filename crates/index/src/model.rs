use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use subindex_dump::{Files, SubtitleTrack, Torrents};
use time::UtcDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// File id to every subtitle track found in that file, in dump order.
pub type SubtitlesOnly = BTreeMap<String, Vec<SubtitleTrack>>;
/// A track together with the file it belongs to.
pub type LangEntry = (String, SubtitleTrack);
/// Language code to every track in that language, in dump order.
pub type LangIndex = BTreeMap<String, Vec<LangEntry>>;

/// ISO-8601 in UTC with microseconds and a `Z` suffix.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

pub(crate) fn timestamp(at: UtcDateTime) -> Result<String> {
    at.format(TIMESTAMP_FORMAT).or_raise(|| ErrorKind::Serialize)
}

/// The persisted subtitle index.
///
/// Only files with at least one subtitle track appear in
/// [`subtitles_only`](Self::subtitles_only); the torrent and file tables are
/// carried in full so that consumers can resolve titles and filenames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleIndex {
    pub torrents: Torrents,
    pub files: Files,
    pub subtitles_only: SubtitlesOnly,
    pub lang_index: LangIndex,
    /// Sorted, distinct.
    pub all_languages: Vec<String>,
    pub total_subtitle_tracks: usize,
    /// Build completion time, ISO-8601 UTC with microseconds and a `Z` suffix.
    pub updated: String,
}

impl SubtitleIndex {
    /// Derive the human-readable summary document.
    ///
    /// Files with subtitles that are missing from the file table can't be
    /// attributed to a torrent and don't count towards
    /// `torrents_with_subtitles`.
    pub fn summary(&self) -> Summary {
        let mut unattributed = 0usize;
        let torrents: BTreeSet<&str> = self
            .subtitles_only
            .keys()
            .filter_map(|file_id| {
                let entry = self.files.get(file_id).map(|entry| entry.torrent_id.as_str());
                if entry.is_none() {
                    unattributed += 1;
                }
                entry
            })
            .collect();
        if unattributed > 0 {
            tracing::warn!(unattributed, "Files with subtitles are missing from the file table");
        }
        Summary {
            updated: self.updated.clone(),
            torrents_with_subtitles: torrents.len(),
            files_with_subtitles: self.subtitles_only.len(),
            total_subtitle_tracks: self.total_subtitle_tracks,
            available_languages: self.all_languages.clone(),
        }
    }

    /// Check the structural rules every index built by
    /// [`IndexBuilder`](crate::IndexBuilder) satisfies.
    pub fn verify(&self) -> Result<()> {
        if let Some((file_id, _)) = self.subtitles_only.iter().find(|(_, tracks)| tracks.is_empty()) {
            exn::bail!(ErrorKind::Inconsistent(format!("file {file_id} has an empty track list")));
        }
        let by_file: usize = self.subtitles_only.values().map(Vec::len).sum();
        let by_lang: usize = self.lang_index.values().map(Vec::len).sum();
        if by_file != self.total_subtitle_tracks || by_lang != self.total_subtitle_tracks {
            exn::bail!(ErrorKind::Inconsistent(format!(
                "track totals disagree: {} recorded, {by_file} by file, {by_lang} by language",
                self.total_subtitle_tracks
            )));
        }
        if !self.all_languages.iter().eq(self.lang_index.keys()) {
            exn::bail!(ErrorKind::Inconsistent("language list doesn't match the language index".to_string()));
        }
        for (lang, entries) in &self.lang_index {
            if let Some((file_id, _)) = entries.iter().find(|(_, track)| &track.lang != lang) {
                exn::bail!(ErrorKind::Inconsistent(format!("track of {file_id} filed under {lang}")));
            }
        }
        Ok(())
    }
}

/// Summary document written next to the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub updated: String,
    pub torrents_with_subtitles: usize,
    pub files_with_subtitles: usize,
    pub total_subtitle_tracks: usize,
    pub available_languages: Vec<String>,
}
