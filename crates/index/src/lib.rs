//! Subtitle track index built from AnimeTosho database dumps.
//!
//! The build is a single forward pass:
//!
//! 1. load torrent titles ([`subindex_dump::load_torrents`])
//! 2. load the file to torrent mapping ([`subindex_dump::load_files`])
//! 3. keep only the attachment records that carry subtitle tracks, filing
//!    every track under its file and under its language ([`IndexBuilder`])
//! 4. write the compressed index and a summary document ([`write_index`],
//!    [`write_summary`])
//!
//! [`build`] runs all four against a [`Config`](subindex_config::Config).
//!
//! # Guarantees
//! For every [`SubtitleIndex`] produced here (checked by
//! [`SubtitleIndex::verify`]):
//! - no file maps to an empty track list;
//! - `total_subtitle_tracks` equals the number of tracks filed by file and
//!   the number filed by language;
//! - `all_languages` is exactly the sorted key set of `lang_index`.

mod builder;
pub mod error;
mod model;
mod persist;
mod pipeline;

pub use crate::builder::{AttachmentStats, IndexBuilder};
pub use crate::model::{LangEntry, LangIndex, SubtitleIndex, SubtitlesOnly, Summary};
pub use crate::persist::{Staged, read_index, stage_index, stage_summary, write_index, write_summary};
pub use crate::pipeline::{BuildStats, Report, build};
