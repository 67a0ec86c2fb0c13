//! Readers for the AnimeTosho database dumps.
//!
//! Three dumps feed the subtitle index:
//!
//! - **torrents**: tab-separated table, one row per torrent ([`load_torrents`])
//! - **files**: tab-separated table, one row per file in a torrent ([`load_files`])
//! - **attachments**: one `file_id<TAB>json` record per line describing the
//!   fonts, subtitle tracks, chapters and tags embedded in a file
//!   ([`Attachments`])
//!
//! Every reader is lenient about individual records (short rows, broken JSON)
//! and strict about the dump as a whole: failing to open or read to the end is
//! an [`Error`](error::Error).

mod attachments;
pub mod error;
mod files;
mod models;
mod table;
mod torrents;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use subindex_compress::Compression;

pub use crate::attachments::{Attachments, LineOutcome, SkipReason, parse_line};
pub use crate::files::{FileEntry, Files, load_files};
pub use crate::models::{Identifier, SubtitleTrack};
pub use crate::table::{DELIMITER, Row, TableReader, TableStats};
pub use crate::torrents::{Torrents, load_torrents};

/// Open a dump for line-oriented reading, decompressing it on the fly when the
/// file extension names a compression format.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display(), compression))]
pub fn open(path: impl AsRef<Path>) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let file = File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
    let compression = Compression::from_path(path);
    tracing::Span::current().record("compression", tracing::field::display(compression));
    Ok(compression.reader(BufReader::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    #[test]
    fn test_open_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torrents-latest.txt");
        let err = open(&path).err().unwrap();
        assert_eq!(*err, ErrorKind::Open(path));
    }

    #[test]
    fn test_open_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files-latest.txt.gz");
        let mut encoder = Compression::Gzip.encoder(File::create(&path).unwrap());
        encoder.write_all(b"id\ttorrent_id\n").unwrap();
        encoder.finish().unwrap();

        let mut contents = String::new();
        open(&path).unwrap().read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "id\ttorrent_id\n");
    }
}
