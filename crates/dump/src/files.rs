use crate::error::Result;
use crate::table::{TableReader, TableStats};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::instrument;

/// File id to its parent torrent and filename.
pub type Files = BTreeMap<String, FileEntry>;

const ID_COLUMN: usize = 0;
const TORRENT_COLUMN: usize = 1;
const FILENAME_COLUMN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub torrent_id: String,
    pub filename: String,
}

/// Load the file table.
///
/// Column positions are fixed; the header is read and ignored. Rows without
/// a filename column are skipped.
#[instrument(skip_all)]
pub fn load_files(reader: impl BufRead) -> Result<(Files, TableStats)> {
    let table = TableReader::new(reader)?;
    let mut files = Files::new();
    let mut stats = TableStats::default();
    for row in table {
        let mut row = row?;
        stats.rows += 1;
        let (Some(filename), Some(torrent_id), Some(id)) =
            (row.take(FILENAME_COLUMN), row.take(TORRENT_COLUMN), row.take(ID_COLUMN))
        else {
            tracing::trace!(fields = row.len(), "Skipping short file row");
            stats.skipped += 1;
            continue;
        };
        files.insert(id, FileEntry { torrent_id, filename });
    }
    tracing::info!(files = files.len(), skipped = stats.skipped, "Loaded file mapping");
    Ok((files, stats))
}
