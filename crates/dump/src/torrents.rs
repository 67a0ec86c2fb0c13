use crate::error::Result;
use crate::table::{TableReader, TableStats};
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::instrument;

/// Torrent id to torrent title.
pub type Torrents = BTreeMap<String, String>;

const ID_COLUMN: usize = 0;
const TITLE_HEADER: &str = "title";
/// Where the title lives in the published dump layout, used when the header
/// doesn't name it.
const TITLE_FALLBACK_COLUMN: usize = 4;

/// Load the torrent title table.
///
/// Rows too short to reach both the id and title columns are skipped. A
/// repeated id keeps the last title seen.
#[instrument(skip_all)]
pub fn load_torrents(reader: impl BufRead) -> Result<(Torrents, TableStats)> {
    let table = TableReader::new(reader)?;
    let title_column = table.column(TITLE_HEADER).unwrap_or(TITLE_FALLBACK_COLUMN);
    let required = ID_COLUMN.max(title_column) + 1;
    tracing::debug!(title_column, "Resolved torrent title column");

    let mut torrents = Torrents::new();
    let mut stats = TableStats::default();
    for row in table {
        let row = row?;
        stats.rows += 1;
        if row.len() < required {
            tracing::trace!(fields = row.len(), required, "Skipping short torrent row");
            stats.skipped += 1;
            continue;
        }
        if let (Some(id), Some(title)) = (row.get(ID_COLUMN), row.get(title_column)) {
            torrents.insert(id.to_string(), title.to_string());
        }
    }
    tracing::info!(torrents = torrents.len(), skipped = stats.skipped, "Loaded torrent titles");
    Ok((torrents, stats))
}
