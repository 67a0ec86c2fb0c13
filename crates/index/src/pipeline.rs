use crate::builder::{AttachmentStats, IndexBuilder};
use crate::error::{ErrorKind, Result};
use crate::model::Summary;
use crate::persist::{stage_index, stage_summary};
use exn::ResultExt;
use subindex_config::Config;
use subindex_dump::{Attachments, TableStats, load_files, load_torrents, open};
use tracing::instrument;

/// Record counters from every stage of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub torrents: TableStats,
    pub files: TableStats,
    pub attachments: AttachmentStats,
}

/// What a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub summary: Summary,
    pub stats: BuildStats,
}

/// Run the whole build: load torrents, load files, extract subtitle tracks
/// from attachments, then write the index and summary.
///
/// Each dump is read to the end and closed before the next one is opened.
/// Nothing is written unless every dump was read successfully, and neither
/// output replaces its previous version until both have been written.
#[instrument(skip_all)]
pub fn build(config: &Config) -> Result<Report> {
    let inputs = &config.inputs;

    let (torrents, torrent_stats) =
        open(&inputs.torrents).and_then(load_torrents).or_raise(|| ErrorKind::Input("torrents"))?;

    let (files, file_stats) = open(&inputs.files).and_then(load_files).or_raise(|| ErrorKind::Input("files"))?;

    let mut builder = IndexBuilder::new();
    {
        let reader = open(&inputs.attachments).or_raise(|| ErrorKind::Input("attachments"))?;
        for outcome in Attachments::new(reader) {
            builder.ingest(outcome.or_raise(|| ErrorKind::Input("attachments"))?);
        }
    }
    let attachment_stats = *builder.stats();
    tracing::info!(
        files = attachment_stats.with_subtitles,
        tracks = builder.total_tracks(),
        skipped = attachment_stats.skipped(),
        dropped = attachment_stats.dropped_entries,
        "Extracted subtitle tracks"
    );

    let index = builder.finish(torrents, files)?;
    let summary = index.summary();
    let staged_index = stage_index(&index, &config.output.index)?;
    let staged_summary = stage_summary(&summary, &config.output.summary)?;
    staged_index.commit()?;
    staged_summary.commit()?;
    tracing::info!(
        index = %config.output.index.display(),
        summary = %config.output.summary.display(),
        "Outputs written"
    );

    Ok(Report {
        summary,
        stats: BuildStats {
            torrents: torrent_stats,
            files: file_stats,
            attachments: attachment_stats,
        },
    })
}
