//! Writing and reloading the index artifact and its summary document.
//!
//! Both outputs are written to a temporary file beside the destination and
//! renamed into place, so a failed write leaves the previous build intact.
//! [`stage_index`] and [`stage_summary`] stop short of the rename, which lets
//! a build commit both outputs only once both were written.

use crate::error::{ErrorKind, Result};
use crate::model::{SubtitleIndex, Summary};
use exn::ResultExt;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use subindex_compress::Compression;
use tempfile::NamedTempFile;
use tracing::instrument;

/// Mode given to outputs on Unix, before the umask.
#[cfg(unix)]
const OUTPUT_MODE: u32 = 0o644;

/// A fully written output that isn't visible at its destination yet.
///
/// Dropping it without [`commit`](Staged::commit) removes the temporary file.
#[derive(Debug)]
pub struct Staged {
    temp: NamedTempFile,
    path: PathBuf,
}
impl Staged {
    /// Rename the temporary file over the destination.
    pub fn commit(self) -> Result<()> {
        let Staged { temp, path } = self;
        temp.persist(&path).or_raise(|| ErrorKind::Write(path.clone()))?;
        tracing::debug!(path = %path.display(), "Output committed");
        Ok(())
    }
}

/// Serialize the whole index as JSON, compressed according to the file
/// extension of `path`.
pub fn write_index(index: &SubtitleIndex, path: &Path) -> Result<()> {
    stage_index(index, path)?.commit()
}

/// Write the summary document as indented JSON.
pub fn write_summary(summary: &Summary, path: &Path) -> Result<()> {
    stage_summary(summary, path)?.commit()
}

#[instrument(skip(index), fields(path = %path.display(), compression = %Compression::from_path(path)))]
pub fn stage_index(index: &SubtitleIndex, path: &Path) -> Result<Staged> {
    let staged = stage(path, |file| {
        let mut encoder = Compression::from_path(path).encoder(BufWriter::new(file));
        serde_json::to_writer(&mut encoder, index).or_raise(|| ErrorKind::Serialize)?;
        encoder.finish().or_raise(|| ErrorKind::Write(path.to_path_buf()))?;
        Ok(())
    })?;
    tracing::info!(tracks = index.total_subtitle_tracks, "Index staged");
    Ok(staged)
}

#[instrument(skip(summary), fields(path = %path.display()))]
pub fn stage_summary(summary: &Summary, path: &Path) -> Result<Staged> {
    stage(path, |file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, summary).or_raise(|| ErrorKind::Serialize)?;
        writer.write_all(b"\n").or_raise(|| ErrorKind::Write(path.to_path_buf()))?;
        writer.flush().or_raise(|| ErrorKind::Write(path.to_path_buf()))
    })
}

/// Load a previously written index, detecting its compression from the file
/// contents, and check that it is internally consistent.
#[instrument(fields(path = %path.display()))]
pub fn read_index(path: &Path) -> Result<SubtitleIndex> {
    let file = File::open(path).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    let mut reader = BufReader::new(file);
    let compression = Compression::sniff(&mut reader).or_raise(|| ErrorKind::Read(path.to_path_buf()))?;
    tracing::debug!(%compression, "Detected index compression");
    let index: SubtitleIndex =
        serde_json::from_reader(compression.reader(reader)).or_raise(|| ErrorKind::Serialize)?;
    index.verify()?;
    Ok(index)
}

fn stage(path: &Path, write: impl FnOnce(&mut File) -> Result<()>) -> Result<Staged> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).or_raise(|| ErrorKind::Write(parent.to_path_buf()))?;
    let mut temp = temp_file_in(parent).or_raise(|| ErrorKind::Write(path.to_path_buf()))?;
    write(temp.as_file_mut())?;
    Ok(Staged {
        temp,
        path: path.to_path_buf(),
    })
}

fn temp_file_in(dir: &Path) -> io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(OUTPUT_MODE));
    }
    builder.tempfile_in(dir)
}
