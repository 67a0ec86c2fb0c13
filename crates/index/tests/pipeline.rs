use std::fs;
use std::io::Write;
use std::path::Path;
use subindex_compress::Compression;
use subindex_config::{Config, Inputs, Output};
use subindex_dump::{Identifier, TableStats};
use subindex_index::{Summary, build, error::ErrorKind, read_index};
use tempfile::TempDir;

const TORRENTS: &str = "\
id\ttosho_id\tnyaa_id\tanidex_id\tname\ttitle\tlink
1\t10\t\t\tshow-01\t[Group] Show - 01\thttps://example.org/1
2\t11\t\t\tshow-02\t[Group] Show - 02\thttps://example.org/2
3\t12
";

const FILES: &str = "\
id\ttorrent_id\tis_archive\tfilename\tfilesize
100\t1\t0\t[Group] Show - 01.mkv\t734003200
101\t2\t0\t[Group] Show - 02.mkv\t734003200
102\t2\t0\t[Group] Show - 02 (NCED).mkv\t104857600
103\t2\t0
";

const ATTACHMENTS: &str = r#"100	[[{"name":"font.ttf"}], [{"lang":"eng","codec":"ASS","tracknum":2,"_afid":5001}, {"lang":"jpn","codec":"ASS","tracknum":3,"_afid":5002}], null, [7]]
101	[null, [{"lang":"eng","codec":"SRT","tracknum":2,"_afid":5003}, "junk"]]
102	[null, []]
104	NOT_JSON
105	[null, [{"codec":"PGS"}]]
"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn config(dir: &TempDir) -> Config {
    let raw = dir.path().join("db_raw");
    fs::create_dir_all(&raw).unwrap();
    Config {
        inputs: Inputs {
            torrents: write(&raw, "torrents-latest.txt", TORRENTS),
            files: write(&raw, "files-latest.txt", FILES),
            attachments: write(&raw, "attachments-latest.txt", ATTACHMENTS),
        },
        output: Output {
            index: dir.path().join("data/subtitles_index.json.gz"),
            summary: dir.path().join("data/metadata.json"),
        },
    }
}

#[test]
fn test_build() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let report = build(&config).unwrap();

    assert_eq!(report.stats.torrents, TableStats { rows: 3, skipped: 1 });
    assert_eq!(report.stats.files, TableStats { rows: 4, skipped: 1 });
    assert_eq!(report.stats.attachments.lines, 5);
    assert_eq!(report.stats.attachments.malformed_json, 1);
    assert_eq!(report.stats.attachments.dropped_entries, 1);

    let index = read_index(&config.output.index).unwrap();
    assert_eq!(index.torrents["1"], "[Group] Show - 01");
    assert_eq!(index.files["102"].filename, "[Group] Show - 02 (NCED).mkv");
    assert!(!index.files.contains_key("103"));

    assert_eq!(index.subtitles_only.keys().collect::<Vec<_>>(), ["100", "101", "105"]);
    assert_eq!(index.subtitles_only["100"][1].afid, Some(Identifier::Integer(5002)));
    assert_eq!(index.subtitles_only["105"][0].lang, "und");
    assert!(!index.subtitles_only.contains_key("102"));
    assert!(!index.subtitles_only.contains_key("104"));

    let eng: Vec<&str> = index.lang_index["eng"].iter().map(|(file, _)| file.as_str()).collect();
    assert_eq!(eng, ["100", "101"]);
    assert_eq!(index.all_languages, ["eng", "jpn", "und"]);
    assert_eq!(index.total_subtitle_tracks, 4);
    assert!(index.updated.ends_with('Z'));

    let summary: Summary = serde_json::from_str(&fs::read_to_string(&config.output.summary).unwrap()).unwrap();
    assert_eq!(summary, report.summary);
    assert_eq!(summary.updated, index.updated);
    // 105 isn't in the file table, so only torrents 1 and 2 are counted.
    assert_eq!(summary.torrents_with_subtitles, 2);
    assert_eq!(summary.files_with_subtitles, 3);
    assert_eq!(summary.total_subtitle_tracks, 4);
    assert_eq!(summary.available_languages, ["eng", "jpn", "und"]);
}

#[test]
fn test_rebuild_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    build(&config).unwrap();
    let first = read_index(&config.output.index).unwrap();
    build(&config).unwrap();
    let mut second = read_index(&config.output.index).unwrap();

    second.updated = first.updated.clone();
    assert_eq!(first, second);
}

#[test]
fn test_compressed_dumps() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    let compressed = dir.path().join("db_raw/attachments-latest.txt.gz");
    let mut encoder = Compression::Gzip.encoder(fs::File::create(&compressed).unwrap());
    encoder.write_all(ATTACHMENTS.as_bytes()).unwrap();
    encoder.finish().unwrap();
    config.inputs.attachments = compressed;

    let report = build(&config).unwrap();
    assert_eq!(report.summary.total_subtitle_tracks, 4);
}

#[test]
fn test_missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    config.inputs.attachments = dir.path().join("db_raw/missing.txt");

    let err = build(&config).unwrap_err();
    assert_eq!(*err, ErrorKind::Input("attachments"));
    assert!(!config.output.index.exists());
    assert!(!config.output.summary.exists());
}

#[test]
fn test_failed_summary_keeps_previous_index() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&dir);
    fs::create_dir_all(dir.path().join("data")).unwrap();
    fs::write(&config.output.index, b"previous").unwrap();
    // A file where the summary's directory should be.
    let blocker = write(dir.path(), "blocker", "");
    config.output.summary = blocker.join("metadata.json");

    let err = build(&config).unwrap_err();
    assert!(matches!(&*err, ErrorKind::Write(_)));
    assert_eq!(fs::read(&config.output.index).unwrap(), b"previous");
    assert_eq!(fs::read_dir(dir.path().join("data")).unwrap().count(), 1);
}
