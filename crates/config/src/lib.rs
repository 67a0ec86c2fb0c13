//! Layered configuration for the index builder.
//!
//! Sources are merged in order, later sources overriding earlier ones:
//!
//! 1. Built-in defaults (the `db_raw/` dumps and `data/` outputs)
//! 2. An optional TOML file, `subindex.toml` in the working directory
//! 3. Environment variables prefixed with `SUBINDEX_`, nested with `__`
//!    (e.g. `SUBINDEX_INPUTS__TORRENTS=/dumps/torrents-latest.txt.xz`)

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use subindex_compress::Compression;

pub const DEFAULT_CONFIG_FILE: &str = "subindex.toml";
pub const ENV_PREFIX: &str = "SUBINDEX_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub inputs: Inputs,
    #[serde(default)]
    pub output: Output,
}

/// Locations of the three database dumps.
///
/// Paths ending in a compression extension are decompressed while reading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Inputs {
    pub torrents: PathBuf,
    pub files: PathBuf,
    pub attachments: PathBuf,
}
impl Default for Inputs {
    fn default() -> Self {
        Self {
            torrents: PathBuf::from("db_raw/torrents-latest.txt"),
            files: PathBuf::from("db_raw/files-latest.txt"),
            attachments: PathBuf::from("db_raw/attachments-latest.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Output {
    /// Compressed index artifact; the extension picks the compression format.
    pub index: PathBuf,
    /// Human-readable summary document.
    pub summary: PathBuf,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            index: PathBuf::from("data/subtitles_index.json.gz"),
            summary: PathBuf::from("data/metadata.json"),
        }
    }
}

impl Config {
    /// Load from the default file in the working directory plus environment.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load using a specific TOML file. A missing file is not an error; the
    /// defaults and environment still apply.
    #[tracing::instrument(skip_all, fields(file = %path.as_ref().display()))]
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_figment(Self::figment(path))
    }

    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(?config, "Configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("inputs.torrents", &self.inputs.torrents),
            ("inputs.files", &self.inputs.files),
            ("inputs.attachments", &self.inputs.attachments),
            ("output.index", &self.output.index),
            ("output.summary", &self.output.summary),
        ];
        for (field, path) in paths {
            if path.as_os_str().is_empty() {
                exn::bail!(ErrorKind::Invalid { field, reason: "path is empty".to_string() });
            }
        }
        if Compression::from_path(&self.output.index) == Compression::None {
            exn::bail!(ErrorKind::Invalid {
                field: "output.index",
                reason: format!("{} has no compression extension", self.output.index.display()),
            });
        }
        if self.output.index == self.output.summary {
            exn::bail!(ErrorKind::Invalid {
                field: "output.summary",
                reason: "must differ from output.index".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.inputs.attachments, Path::new("db_raw/attachments-latest.txt"));
        assert_eq!(config.output.index, Path::new("data/subtitles_index.json.gz"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from("does-not-exist.toml").unwrap();
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "subindex.toml",
                r#"
                [inputs]
                torrents = "dumps/torrents-latest.txt.xz"
                files = "dumps/files-latest.txt.xz"

                [output]
                summary = "out/metadata.json"
                "#,
            )?;
            jail.set_env("SUBINDEX_INPUTS__FILES", "override/files.txt");
            let config = Config::load().unwrap();
            assert_eq!(config.inputs.torrents, Path::new("dumps/torrents-latest.txt.xz"));
            assert_eq!(config.inputs.files, Path::new("override/files.txt"));
            // Untouched keys keep their defaults.
            assert_eq!(config.inputs.attachments, Path::new("db_raw/attachments-latest.txt"));
            assert_eq!(config.output.index, Path::new("data/subtitles_index.json.gz"));
            assert_eq!(config.output.summary, Path::new("out/metadata.json"));
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file() {
        Jail::expect_with(|jail| {
            jail.create_file("subindex.toml", "[inputs\ntorrents = ")?;
            let err = Config::load().unwrap_err();
            assert_eq!(*err, ErrorKind::Load);
            Ok(())
        });
    }

    #[rstest]
    #[case("data/index.json", "output.index")]
    #[case("", "output.index")]
    #[case("data/metadata.json.gz", "output.summary")]
    fn test_invalid_output(#[case] index: &str, #[case] field: &'static str) {
        let config = Config {
            output: Output {
                index: PathBuf::from(index),
                summary: PathBuf::from("data/metadata.json.gz"),
            },
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { field: f, .. } if *f == field));
    }
}
