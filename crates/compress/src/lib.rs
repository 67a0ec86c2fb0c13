//! Compression detection and streaming codecs.
//!
//! AnimeTosho publishes its database dumps compressed, and the subtitle index
//! itself is written compressed. This crate wraps the codecs behind a single
//! [`Compression`] enum providing:
//!
//! - **Format detection** from file extensions ([`Compression::from_path`]) or
//!   magic bytes ([`Compression::from_magic_bytes`], [`Compression::sniff`])
//! - **Streaming decompression** of readers ([`Compression::reader`])
//! - **Streaming compression** of writers via [`Encoder`], which must be
//!   [finished](Encoder::finish) so that trailer write failures are reported
//!
//! Bzip2 and Gzip are always available. XZ is behind the `xz` feature.

mod detect;
pub mod error;
mod stream;

pub use crate::stream::Encoder;

/// A supported compression format.
///
/// Defaults to [`None`](Self::None) (uncompressed).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compression {
    /// Uncompressed
    #[default]
    None,
    /// Bzip2 compression (.bz2)
    Bzip2,
    /// Gzip compression (.gz)
    Gzip,
    /// XZ/LZMA compression (.xz)
    #[cfg(feature = "xz")]
    Xz,
}

impl Compression {
    /// Returns the short name for displaying to the user.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Bzip2 => "bzip2",
            Compression::Gzip => "gzip",
            #[cfg(feature = "xz")]
            Compression::Xz => "xz",
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;

    #[test]
    fn compression_default() {
        assert_eq!(Compression::default(), Compression::None);
    }

    #[test]
    fn compression_display() {
        assert_eq!(Compression::Gzip.to_string(), "gzip");
        assert_eq!(Compression::None.to_string(), "none");
    }
}
