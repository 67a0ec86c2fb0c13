//! Streaming Compression Operations

use crate::Compression;
use crate::error::{ErrorKind, Result};
use bzip2::{Compression as BzCompression, bufread::MultiBzDecoder, write::BzEncoder};
use exn::ResultExt;
use flate2::{Compression as GzCompression, bufread::MultiGzDecoder, write::GzEncoder};
use std::io::{self, BufRead, BufReader, Write};
#[cfg(feature = "xz")]
use xz2::{bufread::XzDecoder, write::XzEncoder};

// Use the highest compression level available for the formats; the index is
// written once per dump refresh and read many times.
const BZIP2_LEVEL: BzCompression = BzCompression::best();
const GZIP_LEVEL: GzCompression = GzCompression::best();
#[cfg(feature = "xz")]
const XZ_LEVEL: u32 = 9;

impl Compression {
    /// Wrap a buffered reader with the appropriate decompression layer.
    ///
    /// Concatenated (multi-member) streams are decoded in full, which is how
    /// `pigz` and `pbzip2` write large dumps.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::{BufRead, Cursor};
    /// use subindex_compress::Compression;
    ///
    /// let reader = Compression::None.reader(Cursor::new("id\ttitle\n1\tOne\n"));
    /// assert_eq!(reader.lines().count(), 2);
    /// ```
    pub fn reader<'a, R: BufRead + 'a>(&self, reader: R) -> Box<dyn BufRead + 'a> {
        match self {
            Compression::None => Box::new(reader),
            Compression::Bzip2 => Box::new(BufReader::new(MultiBzDecoder::new(reader))),
            Compression::Gzip => Box::new(BufReader::new(MultiGzDecoder::new(reader))),
            #[cfg(feature = "xz")]
            Compression::Xz => Box::new(BufReader::new(XzDecoder::new_multi_decoder(reader))),
        }
    }

    /// Wrap a writer with the appropriate compression layer.
    pub fn encoder<W: Write>(&self, writer: W) -> Encoder<W> {
        match self {
            Compression::None => Encoder::None(writer),
            Compression::Bzip2 => Encoder::Bzip2(BzEncoder::new(writer, BZIP2_LEVEL)),
            Compression::Gzip => Encoder::Gzip(GzEncoder::new(writer, GZIP_LEVEL)),
            #[cfg(feature = "xz")]
            Compression::Xz => Encoder::Xz(XzEncoder::new(writer, XZ_LEVEL)),
        }
    }
}

/// A compressing writer.
///
/// Dropping an encoder without calling [`finish`](Self::finish) still writes
/// the trailer, but any error doing so is lost.
pub enum Encoder<W: Write> {
    None(W),
    Bzip2(BzEncoder<W>),
    Gzip(GzEncoder<W>),
    #[cfg(feature = "xz")]
    Xz(XzEncoder<W>),
}

impl<W: Write> Encoder<W> {
    /// Write the stream trailer, flush, and hand back the inner writer.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn finish(self) -> Result<W> {
        let mut inner = match self {
            Encoder::None(writer) => writer,
            Encoder::Bzip2(encoder) => encoder.finish().or_raise(|| ErrorKind::Io)?,
            Encoder::Gzip(encoder) => encoder.finish().or_raise(|| ErrorKind::Io)?,
            #[cfg(feature = "xz")]
            Encoder::Xz(encoder) => encoder.finish().or_raise(|| ErrorKind::Io)?,
        };
        inner.flush().or_raise(|| ErrorKind::Io)?;
        Ok(inner)
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Encoder::None(writer) => writer.write(buf),
            Encoder::Bzip2(encoder) => encoder.write(buf),
            Encoder::Gzip(encoder) => encoder.write(buf),
            #[cfg(feature = "xz")]
            Encoder::Xz(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Encoder::None(writer) => writer.flush(),
            Encoder::Bzip2(encoder) => encoder.flush(),
            Encoder::Gzip(encoder) => encoder.flush(),
            #[cfg(feature = "xz")]
            Encoder::Xz(encoder) => encoder.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Compression;
    use rstest::rstest;
    use std::io::{BufRead, Cursor, Write};

    const DUMP: &str = "id\ttitle\n1\t[Group] Show - 01\n2\t[Group] Show - 02\n";

    fn compress(format: Compression, data: &[u8]) -> Vec<u8> {
        let mut encoder = format.encoder(Vec::new());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[rstest]
    #[case(Compression::None)]
    #[case(Compression::Bzip2)]
    #[case(Compression::Gzip)]
    #[cfg_attr(feature = "xz", case(Compression::Xz))]
    fn test_lines_through_codec(#[case] format: Compression) {
        let compressed = compress(format, DUMP.as_bytes());
        assert_eq!(Compression::from_magic_bytes(&compressed), format);
        let lines: Vec<String> = format.reader(Cursor::new(compressed)).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["id\ttitle", "1\t[Group] Show - 01", "2\t[Group] Show - 02"]);
    }

    #[test]
    fn test_multi_member_gzip() {
        let mut joined = compress(Compression::Gzip, b"first\n");
        joined.extend(compress(Compression::Gzip, b"second\n"));
        let lines: Vec<String> =
            Compression::Gzip.reader(Cursor::new(joined)).lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[rstest]
    #[case(Compression::Bzip2)]
    #[case(Compression::Gzip)]
    fn test_invalid_compressed_data(#[case] format: Compression) {
        let mut reader = format.reader(Cursor::new(b"This is not compressed data".to_vec()));
        let mut line = String::new();
        assert!(reader.read_line(&mut line).is_err());
    }
}
