//! Opening the sequence file as a stream of lines, transparently decompressing it.
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

#[cfg(feature = "compression")]
use bzip2::read::BzDecoder;
#[cfg(feature = "compression")]
use flate2::read::MultiGzDecoder;
#[cfg(feature = "compression")]
use xz2::read::XzDecoder;

use log::debug;

use crate::errors::ParseError;

pub(crate) const BUFSIZE: usize = 64 * 1024;

// Magic bytes for each compression format
const GZ_MAGIC: [u8; 2] = [0x1F, 0x8B];
// "BZh"; text identifiers may start with "BZ"
const BZ_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];
const XZ_MAGIC: [u8; 2] = [0xFD, 0x37];

/// What the first bytes of a stream told us about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Bzip2,
    Xz,
    Uncompressed,
}

impl Compression {
    /// Guess the compression from (up to) the first three bytes of a stream.
    /// A lone gz or xz lead byte can't start a text file so it's reported as broken.
    pub fn detect(first: &[u8]) -> Result<Self, ParseError> {
        match first {
            _ if first.starts_with(&GZ_MAGIC) => Ok(Compression::Gzip),
            _ if first.starts_with(&BZ_MAGIC) => Ok(Compression::Bzip2),
            _ if first.starts_with(&XZ_MAGIC) => Ok(Compression::Xz),
            [0x1F, ..] => Err(ParseError::new_bad_compression("gz")),
            [0xFD, ..] => Err(ParseError::new_bad_compression("xz")),
            _ => Ok(Compression::Uncompressed),
        }
    }
}

/// Fill `buf` as much as possible, stopping early only at EOF
fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, ParseError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(filled)
}

#[cfg(feature = "compression")]
fn decoder<'a, R: Read + 'a>(compression: Compression, reader: R) -> Box<dyn BufRead + 'a> {
    match compression {
        Compression::Gzip => Box::new(BufReader::with_capacity(
            BUFSIZE,
            MultiGzDecoder::new(reader),
        )),
        Compression::Bzip2 => Box::new(BufReader::with_capacity(BUFSIZE, BzDecoder::new(reader))),
        Compression::Xz => Box::new(BufReader::with_capacity(BUFSIZE, XzDecoder::new(reader))),
        Compression::Uncompressed => Box::new(BufReader::with_capacity(BUFSIZE, reader)),
    }
}

#[cfg(not(feature = "compression"))]
fn decoder<'a, R: Read + 'a>(compression: Compression, reader: R) -> Box<dyn BufRead + 'a> {
    if compression != Compression::Uncompressed {
        log::warn!(
            "Input looks {:?}-compressed but decompression is disabled; reading it as text",
            compression
        );
    }
    Box::new(BufReader::with_capacity(BUFSIZE, reader))
}

/// Wraps any `Read` into a line source.
/// If the stream starts with a gzip, bzip2 or xz header it is decompressed on the fly
/// (only when the `compression` feature is enabled).
pub fn lines_from_reader<'a, R: Read + 'a>(
    mut reader: R,
) -> Result<(Box<dyn BufRead + 'a>, Compression), ParseError> {
    let mut first = [0; 3];
    let n = read_prefix(&mut reader, &mut first)?;
    let compression = Compression::detect(&first[..n])?;
    // put the sniffed bytes back in front of the stream
    let stream = Cursor::new(first[..n].to_vec()).chain(reader);
    Ok((decoder(compression, stream), compression))
}

/// Opens the file at `path` as a line source, see [`lines_from_reader`].
/// The file handle lives inside the returned reader and is closed when it is dropped.
pub fn open_lines<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, ParseError> {
    let f = File::open(&path)?;
    let (lines, compression) = lines_from_reader(f)?;
    debug!(
        "Reading {} ({:?})",
        path.as_ref().display(),
        compression
    );
    Ok(lines)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::ParseErrorKind;

    fn read_all(data: &[u8]) -> (String, Compression) {
        let (mut lines, compression) = lines_from_reader(data).unwrap();
        let mut out = String::new();
        lines.read_to_string(&mut out).unwrap();
        (out, compression)
    }

    #[test]
    fn detect_magic() {
        assert_eq!(Compression::detect(&GZ_MAGIC), Ok(Compression::Gzip));
        assert_eq!(Compression::detect(&BZ_MAGIC), Ok(Compression::Bzip2));
        assert_eq!(Compression::detect(&XZ_MAGIC), Ok(Compression::Xz));
        assert_eq!(Compression::detect(b"@r"), Ok(Compression::Uncompressed));
        assert_eq!(Compression::detect(b""), Ok(Compression::Uncompressed));
        assert_eq!(
            Compression::detect(&[0x1F, 0x00]).unwrap_err().kind,
            ParseErrorKind::BadCompression
        );
    }

    #[test]
    fn plain_text_is_passed_through() {
        let (text, compression) = read_all(b"@x_1_2\nACGT\n+\nIIII\n");
        assert_eq!(compression, Compression::Uncompressed);
        assert_eq!(text, "@x_1_2\nACGT\n+\nIIII\n");
    }

    #[test]
    fn text_starting_with_bz_is_not_bzip2() {
        assert_eq!(Compression::detect(b"BZ_"), Ok(Compression::Uncompressed));
        assert_eq!(Compression::detect(b"BZ"), Ok(Compression::Uncompressed));
        let (text, compression) = read_all(b"BZ_5_2\nACGT\n+\nIIII\n");
        assert_eq!(compression, Compression::Uncompressed);
        assert_eq!(text, "BZ_5_2\nACGT\n+\nIIII\n");
    }

    #[test]
    fn short_inputs() {
        assert_eq!(read_all(b"").0, "");
        assert_eq!(read_all(b"@").0, "@");
    }

    #[cfg(feature = "compression")]
    #[test]
    fn gzip_stream() {
        use flate2::write::GzEncoder;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"@x_4_0\nAC\n+\nII\n").unwrap();
        let data = encoder.finish().unwrap();

        let (text, compression) = read_all(&data);
        assert_eq!(compression, Compression::Gzip);
        assert_eq!(text, "@x_4_0\nAC\n+\nII\n");
    }

    #[test]
    fn missing_file() {
        let err = open_lines("./does/not/exist.fq.gz").err().unwrap();
        assert_eq!(err.kind, ParseErrorKind::Io);
    }
}
