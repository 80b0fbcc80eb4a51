// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::io::{self, Read, Write};

use thiserror::Error;

/// The content codings Araldo can apply to (and remove from) a body.
///
/// ## Deflate
/// The HTTP `deflate` coding is the zlib format (RFC 1950) wrapping a raw
/// deflate stream, not the bare stream. Some historical servers got this
/// wrong; this implementation sends and expects the zlib wrapper.
///
/// ## References
/// * [IANA HTTP Content Coding Registry](https://www.iana.org/assignments/http-parameters/http-parameters.xhtml#content-coding)
/// * [RFC 9110 Section 8.4.1](https://www.rfc-editor.org/rfc/rfc9110.html#name-content-codings)
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentCoding {
    /// The `br` content encoding.
    ///
    /// ## References
    /// * [RFC 7932: Brotli Compressed Data Format](https://datatracker.ietf.org/doc/html/rfc7932)
    Brotli,

    /// The `bzip2` content encoding.
    Bzip2,

    /// The `deflate` content encoding.
    ///
    /// ## References
    /// * [RFC 1950: ZLIB Compressed Data Format Specification version 3.3](https://datatracker.ietf.org/doc/html/rfc1950)
    Deflate,

    /// The `gzip` content encoding.
    ///
    /// ## References
    /// * [RFC 1952: GZIP file format specification version 4.3](https://datatracker.ietf.org/doc/html/rfc1952)
    Gzip,
}

#[derive(Debug, Error)]
pub enum ContentCodingError {
    #[error("compression level {level} is outside {min}..={max} for {coding}")]
    InvalidLevel {
        coding: &'static str,
        level: u32,
        min: u32,
        max: u32,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

const BROTLI_BUFFER_SIZE: usize = 4096;
const BROTLI_WINDOW_SIZE: u32 = 22;

impl ContentCoding {
    /// The accepted range of compression levels and the level used when the
    /// caller doesn't pick one.
    #[must_use]
    pub fn level_range(&self) -> (u32, u32, u32) {
        match self {
            ContentCoding::Brotli => (0, 11, 11),
            ContentCoding::Bzip2 => (1, 9, 4),
            ContentCoding::Deflate | ContentCoding::Gzip => (0, 9, 6),
        }
    }

    /// Validates the requested level, resolving `None` to the default.
    pub fn resolve_level(&self, level: Option<u32>) -> Result<u32, ContentCodingError> {
        let (min, max, default) = self.level_range();
        match level {
            None => Ok(default),
            Some(level) if (min..=max).contains(&level) => Ok(level),
            Some(level) => Err(ContentCodingError::InvalidLevel {
                coding: self.http_identifier(),
                level,
                min,
                max,
            }),
        }
    }

    /// Encodes the given data using the specified content encoding.
    pub fn encode(&self, data: &[u8], level: Option<u32>) -> Result<Vec<u8>, ContentCodingError> {
        let mut encoder = self.encoder(Vec::with_capacity(data.len() / 2), level)?;
        encoder.write_all(data)?;
        Ok(encoder.finish()?)
    }

    /// Removes the content coding from the given data.
    pub fn decode(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut result = Vec::new();
        match self {
            ContentCoding::Brotli => {
                brotli::Decompressor::new(data, BROTLI_BUFFER_SIZE).read_to_end(&mut result)?;
            }
            ContentCoding::Bzip2 => {
                bzip2::read::BzDecoder::new(data).read_to_end(&mut result)?;
            }
            ContentCoding::Deflate => {
                flate2::read::ZlibDecoder::new(data).read_to_end(&mut result)?;
            }
            ContentCoding::Gzip => {
                flate2::read::GzDecoder::new(data).read_to_end(&mut result)?;
            }
        }
        Ok(result)
    }

    /// Creates a streaming encoder writing into `writer`. Call
    /// [`ContentEncoder::finish`] to write the trailer of the coding.
    pub fn encoder<W: Write>(&self, writer: W, level: Option<u32>) -> Result<ContentEncoder<W>, ContentCodingError> {
        let level = self.resolve_level(level)?;
        Ok(match self {
            ContentCoding::Brotli => ContentEncoder::Brotli(
                brotli::CompressorWriter::new(writer, BROTLI_BUFFER_SIZE, level, BROTLI_WINDOW_SIZE)
            ),
            ContentCoding::Bzip2 => ContentEncoder::Bzip2(
                bzip2::write::BzEncoder::new(writer, bzip2::Compression::new(level))
            ),
            ContentCoding::Deflate => ContentEncoder::Deflate(
                flate2::write::ZlibEncoder::new(writer, flate2::Compression::new(level))
            ),
            ContentCoding::Gzip => ContentEncoder::Gzip(
                flate2::write::GzEncoder::new(writer, flate2::Compression::new(level))
            ),
        })
    }

    /// Returns the HTTP identifier for the content encoding, as specified in
    /// the IANA Registry (name field).
    pub fn http_identifier(&self) -> &'static str {
        match self {
            ContentCoding::Brotli => "br",
            ContentCoding::Bzip2 => "bzip2",
            ContentCoding::Deflate => "deflate",
            ContentCoding::Gzip => "gzip",
        }
    }
}

pub enum ContentEncoder<W: Write> {
    Brotli(brotli::CompressorWriter<W>),
    Bzip2(bzip2::write::BzEncoder<W>),
    Deflate(flate2::write::ZlibEncoder<W>),
    Gzip(flate2::write::GzEncoder<W>),
}

impl<W: Write> ContentEncoder<W> {
    /// Flushes the remaining compressed data and the trailer, returning the
    /// inner writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Brotli(writer) => Ok(writer.into_inner()),
            Self::Bzip2(writer) => writer.finish(),
            Self::Deflate(writer) => writer.finish(),
            Self::Gzip(writer) => writer.finish(),
        }
    }
}

impl<W: Write> Write for ContentEncoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Brotli(writer) => writer.write(buf),
            Self::Bzip2(writer) => writer.write(buf),
            Self::Deflate(writer) => writer.write(buf),
            Self::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Brotli(writer) => writer.flush(),
            Self::Bzip2(writer) => writer.flush(),
            Self::Deflate(writer) => writer.flush(),
            Self::Gzip(writer) => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const TEXT: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
        Lorem ipsum dolor sit amet, consectetur adipiscing elit.";

    #[rstest]
    #[case(ContentCoding::Brotli)]
    #[case(ContentCoding::Bzip2)]
    #[case(ContentCoding::Deflate)]
    #[case(ContentCoding::Gzip)]
    fn test_round_trip(#[case] coding: ContentCoding) {
        let encoded = coding.encode(TEXT, None).unwrap();
        assert_ne!(encoded, TEXT);
        assert_eq!(coding.decode(&encoded).unwrap(), TEXT);
    }

    #[rstest]
    #[case(ContentCoding::Gzip, Some(10), false)]
    #[case(ContentCoding::Gzip, Some(0), true)]
    #[case(ContentCoding::Bzip2, Some(0), false)]
    #[case(ContentCoding::Bzip2, Some(9), true)]
    #[case(ContentCoding::Brotli, Some(11), true)]
    #[case(ContentCoding::Brotli, Some(12), false)]
    #[case(ContentCoding::Deflate, None, true)]
    fn test_resolve_level(#[case] coding: ContentCoding, #[case] level: Option<u32>, #[case] ok: bool) {
        assert_eq!(coding.resolve_level(level).is_ok(), ok);
    }

    #[test]
    fn test_empty_body_round_trip() {
        let encoded = ContentCoding::Gzip.encode(&[], None).unwrap();
        assert!(ContentCoding::Gzip.decode(&encoded).unwrap().is_empty());
    }
}
