// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The coding tokens that can appear in `Accept-Encoding`, `TE`,
//! `Content-Encoding` and `Transfer-Encoding`. Only some of them have a codec
//! behind them, see [`Encoding::content_coding`].
//!
//! # References
//! * [IANA HTTP Content Coding Registry](https://www.iana.org/assignments/http-parameters/http-parameters.xhtml#content-coding)
//! * [IANA HTTP Transfer Coding Registry](https://www.iana.org/assignments/http-parameters/http-parameters.xhtml#transfer-coding)

use phf::phf_map;
use unicase::UniCase;

use crate::ContentCoding;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Encoding {
    Brotli,
    Bzip2,
    Chunked,
    Compress,
    Deflate,
    Exi,
    Gzip,
    Identity,
    Lzo,
    Pg,
    Sdch,

    /// Only meaningful in `TE`, signals that the client accepts trailer
    /// fields in a chunked response.
    Trailers,
    Xz,
}

static ENCODING_MAP: phf::Map<UniCase<&'static str>, Encoding> = phf_map!(
    UniCase::ascii("br") => Encoding::Brotli,
    UniCase::ascii("bzip") => Encoding::Bzip2,
    UniCase::ascii("bzip2") => Encoding::Bzip2,
    UniCase::ascii("chunked") => Encoding::Chunked,
    UniCase::ascii("compress") => Encoding::Compress,
    UniCase::ascii("x-compress") => Encoding::Compress,
    UniCase::ascii("deflate") => Encoding::Deflate,
    UniCase::ascii("exi") => Encoding::Exi,
    UniCase::ascii("gzip") => Encoding::Gzip,
    UniCase::ascii("x-gzip") => Encoding::Gzip,
    UniCase::ascii("identity") => Encoding::Identity,
    UniCase::ascii("lzo") => Encoding::Lzo,
    UniCase::ascii("pg") => Encoding::Pg,
    UniCase::ascii("sdch") => Encoding::Sdch,
    UniCase::ascii("trailers") => Encoding::Trailers,
    UniCase::ascii("xz") => Encoding::Xz,
);

impl Encoding {
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        ENCODING_MAP.get(&UniCase::ascii(token)).copied()
    }

    #[must_use]
    pub fn http_identifier(&self) -> &'static str {
        match self {
            Self::Brotli => "br",
            Self::Bzip2 => "bzip2",
            Self::Chunked => "chunked",
            Self::Compress => "compress",
            Self::Deflate => "deflate",
            Self::Exi => "exi",
            Self::Gzip => "gzip",
            Self::Identity => "identity",
            Self::Lzo => "lzo",
            Self::Pg => "pg",
            Self::Sdch => "sdch",
            Self::Trailers => "trailers",
            Self::Xz => "xz",
        }
    }

    /// The codec implementing this coding, if one is available.
    #[must_use]
    pub fn content_coding(&self) -> Option<ContentCoding> {
        match self {
            Self::Brotli => Some(ContentCoding::Brotli),
            Self::Bzip2 => Some(ContentCoding::Bzip2),
            Self::Deflate => Some(ContentCoding::Deflate),
            Self::Gzip => Some(ContentCoding::Gzip),
            _ => None,
        }
    }

    /// Whether this token may appear in `Transfer-Encoding`.
    #[must_use]
    pub fn is_transfer_coding(&self) -> bool {
        matches!(self, Self::Chunked | Self::Compress | Self::Deflate | Self::Gzip | Self::Identity | Self::Trailers)
    }
}

impl From<ContentCoding> for Encoding {
    fn from(coding: ContentCoding) -> Self {
        match coding {
            ContentCoding::Brotli => Self::Brotli,
            ContentCoding::Bzip2 => Self::Bzip2,
            ContentCoding::Deflate => Self::Deflate,
            ContentCoding::Gzip => Self::Gzip,
        }
    }
}
