// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::io;

use araldo_resources::ContentCodingError;
use strum_macros::AsRefStr;
use thiserror::Error;

/// Errors of the operations that perform I/O or take caller input:
/// encoding the body, checksumming files, and writing the response.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed header value: {}", .0.as_ref())]
    Parse(HttpParseError),

    #[error(transparent)]
    Setter(#[from] SetterError),

    #[error(transparent)]
    ContentCoding(#[from] ContentCodingError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<HttpParseError> for Error {
    fn from(error: HttpParseError) -> Self {
        Error::Parse(error)
    }
}

/// A value received from the peer didn't match its grammar. These are stored
/// per header in [`crate::Parsed::Invalid`] and never abort the decode pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum HttpParseError {
    /// The cache directive had a malformed or missing argument.
    ///
    /// ## Example:
    /// ```text
    /// Cache-Control: max-age=soon
    /// ```
    InvalidCacheControl,

    /// The checksum record isn't `what:algorithm:base64`.
    ///
    /// ## Example:
    /// ```text
    /// Checksum-Content: full:sha256
    /// ```
    InvalidChecksum,

    /// The `Cookie` header contained a pair without `=` or an empty name.
    ///
    /// ## Example:
    /// ```text
    /// Cookie: =value; lonely
    /// ```
    InvalidCookie,

    /// The credentials didn't start with an auth-scheme, or the parameters
    /// were neither a token68 nor a list of auth-params.
    ///
    /// ## Example:
    /// ```text
    /// Authorization: Basic a b c
    /// ```
    InvalidCredentials,

    /// The date didn't reproduce itself when re-serialized in one of the
    /// accepted formats.
    ///
    /// ## Example:
    /// ```text
    /// If-Modified-Since: now
    /// If-Modified-Since: Sun, 6 Nov 1994 08:49:37 GMT
    /// ```
    InvalidDate,

    /// The entity-tag wasn't a quoted string of `etagc` characters, optionally
    /// prefixed with `W/`.
    ///
    /// ## Example:
    /// ```text
    /// If-None-Match: abc
    /// If-None-Match: w/"abc"
    /// ```
    InvalidEntityTag,

    /// The host was neither a registered name, nor an IPv4 address, nor an
    /// IP literal.
    ///
    /// ## Example:
    /// ```text
    /// Host: exa mple.org
    /// Host: [::1
    /// ```
    InvalidHost,

    /// The media type wasn't `type/subtype` followed by parameters.
    ///
    /// ## Example:
    /// ```text
    /// Content-Type: text
    /// ```
    InvalidMediaType,

    /// The method wasn't a token.
    ///
    /// ## Example:
    /// ```text
    /// Access-Control-Request-Method: G E T
    /// ```
    InvalidMethod,

    /// A negotiation list contained an empty or malformed choice.
    ///
    /// ## Example:
    /// ```text
    /// Accept-Language: en;;q=1
    /// ```
    InvalidNegotiation,

    /// The value wasn't a sequence of digits, or didn't fit.
    ///
    /// ## Example:
    /// ```text
    /// Content-Length: 123abc
    /// Max-Forwards: 99999999999999999999999
    /// ```
    InvalidNumber,

    /// A `;`-parameter was missing its name, its `=` or its value.
    ///
    /// ## Example:
    /// ```text
    /// Content-Type: text/html; charset
    /// ```
    InvalidParameter,

    /// The port was not a number in the range `0..=65535`.
    ///
    /// ## Example:
    /// ```text
    /// Host: example.org:99999
    /// ```
    InvalidPort,

    /// The range unit wasn't `bytes`, or a range-spec was malformed.
    ///
    /// ## Example:
    /// ```text
    /// Range: lines=1-2
    /// Range: bytes=5-1
    /// ```
    InvalidRange,

    /// The URI couldn't be parsed.
    ///
    /// ## Example:
    /// ```text
    /// Referer: http://exa mple.org/
    /// ```
    InvalidUri,

    /// The product token or comment of the `User-Agent` was malformed.
    ///
    /// ## Example:
    /// ```text
    /// User-Agent: Mozilla/5.0 (X11; Linux
    /// ```
    InvalidUserAgent,

    /// A comment wasn't closed.
    ///
    /// ## Example:
    /// ```text
    /// Via: 1.1 proxy (unclosed
    /// ```
    CommentUnterminated,

    /// The field value was present, but empty after trimming.
    ///
    /// ## Example:
    /// ```text
    /// Accept:
    /// ```
    FieldValueEmpty,

    /// The field value contained a control character.
    ///
    /// ## Example:
    /// ```text
    /// Accept: text/html\0
    /// ```
    FieldValueContainsInvalidCharacters,

    /// A quoted-string contained a character outside `qdtext` that wasn't
    /// escaped.
    QuotedStringContainsInvalidCharacter,

    /// A quoted-string didn't start with a double quote, or wasn't closed.
    ///
    /// ## Example:
    /// ```text
    /// If-Match: "abc
    /// ```
    QuotedStringUnterminated,

    /// The token contained a delimiter.
    ///
    /// ## Example:
    /// ```text
    /// Connection: keep-alive/close
    /// ```
    TokenContainsDelimiter,

    /// The token contained characters that aren't visible ASCII.
    TokenContainsNonVisibleAscii,

    /// The token contained whitespace.
    TokenContainsWhitespace,

    /// The token was empty.
    TokenEmpty,

    /// The value was well-formed up to a point, after which unexpected
    /// characters followed.
    ///
    /// ## Example:
    /// ```text
    /// Content-Length: 12 13
    /// ```
    TrailingCharacters,

    /// The checksum algorithm isn't one of the recognised names.
    ///
    /// ## Example:
    /// ```text
    /// Checksum-Content: full:whirlpool:AAAA
    /// ```
    UnknownChecksumAlgorithm,

    /// The content coding isn't one of the recognised names.
    ///
    /// ## Example:
    /// ```text
    /// Content-Encoding: zstd
    /// ```
    UnknownContentCoding,
}

/// A response setter received an argument outside its domain. This is the
/// caller's mistake and is reported immediately.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetterError {
    #[error("`{0}` is not a valid token")]
    InvalidToken(String),

    #[error("`{0}` is not a valid URI")]
    InvalidUri(String),

    #[error("invalid value for {header}: {reason}")]
    InvalidValue {
        header: &'static str,
        reason: &'static str,
    },

    #[error("a manual checksum needs a digest")]
    MissingDigest,

    #[error("`{0}` can't be used as a transfer coding")]
    NotATransferCoding(&'static str),
}

/// The result of an operation that can fail softly: the call was valid, but
/// the state of the response made it inapplicable, or the header has no
/// implementation.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr)]
pub enum Outcome {
    Applied,
    NotApplicable,
    Unsupported,
}

impl Outcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        *self == Outcome::Applied
    }
}
