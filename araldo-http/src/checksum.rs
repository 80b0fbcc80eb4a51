// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The `Checksum-Content`, `Checksum-Header` and `Checksum-Headers` fields.
//!
//! These aren't registered HTTP fields. They let the receiving end detect
//! changes to the body or to the header block made in transit:
//!
//! ```text
//! Checksum-Content = what ":" algorithm ":" digest
//! Checksum-Header  = what ":" algorithm ":" digest
//! Checksum-Headers = #field-name
//! what             = "full" / "partial" / "signed" / "unsigned"
//! ```
//!
//! The header digest covers the status line and the fields listed in
//! `Checksum-Headers`, since intermediaries are free to add or drop other
//! fields. Digests are lowercase hex in responses and base64 in requests.

use std::fmt::Display;

use araldo_resources::{ChecksumAlgorithm, Content, Digester};
use base64::Engine;

use crate::{
    lists::parse_http_list,
    syntax,
    Error,
    HttpParseError,
    ResponseHeaderName,
    SetterError,
};

/// The number of hex characters a `partial` digest keeps.
pub const PARTIAL_DIGEST_LENGTH: usize = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChecksumWhat {
    Full,

    /// The digest truncated to [`PARTIAL_DIGEST_LENGTH`] characters.
    Partial,

    /// The digest is a signature, produced outside this crate.
    Signed,
    Unsigned,
}

impl ChecksumWhat {
    /// `complete` is an older spelling of `full`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "full" | "complete" => Some(Self::Full),
            "partial" => Some(Self::Partial),
            "signed" => Some(Self::Signed),
            "unsigned" => Some(Self::Unsigned),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::Signed => "signed",
            Self::Unsigned => "unsigned",
        }
    }
}

/// How a checksum field of the response is produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChecksumAction {
    /// Computed when the headers are sent.
    Auto,

    /// The caller supplies the digest.
    Manual(String),

    /// The field is left out.
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecksumSpec {
    pub action: ChecksumAction,
    pub what: ChecksumWhat,
    pub algorithm: ChecksumAlgorithm,
}

impl ChecksumSpec {
    #[must_use]
    pub fn auto(algorithm: ChecksumAlgorithm) -> Self {
        Self { action: ChecksumAction::Auto, what: ChecksumWhat::Full, algorithm }
    }

    /// A caller-supplied digest, emitted as is.
    pub fn manual(what: ChecksumWhat, algorithm: ChecksumAlgorithm, digest: impl Into<String>) -> Result<Self, SetterError> {
        let digest = digest.into();
        if digest.is_empty() {
            return Err(SetterError::MissingDigest);
        }
        if !digest.bytes().all(|byte| byte.is_ascii_graphic() && byte != b',') {
            return Err(SetterError::InvalidValue {
                header: "Checksum",
                reason: "the digest must be visible ASCII",
            });
        }
        Ok(Self { action: ChecksumAction::Manual(digest), what, algorithm })
    }

    #[must_use]
    pub fn none() -> Self {
        Self { action: ChecksumAction::None, what: ChecksumWhat::Full, algorithm: ChecksumAlgorithm::Sha256 }
    }
}

/// One `what:algorithm:digest` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecksumRecord {
    pub what: ChecksumWhat,
    pub algorithm: ChecksumAlgorithm,
    pub digest: String,
}

impl ChecksumRecord {
    /// Parses a record received in a request. The digest must be base64.
    pub fn parse(value: &str) -> Result<Self, HttpParseError> {
        let value = syntax::prepare(value)?;

        let mut parts = value.splitn(3, ':');
        let (Some(what), Some(algorithm), Some(digest)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(HttpParseError::InvalidChecksum);
        };

        let what = ChecksumWhat::from_token(what.trim_matches(syntax::is_whitespace_character))
            .ok_or(HttpParseError::InvalidChecksum)?;
        let algorithm = ChecksumAlgorithm::from_token(algorithm.trim_matches(syntax::is_whitespace_character))
            .ok_or(HttpParseError::UnknownChecksumAlgorithm)?;

        let digest = digest.trim_matches(syntax::is_whitespace_character);
        match base64::engine::general_purpose::STANDARD.decode(digest) {
            Ok(bytes) if !bytes.is_empty() => (),
            _ => return Err(HttpParseError::InvalidChecksum),
        }

        Ok(Self { what, algorithm, digest: digest.to_owned() })
    }

    #[must_use]
    pub fn format(&self) -> String {
        format!("{}:{}:{}", self.what.as_str(), self.algorithm.as_str(), self.digest)
    }

    /// Checks a request record against the data it claims to cover. Returns
    /// `None` when the record can't be verified here: signatures, partial
    /// digests and algorithms without a [`Digester`].
    #[must_use]
    pub fn verify(&self, data: &[u8]) -> Option<bool> {
        if !matches!(self.what, ChecksumWhat::Full | ChecksumWhat::Unsigned) {
            return None;
        }

        let mut digester = Digester::new(self.algorithm)?;
        digester.update(data);
        let expected = base64::engine::general_purpose::STANDARD.decode(&self.digest).ok()?;
        Some(digester.finalize() == expected)
    }
}

impl Display for ChecksumRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

fn finish(digester: Digester, what: ChecksumWhat) -> String {
    let mut digest = digester.finalize_hex();
    if what == ChecksumWhat::Partial {
        digest.truncate(PARTIAL_DIGEST_LENGTH);
    }
    digest
}

/// Computes the `Checksum-Content` record over the body, read in chunks of
/// `chunk_size` bytes. Must be called before a content coding is applied.
///
/// Returns `None` when the record can't be computed here (`signed`, or an
/// algorithm such as `pg`).
pub fn checksum_content(content: &Content, what: ChecksumWhat, algorithm: ChecksumAlgorithm, chunk_size: usize) -> Result<Option<ChecksumRecord>, Error> {
    if what == ChecksumWhat::Signed {
        return Ok(None);
    }
    let Some(mut digester) = Digester::new(algorithm) else {
        return Ok(None);
    };

    content.for_each_chunk(chunk_size, |chunk| {
        digester.update(chunk);
        Ok(())
    })?;

    Ok(Some(ChecksumRecord { what, algorithm, digest: finish(digester, what) }))
}

/// The fields covered by `Checksum-Header`: every emitted field in `lines`
/// that is listed in `included` (or all of them when `included` is `None`),
/// in emission order and without duplicates. The checksum fields themselves
/// are never covered, and neither is `Date` when `Date-Actual` is present.
#[must_use]
pub fn covered_headers(lines: &[(ResponseHeaderName, String)], included: Option<&[ResponseHeaderName]>) -> Vec<ResponseHeaderName> {
    let has_date_actual = lines.iter().any(|(name, _)| *name == ResponseHeaderName::DateActual);

    let mut covered: Vec<ResponseHeaderName> = Vec::new();
    for (name, _) in lines {
        let excluded = matches!(name,
            ResponseHeaderName::ChecksumHeader | ResponseHeaderName::ChecksumHeaders | ResponseHeaderName::ChecksumContent)
            || (*name == ResponseHeaderName::Date && has_date_actual)
            || included.is_some_and(|included| !included.contains(name));
        if !excluded && !covered.contains(name) {
            covered.push(*name);
        }
    }
    covered
}

/// The `Checksum-Headers` value for the covered fields.
#[must_use]
pub fn format_checksum_headers(covered: &[ResponseHeaderName]) -> String {
    covered.iter()
        .map(ResponseHeaderName::to_string_lowercase)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parses a `Checksum-Headers` field received in a request. Names are
/// lowercased; names outside the registry are kept.
pub fn parse_checksum_headers(value: &str) -> Result<Vec<String>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut names = Vec::new();
    for element in parse_http_list(value) {
        syntax::validate_token(element)?;
        names.push(element.to_ascii_lowercase());
    }

    if names.is_empty() {
        return Err(HttpParseError::TokenEmpty);
    }
    Ok(names)
}

/// Computes the `Checksum-Header` record. The digest input is the status
/// line followed by a `Name: value` line for each emitted line of the
/// `covered` fields, in the order of `covered`, joined by `\n`.
#[must_use]
pub fn checksum_header(status_line: &str, lines: &[(ResponseHeaderName, String)], covered: &[ResponseHeaderName], what: ChecksumWhat, algorithm: ChecksumAlgorithm) -> Option<ChecksumRecord> {
    if what == ChecksumWhat::Signed {
        return None;
    }
    let mut digester = Digester::new(algorithm)?;

    digester.update(status_line.as_bytes());
    for name in covered {
        for (_, value) in lines.iter().filter(|(line_name, _)| line_name == name) {
            digester.update(b"\n");
            digester.update(name.to_string_h1().as_bytes());
            digester.update(b": ");
            digester.update(value.as_bytes());
        }
    }

    Some(ChecksumRecord { what, algorithm, digest: finish(digester, what) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn lines() -> Vec<(ResponseHeaderName, String)> {
        vec![
            (ResponseHeaderName::ContentType, "text/html".to_owned()),
            (ResponseHeaderName::Date, "Sun, 06 Nov 1994 08:49:37 GMT".to_owned()),
            (ResponseHeaderName::ETag, "\"v1\"".to_owned()),
        ]
    }

    #[rstest]
    #[case("full:sha256:dGVzdA==", ChecksumWhat::Full, ChecksumAlgorithm::Sha256)]
    #[case(" PARTIAL:MD5:dGVzdA== ", ChecksumWhat::Partial, ChecksumAlgorithm::Md5)]
    #[case("complete:crc32:dGVzdA==", ChecksumWhat::Full, ChecksumAlgorithm::Crc32)]
    #[case("signed:pg:dGVzdA==", ChecksumWhat::Signed, ChecksumAlgorithm::Pg)]
    fn test_parse(#[case] input: &str, #[case] what: ChecksumWhat, #[case] algorithm: ChecksumAlgorithm) {
        let record = ChecksumRecord::parse(input).unwrap();
        assert_eq!(record.what, what);
        assert_eq!(record.algorithm, algorithm);
        assert_eq!(record.digest, "dGVzdA==");
    }

    #[rstest]
    #[case("", HttpParseError::FieldValueEmpty)]
    #[case("full:sha256", HttpParseError::InvalidChecksum)]
    #[case("most:sha256:dGVzdA==", HttpParseError::InvalidChecksum)]
    #[case("full:whirlpool:dGVzdA==", HttpParseError::UnknownChecksumAlgorithm)]
    #[case("full:sha256:not base64!", HttpParseError::InvalidChecksum)]
    #[case("full:sha256:", HttpParseError::InvalidChecksum)]
    fn test_parse_invalid(#[case] input: &str, #[case] expected: HttpParseError) {
        assert_eq!(ChecksumRecord::parse(input), Err(expected));
    }

    #[test]
    fn test_verify() {
        // sha256("abc")
        let digest = base64::engine::general_purpose::STANDARD
            .encode(hex::decode("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad").unwrap());
        let record = ChecksumRecord::parse(&format!("full:sha256:{digest}")).unwrap();
        assert_eq!(record.verify(b"abc"), Some(true));
        assert_eq!(record.verify(b"abd"), Some(false));

        let signed = ChecksumRecord::parse(&format!("signed:sha256:{digest}")).unwrap();
        assert_eq!(signed.verify(b"abc"), None);
    }

    #[test]
    fn test_checksum_content() {
        let content = Content::Bytes(b"abc".to_vec());
        let full = checksum_content(&content, ChecksumWhat::Full, ChecksumAlgorithm::Sha256, 1).unwrap().unwrap();
        assert_eq!(full.format(), "full:sha256:ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");

        let partial = checksum_content(&content, ChecksumWhat::Partial, ChecksumAlgorithm::Sha256, 2).unwrap().unwrap();
        assert_eq!(partial.digest, "ba7816bf8");

        assert_eq!(checksum_content(&content, ChecksumWhat::Full, ChecksumAlgorithm::Pg, 2).unwrap(), None);
        assert_eq!(checksum_content(&content, ChecksumWhat::Signed, ChecksumAlgorithm::Sha256, 2).unwrap(), None);
    }

    #[test]
    fn test_manual_needs_digest() {
        assert_eq!(ChecksumSpec::manual(ChecksumWhat::Full, ChecksumAlgorithm::Md5, ""), Err(SetterError::MissingDigest));
        assert!(ChecksumSpec::manual(ChecksumWhat::Full, ChecksumAlgorithm::Pg, "c2lnbmF0dXJl").is_ok());
    }

    #[test]
    fn test_checksum_header_is_deterministic() {
        let lines = lines();
        let covered = covered_headers(&lines, None);
        let first = checksum_header("HTTP/1.1 200 OK", &lines, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);
        let second = checksum_header("HTTP/1.1 200 OK", &lines, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_checksum_header_changes_with_covered_value() {
        let lines = lines();
        let covered = covered_headers(&lines, None);
        let before = checksum_header("HTTP/1.1 200 OK", &lines, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);

        let mut changed = lines.clone();
        changed[2].1 = "\"v2\"".to_owned();
        let after = checksum_header("HTTP/1.1 200 OK", &changed, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);
        assert_ne!(before, after);

        let other_status = checksum_header("HTTP/1.1 404 Not Found", &lines, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);
        assert_ne!(before, other_status);
    }

    #[test]
    fn test_checksum_header_ignores_uncovered() {
        let lines = lines();
        let included = [ResponseHeaderName::ContentType, ResponseHeaderName::ETag];
        let covered = covered_headers(&lines, Some(&included));
        assert_eq!(covered, included.to_vec());
        let before = checksum_header("HTTP/1.1 200 OK", &lines, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);

        let mut changed = lines.clone();
        changed[1].1 = "Mon, 07 Nov 1994 08:49:37 GMT".to_owned();
        let after = checksum_header("HTTP/1.1 200 OK", &changed, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256);
        assert_eq!(before, after);
    }

    #[test]
    fn test_date_actual_excludes_date() {
        let mut lines = lines();
        lines.push((ResponseHeaderName::DateActual, "Sun, 06 Nov 1994 08:49:37 GMT".to_owned()));
        lines.push((ResponseHeaderName::ChecksumContent, "full:md5:00".to_owned()));
        let covered = covered_headers(&lines, None);
        assert_eq!(covered, vec![ResponseHeaderName::ContentType, ResponseHeaderName::ETag, ResponseHeaderName::DateActual]);
        assert_eq!(format_checksum_headers(&covered), "content-type, etag, date-actual");
    }

    #[rstest]
    #[case("Content-Type, ETag", &["content-type", "etag"])]
    #[case("date_actual", &["date_actual"])]
    fn test_parse_checksum_headers(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_checksum_headers(input).unwrap(), expected.to_vec());
    }

    #[test]
    fn test_parse_checksum_headers_invalid() {
        assert_eq!(parse_checksum_headers(","), Err(HttpParseError::TokenEmpty));
        assert!(parse_checksum_headers("content type").is_err());
    }
}
