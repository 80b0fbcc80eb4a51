// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The response header builder.
//!
//! Application code sets headers through the typed `set_*` methods, which
//! validate their arguments and keep the cross-header constraints, such as
//! `Content-Length` and `Transfer-Encoding` never appearing together. The
//! headers are then sent once with [`Response::send_response_headers`],
//! which also computes the checksum fields over the final header set.

mod header_map;
mod header_value;
mod setters;
mod sink;

pub use header_map::HeaderMap;
pub use header_value::{HeaderValue, RetryAfter, StrictTransportSecurity};
pub use sink::{BufferedSink, HeaderSink, WriteSink};

use std::io::{self, Write};

use araldo_resources::{Content, ContentCoding, Encoding};
use tracing::{debug, trace, warn};

use crate::{
    checksum::{
        checksum_content,
        checksum_header,
        covered_headers,
        format_checksum_headers,
        ChecksumAction,
        ChecksumRecord,
    },
    Error,
    HttpVersion,
    Outcome,
    ResponseHeaderName,
    ResponseSettings,
    SetterError,
    StatusCode,
};

#[derive(Clone, Debug)]
pub struct Response {
    pub(crate) status: u16,
    pub(crate) protocol: HttpVersion,
    pub(crate) headers: HeaderMap,
    pub(crate) content: Content,
    pub(crate) settings: ResponseSettings,

    /// The content coding applied to the current body.
    pub(crate) applied_coding: Option<AppliedCoding>,
    /// The automatic `Checksum-Content`, computed before the coding.
    pub(crate) pre_coding_checksum: Option<ChecksumRecord>,
    headers_sent: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum AppliedCoding {
    /// The body holds the encoded bytes.
    Buffered(ContentCoding),
    /// The body is too large to buffer, and is encoded while sent.
    Streaming {
        coding: ContentCoding,
        level: u32,
        added_chunked: bool,
    },
}

impl Default for Response {
    fn default() -> Self {
        Self::new(ResponseSettings::default())
    }
}

impl Response {
    pub fn new(settings: ResponseSettings) -> Self {
        Self {
            status: StatusCode::Ok.code(),
            protocol: HttpVersion::Http11,
            headers: HeaderMap::new(),
            content: Content::Empty,
            settings,
            applied_coding: None,
            pre_coding_checksum: None,
            headers_sent: false,
        }
    }

    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Any three-digit code is accepted; unregistered codes are sent without
    /// a reason phrase.
    pub fn set_status(&mut self, code: u16) -> Result<(), SetterError> {
        if !(100..=999).contains(&code) {
            return Err(SetterError::InvalidValue {
                header: "Status",
                reason: "the status code must have three digits",
            });
        }
        self.status = code;
        Ok(())
    }

    #[must_use]
    pub fn protocol(&self) -> HttpVersion {
        self.protocol
    }

    pub fn set_protocol(&mut self, protocol: HttpVersion) {
        self.protocol = protocol;
    }

    #[must_use]
    pub fn settings(&self) -> &ResponseSettings {
        &self.settings
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The first value of the header, if it is set.
    #[must_use]
    pub fn get(&self, header_name: ResponseHeaderName) -> Option<&HeaderValue> {
        self.headers.get(&header_name)
    }

    /// Removes every value of the header. Returns whether it was set.
    pub fn unset(&mut self, header_name: ResponseHeaderName) -> bool {
        self.headers.remove(&header_name)
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Replaces the body, or appends to it. Bytes append to bytes and files
    /// to files; appending one kind to the other is not applicable and
    /// leaves the body unchanged.
    ///
    /// A replaced body is no longer encoded, so the framing headers of an
    /// earlier [`Response::encode_response_content`] are removed. Appending
    /// to an encoded body is not applicable.
    pub fn set_content(&mut self, content: Content, append: bool) -> Outcome {
        if !append {
            self.clear_applied_coding();
            self.content = content;
            return Outcome::Applied;
        }

        if self.applied_coding.is_some() && !content.is_empty() {
            debug!(header = "content", "cannot append to an encoded body");
            return Outcome::NotApplicable;
        }

        let compatible = match (&self.content, &content) {
            (_, Content::Empty) | (Content::Empty, _) => true,
            (Content::Bytes(_), Content::Bytes(_)) | (Content::Files(_), Content::Files(_)) => true,
            _ => false,
        };
        if !compatible {
            debug!(header = "content", "cannot append to a body of a different kind");
            return Outcome::NotApplicable;
        }

        match content {
            Content::Empty => (),
            Content::Bytes(bytes) => _ = self.content.append_bytes(&bytes),
            Content::Files(files) => {
                for file in files {
                    _ = self.content.append_file(file);
                }
            }
        }
        Outcome::Applied
    }

    fn clear_applied_coding(&mut self) {
        self.pre_coding_checksum = None;
        let Some(applied) = self.applied_coding.take() else {
            return;
        };

        self.headers.remove(&ResponseHeaderName::ContentEncoding);
        self.headers.remove(&ResponseHeaderName::ContentLength);
        if let AppliedCoding::Streaming { added_chunked: true, .. } = applied {
            let now_empty = match self.headers.get_mut(&ResponseHeaderName::TransferEncoding) {
                Some(HeaderValue::Encodings(encodings)) => {
                    encodings.retain(|encoding| *encoding != Encoding::Chunked);
                    encodings.is_empty()
                }
                _ => false,
            };
            if now_empty {
                self.headers.remove(&ResponseHeaderName::TransferEncoding);
            }
        }
        debug!(header = "content", "body replaced, content coding removed");
    }

    /// Whether [`Response::send_response_headers`] completed.
    #[must_use]
    pub fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    /// The status line, without a line terminator.
    #[must_use]
    pub fn status_line(&self) -> String {
        StatusCode::status_line(self.protocol, self.status)
    }

    /// Serializes every set header to `(name, value)` lines, in the order
    /// the headers were first set. The checksum fields aren't included,
    /// their values depend on the final header set.
    #[must_use]
    pub fn prepare_header_lines(&self) -> Vec<(ResponseHeaderName, String)> {
        self.headers.iter()
            .filter(|(name, _)| !is_checksum_field(*name))
            .map(|(name, value)| (*name, value.to_string()))
            .collect()
    }

    /// The `Checksum-Content` record, computing it from the body when it is
    /// automatic.
    pub(crate) fn resolve_checksum_content(&self) -> Result<Option<ChecksumRecord>, Error> {
        let Some(HeaderValue::Checksum(spec)) = self.headers.get(&ResponseHeaderName::ChecksumContent) else {
            return Ok(None);
        };

        match &spec.action {
            ChecksumAction::Auto => {
                let cached = self.pre_coding_checksum.as_ref()
                    .filter(|record| record.what == spec.what && record.algorithm == spec.algorithm);
                if let Some(record) = cached {
                    return Ok(Some(record.clone()));
                }

                let record = checksum_content(&self.content, spec.what, spec.algorithm, self.settings.content_chunk_size)?;
                if record.is_none() {
                    debug!(header = "checksum-content", algorithm = spec.algorithm.as_str(), "checksum can't be computed");
                }
                Ok(record)
            }
            ChecksumAction::Manual(digest) => Ok(Some(ChecksumRecord {
                what: spec.what,
                algorithm: spec.algorithm,
                digest: digest.clone(),
            })),
            ChecksumAction::None => Ok(None),
        }
    }

    /// Appends the checksum lines to the prepared lines. The content
    /// checksum comes first, so the header checksum sees the complete set.
    fn append_checksum_lines(&self, status_line: &str, lines: &mut Vec<(ResponseHeaderName, String)>) -> Result<(), Error> {
        if let Some(record) = self.resolve_checksum_content()? {
            lines.push((ResponseHeaderName::ChecksumContent, record.format()));
        }

        let included = match self.headers.get(&ResponseHeaderName::ChecksumHeaders) {
            Some(HeaderValue::HeaderNames(names)) => Some(names.as_slice()),
            _ => None,
        };

        let Some(HeaderValue::Checksum(spec)) = self.headers.get(&ResponseHeaderName::ChecksumHeader) else {
            if let Some(included) = included {
                lines.push((ResponseHeaderName::ChecksumHeaders, format_checksum_headers(included)));
            }
            return Ok(());
        };

        let covered = covered_headers(lines, included);
        let record = match &spec.action {
            ChecksumAction::Auto => checksum_header(status_line, lines, &covered, spec.what, spec.algorithm),
            ChecksumAction::Manual(digest) => Some(ChecksumRecord {
                what: spec.what,
                algorithm: spec.algorithm,
                digest: digest.clone(),
            }),
            ChecksumAction::None => None,
        };

        match record {
            Some(record) => {
                lines.push((ResponseHeaderName::ChecksumHeaders, format_checksum_headers(&covered)));
                lines.push((ResponseHeaderName::ChecksumHeader, record.format()));
            }
            None => debug!(header = "checksum-header", algorithm = spec.algorithm.as_str(), "checksum can't be computed"),
        }
        Ok(())
    }

    /// The complete list of header lines as they'll be sent, checksum
    /// fields included, in emission order.
    pub fn finalize_header_lines(&self) -> Result<Vec<(ResponseHeaderName, String)>, Error> {
        let mut lines = self.prepare_header_lines();
        self.append_checksum_lines(&self.status_line(), &mut lines)?;

        if self.settings.shuffle_headers {
            let mut rng = match self.settings.shuffle_seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            rng.shuffle(&mut lines);
        }

        Ok(lines)
    }

    /// Writes the status line and the header lines to the sink.
    ///
    /// The headers are sent at most once. Calling this again, or calling it
    /// when another layer already flushed the head of the response, is not
    /// applicable and writes nothing.
    pub fn send_response_headers(&mut self, sink: &mut impl HeaderSink) -> Result<Outcome, Error> {
        if self.headers_sent {
            warn!("response headers were already sent");
            return Ok(Outcome::NotApplicable);
        }
        if sink.headers_flushed() {
            warn!("response headers were already flushed by another layer");
            self.headers_sent = true;
            return Ok(Outcome::NotApplicable);
        }

        let status_line = self.status_line();
        let lines = self.finalize_header_lines()?;

        // Nothing can be taken back once the first byte is out.
        self.headers_sent = true;

        sink.write_status_line(&status_line)?;
        for (name, value) in &lines {
            sink.write_header(name.to_string_h1(), value)?;
        }
        sink.finish_headers()?;

        trace!(status = self.status, lines = lines.len(), "sent response headers");
        Ok(Outcome::Applied)
    }

    /// Writes the body to the sink, reading file-backed bodies in chunks.
    /// Not applicable before the headers are sent.
    pub fn send_response_content(&self, sink: &mut impl HeaderSink) -> Result<Outcome, Error> {
        if !self.headers_sent {
            debug!("response content can't precede the headers");
            return Ok(Outcome::NotApplicable);
        }

        let chunk_size = self.settings.content_chunk_size;
        match self.applied_coding {
            Some(AppliedCoding::Streaming { coding, level, .. }) => {
                let mut encoder = coding.encoder(BodyWriter { sink: &mut *sink }, Some(level))?;
                self.content.for_each_chunk(chunk_size, |chunk| encoder.write_all(chunk))?;
                encoder.finish()?;
            }
            _ => self.content.for_each_chunk(chunk_size, |chunk| sink.write_body(chunk))?,
        }
        sink.finish_body()?;
        Ok(Outcome::Applied)
    }
}

/// Feeds the output of a streaming encoder to the body of the sink.
struct BodyWriter<'a, S: HeaderSink> {
    sink: &'a mut S,
}

impl<S: HeaderSink> Write for BodyWriter<'_, S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write_body(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn is_checksum_field(name: ResponseHeaderName) -> bool {
    matches!(name,
        ResponseHeaderName::ChecksumContent | ResponseHeaderName::ChecksumHeader | ResponseHeaderName::ChecksumHeaders)
}
