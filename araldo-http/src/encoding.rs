// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Picks the content coding for the response and applies it to the body.

use araldo_resources::{Content, ContentCoding, Encoding};
use tracing::{debug, trace};

use crate::{
    checksum::{ChecksumAction, ChecksumRecord},
    negotiation::NegotiationTable,
    response::{AppliedCoding, HeaderValue, Response},
    Error,
    Outcome,
    ResponseHeaderName,
};

/// The order in which the server prefers codings the client weighs the
/// same. `lzo` is recognised but there is no codec for it.
const PREFERENCE: [Encoding; 5] = [
    Encoding::Gzip,
    Encoding::Deflate,
    Encoding::Bzip2,
    Encoding::Lzo,
    Encoding::Brotli,
];

/// Picks the coding to apply, given the `Accept-Encoding` table of the
/// request. Weights are walked heaviest first; within one weight the
/// server preference decides. `None` means the body is sent as is.
///
/// A `*` choice stands for every coding the client didn't list by name.
#[must_use]
pub fn select_content_coding(accept_encoding: &NegotiationTable<Encoding>) -> Option<ContentCoding> {
    let listed = |encoding: Encoding| accept_encoding.iter().any(|choice| choice.resolved_code == Some(encoding));

    for weight in accept_encoding.weights() {
        if weight <= 0.0 {
            break;
        }

        let bucket = accept_encoding.bucket(weight);
        let has_wildcard = bucket.iter().any(|choice| choice.is_wildcard());
        for encoding in PREFERENCE {
            let offered = bucket.iter().any(|choice| choice.resolved_code == Some(encoding))
                || (has_wildcard && !listed(encoding));
            if !offered {
                continue;
            }

            match encoding.content_coding() {
                Some(coding) => return Some(coding),
                None => trace!(coding = encoding.http_identifier(), "no codec, skipped"),
            }
        }
    }

    None
}

impl Response {
    /// Applies the content coding to the body.
    ///
    /// The body is buffered when it is smaller than `max_buffered` bytes (or
    /// always, without a ceiling), compressed at once, and `Content-Length`
    /// is updated. Larger file-backed bodies are compressed while they are
    /// sent; their length isn't known up front, so `Content-Length` is
    /// replaced by `Transfer-Encoding: chunked`.
    ///
    /// An automatic `Checksum-Content` is computed first, since it covers
    /// the body before the coding. A body is encoded at most once.
    pub fn encode_response_content(&mut self, coding: Option<ContentCoding>, level: Option<u32>, max_buffered: Option<u64>) -> Result<Outcome, Error> {
        let Some(coding) = coding else {
            debug!("no content coding selected, body is sent as is");
            return Ok(Outcome::NotApplicable);
        };
        let level = coding.resolve_level(level)?;

        if let Some(applied) = self.applied_coding {
            debug!(coding = coding.http_identifier(), ?applied, "body is already encoded");
            return Ok(Outcome::NotApplicable);
        }
        if self.content.is_empty() {
            debug!(coding = coding.http_identifier(), "nothing to encode");
            return Ok(Outcome::NotApplicable);
        }

        let pre_coding_checksum = self.pre_coding_checksum()?;

        match self.content.read_to_vec(max_buffered)? {
            Some(data) => {
                let encoded = coding.encode(&data, Some(level))?;
                debug!(coding = coding.http_identifier(), level, from = data.len(), to = encoded.len(), "encoded buffered body");

                self.content = Content::Bytes(encoded);
                if !self.headers.contains(&ResponseHeaderName::TransferEncoding) {
                    let length = self.content.size()?;
                    self.headers.set(ResponseHeaderName::ContentLength, HeaderValue::Number(length));
                }
                self.applied_coding = Some(AppliedCoding::Buffered(coding));
            }
            None => {
                debug!(coding = coding.http_identifier(), level, "body exceeds the buffer ceiling, encoding while streaming");
                let added_chunked = !matches!(self.headers.get(&ResponseHeaderName::TransferEncoding),
                    Some(HeaderValue::Encodings(encodings)) if encodings.contains(&Encoding::Chunked));
                self.set_transfer_encoding(Encoding::Chunked, true)?;
                self.applied_coding = Some(AppliedCoding::Streaming { coding, level, added_chunked });
            }
        }

        self.pre_coding_checksum = pre_coding_checksum;
        self.headers.set(ResponseHeaderName::ContentEncoding, HeaderValue::Encodings(vec![Encoding::from(coding)]));
        Ok(Outcome::Applied)
    }

    /// The automatic `Checksum-Content` over the body as it is now.
    fn pre_coding_checksum(&self) -> Result<Option<ChecksumRecord>, Error> {
        match self.headers.get(&ResponseHeaderName::ChecksumContent) {
            Some(HeaderValue::Checksum(spec)) if spec.action == ChecksumAction::Auto => self.resolve_checksum_content(),
            _ => Ok(None),
        }
    }
}
