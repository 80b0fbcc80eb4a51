// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Decoding of the request header block into typed values.
//!
//! Decoding never fails as a whole: every field ends up either
//! [`Parsed::NotPresent`], [`Parsed::Invalid`] or [`Parsed::Valid`], so one
//! malformed field doesn't hide the others.

pub mod decoders;
pub mod user_agent;

use std::time::SystemTime;

use araldo_resources::{Charset, Encoding, Language, MediaRange};
use hashbrown::HashMap;

use crate::{
    cache_control::{CacheControl, CacheDirective},
    checksum::ChecksumRecord,
    conditional::{ConditionalMatchSet, IfRange, Preconditions},
    negotiation::NegotiationTable,
    range::HttpRangeList,
    syntax::{self, Credentials, MediaTypeSyntax},
    uri::{Authority, Uri},
    DecodeSettings,
    HttpParseError,
    Method,
    Parsed,
    RawHeaderMap,
    RequestHeaderName,
};

pub use decoders::{ViaEntry, WarningValue};
pub use user_agent::{Agent, Engine, Product, UserAgent};

#[derive(Clone, Debug, Default)]
pub struct RequestHeaders {
    pub accept: Parsed<NegotiationTable<MediaRange>>,
    pub accept_charset: Parsed<NegotiationTable<Charset>>,
    pub accept_datetime: Parsed<SystemTime>,
    pub accept_encoding: Parsed<NegotiationTable<Encoding>>,
    pub accept_language: Parsed<NegotiationTable<Language>>,
    pub access_control_request_headers: Parsed<Vec<String>>,
    pub access_control_request_method: Parsed<Method>,
    pub authorization: Parsed<Credentials>,

    /// When absent, `Pragma: no-cache` fills this in.
    pub cache_control: Parsed<CacheControl>,
    pub checksum_content: Parsed<ChecksumRecord>,
    pub checksum_header: Parsed<ChecksumRecord>,
    pub checksum_headers: Parsed<Vec<String>>,
    pub connection: Parsed<Vec<String>>,
    pub content_encoding: Parsed<Vec<Encoding>>,
    pub content_length: Parsed<u64>,
    pub content_type: Parsed<MediaTypeSyntax>,
    pub cookie: Parsed<Vec<(String, String)>>,
    pub date: Parsed<SystemTime>,
    pub expect: Parsed<Vec<String>>,
    pub from: Parsed<String>,
    pub host: Parsed<Authority>,
    pub if_match: Parsed<ConditionalMatchSet>,
    pub if_modified_since: Parsed<SystemTime>,
    pub if_none_match: Parsed<ConditionalMatchSet>,
    pub if_range: Parsed<IfRange>,
    pub if_unmodified_since: Parsed<SystemTime>,
    pub max_forwards: Parsed<u32>,
    pub origin: Parsed<Uri>,
    pub pragma: Parsed<CacheControl>,
    pub proxy_authorization: Parsed<Credentials>,
    pub range: Parsed<HttpRangeList>,
    pub referer: Parsed<Uri>,
    pub te: Parsed<NegotiationTable<Encoding>>,
    pub trailer: Parsed<Vec<String>>,
    pub transfer_encoding: Parsed<Vec<Encoding>>,
    pub upgrade: Parsed<Vec<Product>>,
    pub user_agent: Parsed<UserAgent>,
    pub via: Parsed<Vec<ViaEntry>>,
    pub warning: Parsed<Vec<WarningValue>>,

    /// Known fields that are only kept as (lowercased, truncated) text.
    rawish: HashMap<RequestHeaderName, String>,

    /// Fields outside the registry, keyed by the lowercased name.
    unknown: HashMap<String, String>,
}

fn store<T>(slot: &mut Parsed<T>, header: &RequestHeaderName, result: Result<T, HttpParseError>) {
    if let Err(error) = &result {
        tracing::debug!(header = %header.to_string_lowercase(), error = error.as_ref(), "invalid request header");
    }
    *slot = Parsed::from_result(result);
}

/// Cuts `value` to at most `max_length` bytes, on a character boundary.
fn truncate(value: &str, max_length: usize) -> &str {
    if value.len() <= max_length {
        return value;
    }

    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    tracing::debug!(length = value.len(), max_length, "header value truncated");
    &value[..end]
}

/// Lowercasing can make a character longer, so the cap is applied again
/// afterwards.
fn normalize(value: &str, max_length: usize) -> String {
    let lowercase = truncate(value.trim_matches(syntax::is_whitespace_character), max_length).to_lowercase();
    truncate(&lowercase, max_length).to_owned()
}

impl RequestHeaders {
    /// Decodes every field of the raw header map. Fields are independent, so
    /// the order of the map doesn't matter.
    #[must_use]
    pub fn decode(raw: &RawHeaderMap, settings: &DecodeSettings) -> Self {
        let mut headers = Self::default();
        let mut recognized = 0_usize;

        for (name, value) in raw.iter() {
            let header = RequestHeaderName::from(name);
            if header.is_known() {
                recognized += 1;
                headers.decode_field(&header, &value, settings);
            } else {
                headers.insert_unknown(name, &value, settings.max_unknown_length);
            }
        }

        headers.apply_pragma_fallback();

        tracing::trace!(recognized, unknown = headers.unknown.len(), "decoded request headers");
        headers
    }

    fn decode_field(&mut self, header: &RequestHeaderName, value: &str, settings: &DecodeSettings) {
        match header {
            RequestHeaderName::Accept => store(&mut self.accept, header, decoders::accept(value)),
            RequestHeaderName::AcceptCharset => store(&mut self.accept_charset, header, decoders::accept_charset(value)),
            RequestHeaderName::AcceptDatetime => store(&mut self.accept_datetime, header, decoders::timestamp(value)),
            RequestHeaderName::AcceptEncoding => store(&mut self.accept_encoding, header, decoders::accept_encoding(value)),
            RequestHeaderName::AcceptLanguage => store(&mut self.accept_language, header, decoders::accept_language(value)),
            RequestHeaderName::AccessControlRequestHeaders => store(&mut self.access_control_request_headers, header,
                decoders::token_list(truncate(value, settings.max_access_control_length))),
            RequestHeaderName::AccessControlRequestMethod => store(&mut self.access_control_request_method, header,
                decoders::access_control_request_method(truncate(value, settings.max_access_control_length))),
            RequestHeaderName::Authorization => store(&mut self.authorization, header,
                bounded_credentials(value, settings.max_authorization_length)),
            RequestHeaderName::CacheControl => store(&mut self.cache_control, header, decoders::cache_control(value)),
            RequestHeaderName::ChecksumContent => store(&mut self.checksum_content, header, decoders::checksum_record(value)),
            RequestHeaderName::ChecksumHeader => store(&mut self.checksum_header, header, decoders::checksum_record(value)),
            RequestHeaderName::ChecksumHeaders => store(&mut self.checksum_headers, header, decoders::checksum_headers(value)),
            RequestHeaderName::Connection => store(&mut self.connection, header, decoders::token_list(value)),
            RequestHeaderName::ContentEncoding => store(&mut self.content_encoding, header, decoders::codings(value)),
            RequestHeaderName::ContentLength => store(&mut self.content_length, header, decoders::content_length(value)),
            RequestHeaderName::ContentType => store(&mut self.content_type, header, decoders::content_type(value)),
            RequestHeaderName::Cookie => store(&mut self.cookie, header, decoders::cookie(value)),
            RequestHeaderName::Date => store(&mut self.date, header, decoders::timestamp(value)),
            RequestHeaderName::Expect => store(&mut self.expect, header, decoders::token_list(value)),
            RequestHeaderName::From => store(&mut self.from, header, decoders::from(value)),
            RequestHeaderName::Host => store(&mut self.host, header, decoders::host(value)),
            RequestHeaderName::IfMatch => store(&mut self.if_match, header, decoders::if_match(value)),
            RequestHeaderName::IfModifiedSince => store(&mut self.if_modified_since, header, decoders::timestamp(value)),
            RequestHeaderName::IfNoneMatch => store(&mut self.if_none_match, header, decoders::if_none_match(value)),
            RequestHeaderName::IfRange => store(&mut self.if_range, header, decoders::if_range(value)),
            RequestHeaderName::IfUnmodifiedSince => store(&mut self.if_unmodified_since, header, decoders::timestamp(value)),
            RequestHeaderName::MaxForwards => store(&mut self.max_forwards, header, decoders::max_forwards(value)),
            RequestHeaderName::Origin => store(&mut self.origin, header, decoders::origin(value)),
            RequestHeaderName::Pragma => store(&mut self.pragma, header, decoders::pragma(value)),
            RequestHeaderName::ProxyAuthorization => store(&mut self.proxy_authorization, header,
                bounded_credentials(value, settings.max_authorization_length)),
            RequestHeaderName::Range => store(&mut self.range, header, decoders::range(value)),
            RequestHeaderName::Referer => store(&mut self.referer, header, decoders::referer(value)),
            RequestHeaderName::TE => store(&mut self.te, header, decoders::te(value)),
            RequestHeaderName::Trailer => store(&mut self.trailer, header, decoders::token_list(value)),
            RequestHeaderName::TransferEncoding => store(&mut self.transfer_encoding, header, decoders::codings(value)),
            RequestHeaderName::Upgrade => store(&mut self.upgrade, header, decoders::upgrade(value)),
            RequestHeaderName::UserAgent => store(&mut self.user_agent, header, decoders::user_agent(value)),
            RequestHeaderName::Via => store(&mut self.via, header, decoders::via(value)),
            RequestHeaderName::Warning => store(&mut self.warning, header, decoders::warning(value)),

            RequestHeaderName::XForwardedFor => self.insert_rawish(header, value, settings.max_x_forwarded_for_length),
            RequestHeaderName::XForwardedHost => self.insert_rawish(header, value, settings.max_x_forwarded_host_length),
            RequestHeaderName::XForwardedProto => self.insert_rawish(header, value, settings.max_x_forwarded_proto_length),
            RequestHeaderName::XRequestedWith => self.insert_rawish(header, value, settings.max_x_requested_with_length),
            _ => self.insert_rawish(header, value, settings.max_rawish_length),
        }
    }

    fn insert_rawish(&mut self, header: &RequestHeaderName, value: &str, max_length: usize) {
        let value = normalize(value, max_length);
        if !value.is_empty() {
            self.rawish.insert(header.clone(), value);
        }
    }

    fn insert_unknown(&mut self, name: &str, value: &str, max_length: usize) {
        let name = name.trim_matches(syntax::is_whitespace_character).to_ascii_lowercase();
        let value = normalize(value, max_length);
        if !name.is_empty() && !value.is_empty() {
            self.unknown.insert(name, value);
        }
    }

    /// `Pragma: no-cache` stands in for `Cache-Control: no-cache`, but only
    /// when the client sent no `Cache-Control` at all.
    fn apply_pragma_fallback(&mut self) {
        if self.cache_control.is_present() {
            return;
        }

        if self.pragma.valid().is_some_and(|pragma| pragma.contains(&CacheDirective::NoCache)) {
            self.cache_control = Parsed::Valid(CacheControl::no_cache());
        }
    }

    /// The value of a field outside the registry, looked up ignoring case.
    #[must_use]
    pub fn unknown(&self, name: &str) -> Option<&str> {
        self.unknown.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn unknown_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.unknown.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// The text of a known field that isn't decoded further, such as
    /// `Sec-Fetch-Mode` or `X-Forwarded-For`.
    #[must_use]
    pub fn rawish(&self, header: &RequestHeaderName) -> Option<&str> {
        self.rawish.get(header).map(String::as_str)
    }

    /// The conditional fields, ready for [`Preconditions::evaluate`]. Invalid
    /// fields are treated as absent.
    #[must_use]
    pub fn preconditions(&self) -> Preconditions {
        Preconditions {
            if_match: self.if_match.valid().cloned(),
            if_unmodified_since: self.if_unmodified_since.valid().copied(),
            if_none_match: self.if_none_match.valid().cloned(),
            if_modified_since: self.if_modified_since.valid().copied(),
        }
    }
}

/// Credentials above the limit are rejected instead of truncated, since a
/// truncated token would silently become a different one.
fn bounded_credentials(value: &str, max_length: usize) -> Result<Credentials, HttpParseError> {
    if value.len() > max_length {
        return Err(HttpParseError::InvalidCredentials);
    }
    decoders::credentials(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(fields: &[(&str, &str)]) -> RequestHeaders {
        let raw: RawHeaderMap = fields.iter().copied().collect();
        RequestHeaders::decode(&raw, &DecodeSettings::default())
    }

    #[test]
    fn test_one_bad_field_doesnt_block_others() {
        let headers = decode(&[
            ("Content-Length", "12abc"),
            ("Accept-Language", "en;q=0.5, fr;q=0.9"),
            ("If-Modified-Since", "now"),
        ]);
        assert_eq!(headers.content_length, Parsed::Invalid(HttpParseError::TrailingCharacters));
        assert_eq!(headers.if_modified_since, Parsed::Invalid(HttpParseError::InvalidDate));
        assert!(headers.accept_language.is_valid());
        assert_eq!(headers.date, Parsed::NotPresent);
    }

    #[test]
    fn test_empty_value_is_invalid() {
        let headers = decode(&[("Accept", "   ")]);
        assert_eq!(headers.accept.error(), Some(HttpParseError::FieldValueEmpty));
    }

    #[test]
    fn test_unknown_header_is_preserved() {
        let headers = decode(&[("X-Custom", "  Hello ")]);
        assert_eq!(headers.unknown("x-custom"), Some("hello"));
        assert_eq!(headers.unknown("X-CUSTOM"), Some("hello"));
        assert_eq!(headers.unknown("x-other"), None);
    }

    #[test]
    fn test_unknown_header_is_capped() {
        let long = "a".repeat(1000);
        let raw: RawHeaderMap = [("X-Long", long.as_str())].into_iter().collect();
        let settings = DecodeSettings { max_unknown_length: 10, ..Default::default() };
        let headers = RequestHeaders::decode(&raw, &settings);
        assert_eq!(headers.unknown("x-long"), Some("aaaaaaaaaa"));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "h");
        assert_eq!(truncate("héllo", 3), "hé");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_rawish() {
        let headers = decode(&[("Sec-Fetch-Mode", "Navigate"), ("X-Forwarded-Proto", "HTTPS")]);
        assert_eq!(headers.rawish(&RequestHeaderName::SecFetchMode), Some("navigate"));
        assert_eq!(headers.rawish(&RequestHeaderName::XForwardedProto), Some("https"));
        assert_eq!(headers.unknown("sec-fetch-mode"), None);
    }

    #[test]
    fn test_pragma_fallback() {
        let headers = decode(&[("Pragma", "no-cache")]);
        assert_eq!(headers.cache_control, Parsed::Valid(CacheControl::no_cache()));

        let headers = decode(&[("Pragma", "no-cache"), ("Cache-Control", "max-age=60")]);
        let cache_control = headers.cache_control.valid().unwrap();
        assert!(!cache_control.contains(&CacheDirective::NoCache));
        assert_eq!(cache_control.seconds(&CacheDirective::MaxAge), Some(60));
    }

    #[test]
    fn test_checksum_underscore_spelling() {
        let headers = decode(&[("checksum_content", "full:md5:dGVzdA==")]);
        assert!(headers.checksum_content.is_valid());
    }

    #[test]
    fn test_authorization_limit() {
        let token = "a".repeat(5000);
        let value = format!("Bearer {token}");
        let headers = decode(&[("Authorization", value.as_str())]);
        assert_eq!(headers.authorization, Parsed::Invalid(HttpParseError::InvalidCredentials));

        let headers = decode(&[("Authorization", "Bearer abc")]);
        assert_eq!(headers.authorization.valid().map(|credentials| credentials.scheme.as_str()), Some("bearer"));
    }

    #[test]
    fn test_preconditions_from_headers() {
        let headers = decode(&[("If-None-Match", r#""abc", W/"def""#), ("If-Match", "garbage")]);
        let preconditions = headers.preconditions();
        assert!(preconditions.if_none_match.is_some());
        assert!(preconditions.if_match.is_none());
    }
}
