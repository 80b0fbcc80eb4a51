// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! One setter per response header. Setters with an `append` flag add to the
//! list already set (skipping duplicates) when it is `true`, and replace it
//! otherwise. Headers that are sent one line per value (`Set-Cookie`,
//! `Link`, `Warning`) always append.

use std::time::SystemTime;

use araldo_resources::{Charset, ChecksumAlgorithm, Encoding, MediaType};
use tracing::debug;

use crate::{
    abnf,
    cache_control::{CacheControl, CacheDirective},
    checksum::{checksum_content, ChecksumAction, ChecksumSpec, ChecksumWhat},
    conditional::EntityTag,
    range::ContentRange,
    request::WarningValue,
    syntax,
    uri::Uri,
    Error,
    Method,
    Outcome,
    ResponseHeaderName,
    SetterError,
};

use super::{HeaderValue, Response, RetryAfter, StrictTransportSecurity};

fn token(value: &str) -> Result<String, SetterError> {
    match syntax::validate_token(value) {
        Ok(()) => Ok(value.to_owned()),
        Err(_) => Err(SetterError::InvalidToken(value.to_owned())),
    }
}

/// Free text: non-empty after trimming and without control characters.
fn field_text(header: &'static str, value: &str) -> Result<String, SetterError> {
    let value = value.trim_matches(syntax::is_whitespace_character);
    if value.is_empty() || syntax::validate_field_content(value.as_bytes()).is_err() {
        return Err(SetterError::InvalidValue { header, reason: "expected visible characters" });
    }
    Ok(value.to_owned())
}

fn quoted(header: &'static str, value: &str) -> Result<String, SetterError> {
    syntax::to_quoted_string(value).map_err(|_| SetterError::InvalidValue {
        header,
        reason: "the text contains control characters",
    })
}

fn uri(value: &str) -> Result<Uri, SetterError> {
    Uri::parse(value).map_err(|_| SetterError::InvalidUri(value.to_owned()))
}

/// ```text
/// challenge = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
/// ```
fn challenge(header: &'static str, value: &str) -> Result<String, SetterError> {
    let value = field_text(header, value)?;
    match syntax::scan_credentials(&value, 0).into_result() {
        Ok((_, position)) if position == value.len() => Ok(value),
        _ => Err(SetterError::InvalidValue { header, reason: "expected an auth-scheme with parameters" }),
    }
}

/// ```text
/// Language-Tag = 1*8ALPHA *( "-" 1*8alphanum )
/// ```
fn language_tag(value: &str) -> Result<String, SetterError> {
    let valid = value.split('-').enumerate().all(|(index, subtag)| {
        (1..=8).contains(&subtag.len()) && subtag.bytes().all(|byte| {
            if index == 0 { byte.is_ascii_alphabetic() } else { byte.is_ascii_alphanumeric() }
        })
    });

    if valid {
        Ok(value.to_owned())
    } else {
        Err(SetterError::InvalidValue { header: "Content-Language", reason: "expected a language tag" })
    }
}

impl HeaderValue {
    fn list_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            HeaderValue::List(list) => Some(list),
            _ => None,
        }
    }

    fn methods_mut(&mut self) -> Option<&mut Vec<Method>> {
        match self {
            HeaderValue::Methods(methods) => Some(methods),
            _ => None,
        }
    }

    fn encodings_mut(&mut self) -> Option<&mut Vec<Encoding>> {
        match self {
            HeaderValue::Encodings(encodings) => Some(encodings),
            _ => None,
        }
    }

    fn header_names_mut(&mut self) -> Option<&mut Vec<ResponseHeaderName>> {
        match self {
            HeaderValue::HeaderNames(names) => Some(names),
            _ => None,
        }
    }
}

impl Response {
    fn append_or_replace<T: PartialEq>(
        &mut self,
        header_name: ResponseHeaderName,
        item: T,
        append: bool,
        items_of: fn(&mut HeaderValue) -> Option<&mut Vec<T>>,
        wrap: fn(Vec<T>) -> HeaderValue,
    ) {
        if append {
            if let Some(items) = self.headers.get_mut(&header_name).and_then(items_of) {
                if !items.contains(&item) {
                    items.push(item);
                }
                return;
            }
        }
        self.headers.set(header_name, wrap(vec![item]));
    }

    fn append_to_list(&mut self, header_name: ResponseHeaderName, element: String, append: bool) {
        self.append_or_replace(header_name, element, append, HeaderValue::list_mut, HeaderValue::List);
    }

    /// `*`, or the origin (`scheme://host[:port]`) of an absolute URI.
    pub fn set_access_control_allow_origin(&mut self, origin: &str) -> Result<(), SetterError> {
        if origin == "*" {
            self.headers.set(ResponseHeaderName::AccessControlAllowOrigin, HeaderValue::from("*"));
            return Ok(());
        }

        let origin = uri(origin)?.origin().ok_or_else(|| SetterError::InvalidUri(origin.to_owned()))?;
        self.headers.set(ResponseHeaderName::AccessControlAllowOrigin, HeaderValue::String(origin));
        Ok(())
    }

    /// `true` is the only value the header defines, so `false` removes it.
    pub fn set_access_control_allow_credentials(&mut self, allow_credentials: bool) {
        if allow_credentials {
            self.headers.set(ResponseHeaderName::AccessControlAllowCredentials, HeaderValue::Boolean(true));
        } else {
            self.headers.remove(&ResponseHeaderName::AccessControlAllowCredentials);
        }
    }

    pub fn set_access_control_expose_headers(&mut self, header_name: &str, append: bool) -> Result<(), SetterError> {
        let header_name = token(header_name)?;
        self.append_to_list(ResponseHeaderName::AccessControlExposeHeaders, header_name, append);
        Ok(())
    }

    pub fn set_access_control_max_age(&mut self, seconds: u64) {
        self.headers.set(ResponseHeaderName::AccessControlMaxAge, HeaderValue::Number(seconds));
    }

    pub fn set_access_control_allow_methods(&mut self, method: Method, append: bool) {
        self.append_or_replace(ResponseHeaderName::AccessControlAllowMethods, method, append, HeaderValue::methods_mut, HeaderValue::Methods);
    }

    pub fn set_access_control_allow_headers(&mut self, header_name: &str, append: bool) -> Result<(), SetterError> {
        let header_name = token(header_name)?;
        self.append_to_list(ResponseHeaderName::AccessControlAllowHeaders, header_name, append);
        Ok(())
    }

    /// A media type with optional parameters, e.g. `text/example;charset=utf-8`.
    pub fn set_accept_patch(&mut self, media_type: &str, append: bool) -> Result<(), SetterError> {
        match syntax::scan_media_type(media_type, 0).into_result() {
            Ok((_, position)) if position == media_type.len() => {
                self.append_to_list(ResponseHeaderName::AcceptPatch, media_type.to_owned(), append);
                Ok(())
            }
            _ => Err(SetterError::InvalidValue { header: "Accept-Patch", reason: "expected a media type" }),
        }
    }

    /// The range unit, `bytes`, or `none`.
    pub fn set_accept_ranges(&mut self, range_unit: &str) -> Result<(), SetterError> {
        let range_unit = token(range_unit)?;
        self.headers.set(ResponseHeaderName::AcceptRanges, HeaderValue::String(range_unit));
        Ok(())
    }

    pub fn set_age(&mut self, seconds: u64) {
        self.headers.set(ResponseHeaderName::Age, HeaderValue::Number(seconds));
    }

    pub fn set_allow(&mut self, method: Method, append: bool) {
        self.append_or_replace(ResponseHeaderName::Allow, method, append, HeaderValue::methods_mut, HeaderValue::Methods);
    }

    /// Sets one directive. Without `append` the other directives are
    /// dropped; with it, the directive is added or its argument replaced.
    pub fn set_cache_control(&mut self, directive: CacheDirective, argument: Option<&str>, append: bool) -> Result<(), SetterError> {
        let mut cache_control = match self.headers.get(&ResponseHeaderName::CacheControl) {
            Some(HeaderValue::CacheControl(existing)) if append => existing.clone(),
            _ => CacheControl::new(),
        };

        cache_control.try_insert(directive, argument.map(str::to_owned))
            .map_err(|_| SetterError::InvalidValue { header: "Cache-Control", reason: "invalid argument for the directive" })?;
        self.headers.set(ResponseHeaderName::CacheControl, HeaderValue::CacheControl(cache_control));
        Ok(())
    }

    pub fn set_connection(&mut self, connection_option: &str, append: bool) -> Result<(), SetterError> {
        let connection_option = token(connection_option)?;
        self.append_to_list(ResponseHeaderName::Connection, connection_option, append);
        Ok(())
    }

    /// E.g. `attachment` with the file name `report.pdf`.
    pub fn set_content_disposition(&mut self, disposition: &str, filename: Option<&str>) -> Result<(), SetterError> {
        let mut value = token(disposition)?;
        if let Some(filename) = filename {
            value.push_str("; filename=");
            value.push_str(&quoted("Content-Disposition", filename)?);
        }
        self.headers.set(ResponseHeaderName::ContentDisposition, HeaderValue::String(value));
        Ok(())
    }

    /// The codings in the order they were applied.
    pub fn set_content_encoding(&mut self, encoding: Encoding, append: bool) -> Result<(), SetterError> {
        if matches!(encoding, Encoding::Chunked | Encoding::Trailers | Encoding::Identity) {
            return Err(SetterError::InvalidValue { header: "Content-Encoding", reason: "not a content coding" });
        }
        self.append_or_replace(ResponseHeaderName::ContentEncoding, encoding, append, HeaderValue::encodings_mut, HeaderValue::Encodings);
        Ok(())
    }

    pub fn set_content_language(&mut self, language_tag_value: &str, append: bool) -> Result<(), SetterError> {
        let tag = language_tag(language_tag_value)?;
        self.append_to_list(ResponseHeaderName::ContentLanguage, tag, append);
        Ok(())
    }

    /// Sets the length of the body, computing it from the body when `None`.
    ///
    /// A message with `Transfer-Encoding` can't have a `Content-Length`, so
    /// this is not applicable while `Transfer-Encoding` is set, unless
    /// `force` is given, which removes `Transfer-Encoding` instead.
    pub fn set_content_length(&mut self, length: Option<u64>, force: bool) -> Result<Outcome, Error> {
        if self.headers.contains(&ResponseHeaderName::TransferEncoding) {
            if !force {
                debug!(header = "content-length", "not applicable while transfer-encoding is set");
                return Ok(Outcome::NotApplicable);
            }
            self.headers.remove(&ResponseHeaderName::TransferEncoding);
        }

        let length = match length {
            Some(length) => length,
            None => self.content.size()?,
        };
        self.headers.set(ResponseHeaderName::ContentLength, HeaderValue::Number(length));
        Ok(Outcome::Applied)
    }

    pub fn set_content_location(&mut self, location: &str) -> Result<(), SetterError> {
        self.headers.set(ResponseHeaderName::ContentLocation, HeaderValue::Uri(uri(location)?));
        Ok(())
    }

    pub fn set_content_range(&mut self, content_range: ContentRange) -> Result<(), SetterError> {
        if !content_range.is_valid() {
            return Err(SetterError::InvalidValue { header: "Content-Range", reason: "the range is outside the complete length" });
        }
        self.headers.set(ResponseHeaderName::ContentRange, HeaderValue::ContentRange(content_range));
        Ok(())
    }

    pub fn set_content_type(&mut self, media_type: MediaType, charset: Option<Charset>) {
        self.headers.set(ResponseHeaderName::ContentType, HeaderValue::ContentType { media_type, charset });
    }

    /// `None` means now.
    pub fn set_date(&mut self, date: Option<SystemTime>) {
        self.headers.set(ResponseHeaderName::Date, HeaderValue::DateTime(date.unwrap_or_else(SystemTime::now)));
    }

    /// The moment the response was generated, as opposed to `Date`, which
    /// may be rewritten by caches. `None` means now.
    pub fn set_date_actual(&mut self, date: Option<SystemTime>) {
        self.headers.set(ResponseHeaderName::DateActual, HeaderValue::DateTime(date.unwrap_or_else(SystemTime::now)));
    }

    /// Sets the entity-tag. Without a tag, it is derived from the SHA-256 of
    /// the current body; weak tags use the partial digest.
    pub fn set_etag(&mut self, tag: Option<&str>, weak: bool) -> Result<(), Error> {
        let tag = match tag {
            Some(tag) => {
                if !tag.bytes().all(abnf::is_entity_tag_character) {
                    return Err(SetterError::InvalidValue { header: "ETag", reason: "expected etagc characters" }.into());
                }
                tag.to_owned()
            }
            None => {
                let what = if weak { ChecksumWhat::Partial } else { ChecksumWhat::Full };
                match checksum_content(&self.content, what, ChecksumAlgorithm::Sha256, self.settings.content_chunk_size)? {
                    Some(record) => record.digest,
                    None => return Err(SetterError::InvalidValue { header: "ETag", reason: "no digest for the body" }.into()),
                }
            }
        };

        self.headers.set(ResponseHeaderName::ETag, HeaderValue::EntityTag(EntityTag { tag, weak }));
        Ok(())
    }

    pub fn set_expires(&mut self, date: SystemTime) {
        self.headers.set(ResponseHeaderName::Expires, HeaderValue::DateTime(date));
    }

    pub fn set_last_modified(&mut self, date: SystemTime) {
        self.headers.set(ResponseHeaderName::LastModified, HeaderValue::DateTime(date));
    }

    /// Adds a `Link` line: `<uri>; name=value`.
    pub fn set_link(&mut self, target: &str, parameters: &[(&str, &str)]) -> Result<(), SetterError> {
        let mut value = format!("<{}>", uri(target)?);
        for (name, parameter) in parameters {
            value.push_str("; ");
            value.push_str(&token(name)?);
            value.push('=');
            if syntax::validate_token(parameter).is_ok() {
                value.push_str(parameter);
            } else {
                value.push_str(&quoted("Link", parameter)?);
            }
        }
        self.headers.append_possible_duplicate(ResponseHeaderName::Link, HeaderValue::String(value));
        Ok(())
    }

    pub fn set_location(&mut self, location: &str) -> Result<(), SetterError> {
        self.headers.set(ResponseHeaderName::Location, HeaderValue::Uri(uri(location)?));
        Ok(())
    }

    /// Pragma shares the directive syntax of `Cache-Control`.
    pub fn set_pragma(&mut self, value: &str) -> Result<(), SetterError> {
        let directives = CacheControl::parse(value)
            .map_err(|_| SetterError::InvalidValue { header: "Pragma", reason: "expected pragma directives" })?;
        self.headers.set(ResponseHeaderName::Pragma, HeaderValue::CacheControl(directives));
        Ok(())
    }

    pub fn set_proxy_authenticate(&mut self, challenge_value: &str) -> Result<(), SetterError> {
        let value = challenge("Proxy-Authenticate", challenge_value)?;
        self.headers.set(ResponseHeaderName::ProxyAuthenticate, HeaderValue::String(value));
        Ok(())
    }

    /// HTTP Public Key Pinning is deprecated and has no implementation.
    pub fn set_public_key_pins(&mut self, _pins: &str) -> Outcome {
        debug!(header = "public-key-pins", "unsupported header");
        Outcome::Unsupported
    }

    /// `Refresh: 5` or `Refresh: 5; url=/next`.
    pub fn set_refresh(&mut self, seconds: u64, target: Option<&str>) -> Result<(), SetterError> {
        let value = match target {
            Some(target) => format!("{seconds}; url={}", uri(target)?),
            None => seconds.to_string(),
        };
        self.headers.set(ResponseHeaderName::Refresh, HeaderValue::String(value));
        Ok(())
    }

    pub fn set_retry_after(&mut self, retry_after: RetryAfter) {
        self.headers.set(ResponseHeaderName::RetryAfter, HeaderValue::RetryAfter(retry_after));
    }

    pub fn set_server(&mut self, server: &str) -> Result<(), SetterError> {
        let value = field_text("Server", server)?;
        self.headers.set(ResponseHeaderName::Server, HeaderValue::String(value));
        Ok(())
    }

    /// Adds a `Set-Cookie` line. The cookie arrives serialized by its owner,
    /// this only checks that it starts with `name=`.
    pub fn set_cookie(&mut self, cookie: &str) -> Result<(), SetterError> {
        let cookie = field_text("Set-Cookie", cookie)?;
        let valid_name = cookie.split_once('=').is_some_and(|(name, _)| syntax::validate_token(name).is_ok());
        if !valid_name {
            return Err(SetterError::InvalidValue { header: "Set-Cookie", reason: "expected name=value" });
        }
        self.headers.append_possible_duplicate(ResponseHeaderName::SetCookie, HeaderValue::String(cookie));
        Ok(())
    }

    pub fn set_strict_transport_security(&mut self, policy: StrictTransportSecurity) {
        self.headers.set(ResponseHeaderName::StrictTransportSecurity, HeaderValue::StrictTransportSecurity(policy));
    }

    pub fn set_trailer(&mut self, header_name: &str, append: bool) -> Result<(), SetterError> {
        let header_name = token(header_name)?;
        self.append_to_list(ResponseHeaderName::Trailer, header_name, append);
        Ok(())
    }

    /// Setting a transfer coding removes `Content-Length`.
    pub fn set_transfer_encoding(&mut self, encoding: Encoding, append: bool) -> Result<(), SetterError> {
        if !encoding.is_transfer_coding() {
            return Err(SetterError::NotATransferCoding(encoding.http_identifier()));
        }

        if self.headers.remove(&ResponseHeaderName::ContentLength) {
            debug!(header = "transfer-encoding", "removed content-length");
        }
        self.append_or_replace(ResponseHeaderName::TransferEncoding, encoding, append, HeaderValue::encodings_mut, HeaderValue::Encodings);
        Ok(())
    }

    /// ```text
    /// protocol = protocol-name ["/" protocol-version]
    /// ```
    pub fn set_upgrade(&mut self, protocol: &str, append: bool) -> Result<(), SetterError> {
        let valid = match protocol.split_once('/') {
            Some((name, version)) => syntax::validate_token(name).is_ok() && syntax::validate_token(version).is_ok(),
            None => syntax::validate_token(protocol).is_ok(),
        };
        if !valid {
            return Err(SetterError::InvalidToken(protocol.to_owned()));
        }
        self.append_to_list(ResponseHeaderName::Upgrade, protocol.to_owned(), append);
        Ok(())
    }

    /// A request header name, or `*`.
    pub fn set_vary(&mut self, header_name: &str, append: bool) -> Result<(), SetterError> {
        let header_name = token(header_name)?;
        self.append_to_list(ResponseHeaderName::Vary, header_name, append);
        Ok(())
    }

    /// Adds a `Warning` line.
    pub fn set_warning(&mut self, warning: WarningValue) -> Result<(), SetterError> {
        if !(100..=999).contains(&warning.code) {
            return Err(SetterError::InvalidValue { header: "Warning", reason: "the code must have three digits" });
        }
        if warning.agent.is_empty() || !warning.agent.bytes().all(abnf::is_visible_character) {
            return Err(SetterError::InvalidValue { header: "Warning", reason: "expected a warn-agent" });
        }
        quoted("Warning", &warning.text)?;

        self.headers.append_possible_duplicate(ResponseHeaderName::Warning, HeaderValue::Warning(warning));
        Ok(())
    }

    pub fn set_www_authenticate(&mut self, challenge_value: &str) -> Result<(), SetterError> {
        let value = challenge("WWW-Authenticate", challenge_value)?;
        self.headers.set(ResponseHeaderName::WwwAuthenticate, HeaderValue::String(value));
        Ok(())
    }

    pub fn set_content_security_policy(&mut self, policy: &str) -> Result<(), SetterError> {
        let value = field_text("Content-Security-Policy", policy)?;
        self.headers.set(ResponseHeaderName::ContentSecurityPolicy, HeaderValue::String(value));
        Ok(())
    }

    /// The prefixed name some older browsers read.
    pub fn set_x_content_security_policy(&mut self, policy: &str) -> Result<(), SetterError> {
        let value = field_text("X-Content-Security-Policy", policy)?;
        self.headers.set(ResponseHeaderName::XContentSecurityPolicy, HeaderValue::String(value));
        Ok(())
    }

    /// `nosniff` is the only value, so `false` removes the header.
    pub fn set_x_content_type_options(&mut self, nosniff: bool) {
        if nosniff {
            self.headers.set(ResponseHeaderName::XContentTypeOptions, HeaderValue::from("nosniff"));
        } else {
            self.headers.remove(&ResponseHeaderName::XContentTypeOptions);
        }
    }

    /// E.g. `IE=edge`.
    pub fn set_x_ua_compatible(&mut self, value: &str) -> Result<(), SetterError> {
        let value = field_text("X-UA-Compatible", value)?;
        self.headers.set(ResponseHeaderName::XUaCompatible, HeaderValue::String(value));
        Ok(())
    }

    fn set_checksum(&mut self, header_name: ResponseHeaderName, spec: ChecksumSpec) -> Outcome {
        match &spec.action {
            ChecksumAction::None => {
                self.headers.remove(&header_name);
                return Outcome::Applied;
            }
            ChecksumAction::Auto if spec.what == ChecksumWhat::Signed || !spec.algorithm.is_computable() => {
                debug!(header = header_name.to_string_lowercase(), algorithm = spec.algorithm.as_str(), "checksum can't be computed");
                return Outcome::Unsupported;
            }
            _ => (),
        }

        self.headers.set(header_name, HeaderValue::Checksum(spec));
        Outcome::Applied
    }

    /// The checksum over the status line and the header lines, computed
    /// when the headers are sent.
    pub fn set_checksum_header(&mut self, spec: ChecksumSpec) -> Outcome {
        self.set_checksum(ResponseHeaderName::ChecksumHeader, spec)
    }

    /// Restricts the header checksum to these headers. Without this list,
    /// every header is covered.
    pub fn set_checksum_headers(&mut self, header_name: ResponseHeaderName, append: bool) -> Result<(), SetterError> {
        if matches!(header_name,
            ResponseHeaderName::ChecksumContent | ResponseHeaderName::ChecksumHeader | ResponseHeaderName::ChecksumHeaders) {
            return Err(SetterError::InvalidValue { header: "Checksum-Headers", reason: "a checksum field can't cover itself" });
        }
        self.append_or_replace(ResponseHeaderName::ChecksumHeaders, header_name, append, HeaderValue::header_names_mut, HeaderValue::HeaderNames);
        Ok(())
    }

    /// The checksum over the body before any content coding.
    pub fn set_checksum_content(&mut self, spec: ChecksumSpec) -> Outcome {
        self.set_checksum(ResponseHeaderName::ChecksumContent, spec)
    }

    pub fn set_content_revision(&mut self, revision: u64) {
        self.headers.set(ResponseHeaderName::ContentRevision, HeaderValue::Number(revision));
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use araldo_resources::Content;

    use super::*;
    use crate::ResponseSettings;
    use rstest::rstest;

    fn response() -> Response {
        Response::new(ResponseSettings { shuffle_headers: false, ..ResponseSettings::default() })
    }

    fn value(response: &Response, header_name: ResponseHeaderName) -> Option<String> {
        response.get(header_name).map(HeaderValue::to_string)
    }

    #[test]
    fn test_transfer_encoding_clears_content_length() {
        let mut response = response();
        assert_eq!(response.set_content_length(Some(10), false).unwrap(), Outcome::Applied);
        response.set_transfer_encoding(Encoding::Chunked, false).unwrap();

        assert!(response.get(ResponseHeaderName::ContentLength).is_none());
        assert_eq!(value(&response, ResponseHeaderName::TransferEncoding).as_deref(), Some("chunked"));
    }

    #[test]
    fn test_content_length_with_transfer_encoding() {
        let mut response = response();
        response.set_transfer_encoding(Encoding::Chunked, false).unwrap();

        let before = response.headers().clone();
        assert_eq!(response.set_content_length(Some(10), false).unwrap(), Outcome::NotApplicable);
        assert_eq!(response.headers(), &before);

        assert_eq!(response.set_content_length(Some(10), true).unwrap(), Outcome::Applied);
        assert!(response.get(ResponseHeaderName::TransferEncoding).is_none());
        assert_eq!(value(&response, ResponseHeaderName::ContentLength).as_deref(), Some("10"));
    }

    #[test]
    fn test_automatic_content_length() {
        let mut response = response();
        _ = response.set_content(Content::Bytes(b"hello world".to_vec()), false);
        assert!(response.set_content_length(None, false).unwrap().is_applied());
        assert_eq!(response.get(ResponseHeaderName::ContentLength).and_then(HeaderValue::as_number), Some(11));
    }

    #[test]
    fn test_not_a_transfer_coding() {
        let mut response = response();
        assert_eq!(response.set_transfer_encoding(Encoding::Brotli, false), Err(SetterError::NotATransferCoding("br")));
        assert!(response.set_content_encoding(Encoding::Chunked, false).is_err());
    }

    #[test]
    fn test_automatic_etag() {
        let mut response = response();
        _ = response.set_content(Content::Bytes(b"abc".to_vec()), false);

        response.set_etag(None, false).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::ETag).as_deref(),
            Some("\"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\""));

        response.set_etag(None, true).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::ETag).as_deref(), Some("W/\"ba7816bf8\""));

        response.set_etag(Some("v2"), false).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::ETag).as_deref(), Some("\"v2\""));
        assert!(response.set_etag(Some("has\"quote"), false).is_err());
    }

    #[test]
    fn test_lists_append_and_replace() {
        let mut response = response();
        response.set_vary("accept-encoding", true).unwrap();
        response.set_vary("accept-language", true).unwrap();
        response.set_vary("accept-encoding", true).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::Vary).as_deref(), Some("accept-encoding, accept-language"));

        response.set_vary("*", false).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::Vary).as_deref(), Some("*"));
        assert_eq!(response.set_vary("user agent", true), Err(SetterError::InvalidToken("user agent".to_owned())));

        response.set_allow(Method::Get, true);
        response.set_allow(Method::Head, true);
        assert_eq!(value(&response, ResponseHeaderName::Allow).as_deref(), Some("GET, HEAD"));
    }

    #[test]
    fn test_cache_control() {
        let mut response = response();
        response.set_cache_control(CacheDirective::Public, None, false).unwrap();
        response.set_cache_control(CacheDirective::MaxAge, Some("3600"), true).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::CacheControl).as_deref(), Some("public, max-age=3600"));

        assert!(response.set_cache_control(CacheDirective::MaxAge, Some("soon"), true).is_err());
        response.set_cache_control(CacheDirective::NoStore, None, false).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::CacheControl).as_deref(), Some("no-store"));
    }

    #[rstest]
    #[case("*", Ok("*"))]
    #[case("https://example.org/path", Ok("https://example.org"))]
    #[case("http://localhost:8080", Ok("http://localhost:8080"))]
    #[case("/relative", Err(()))]
    #[case("http://exa mple.org", Err(()))]
    fn test_access_control_allow_origin(#[case] origin: &str, #[case] expected: Result<&str, ()>) {
        let mut response = response();
        let result = response.set_access_control_allow_origin(origin);
        match expected {
            Ok(expected) => {
                assert!(result.is_ok());
                assert_eq!(value(&response, ResponseHeaderName::AccessControlAllowOrigin).as_deref(), Some(expected));
            }
            Err(()) => assert!(result.is_err()),
        }
    }

    #[test]
    fn test_multiple_line_headers() {
        let mut response = response();
        response.set_cookie("a=1; Path=/").unwrap();
        response.set_cookie("b=2").unwrap();
        assert!(response.set_cookie("no-equals").is_err());
        assert_eq!(response.headers().get_all(&ResponseHeaderName::SetCookie).count(), 2);

        response.set_link("/style.css", &[("rel", "preload"), ("title", "main style")]).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::Link).as_deref(), Some("</style.css>; rel=preload; title=\"main style\""));

        response.set_warning(WarningValue {
            code: 110,
            agent: "araldo".to_owned(),
            text: "Response is stale".to_owned(),
            date: None,
        }).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::Warning).as_deref(), Some("110 araldo \"Response is stale\""));
    }

    #[test]
    fn test_public_key_pins_is_unsupported() {
        let mut response = response();
        assert_eq!(response.set_public_key_pins("pin-sha256=\"abc\"; max-age=10"), Outcome::Unsupported);
        assert!(response.get(ResponseHeaderName::PublicKeyPins).is_none());
    }

    #[test]
    fn test_misc_setters() {
        let mut response = response();
        response.set_content_disposition("attachment", Some("report \"final\".pdf")).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::ContentDisposition).as_deref(),
            Some("attachment; filename=\"report \\\"final\\\".pdf\""));

        response.set_content_language("en-US", true).unwrap();
        response.set_content_language("nl", true).unwrap();
        assert!(response.set_content_language("englishlanguage", true).is_err());
        assert_eq!(value(&response, ResponseHeaderName::ContentLanguage).as_deref(), Some("en-US, nl"));

        response.set_refresh(5, Some("/next")).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::Refresh).as_deref(), Some("5; url=/next"));

        response.set_retry_after(RetryAfter::Date(UNIX_EPOCH + Duration::from_secs(784111777)));
        assert_eq!(value(&response, ResponseHeaderName::RetryAfter).as_deref(), Some("Sun, 06 Nov 1994 08:49:37 GMT"));

        response.set_www_authenticate("Basic realm=\"simple\"").unwrap();
        assert!(response.set_www_authenticate("").is_err());

        response.set_upgrade("HTTP/2.0", false).unwrap();
        assert!(response.set_upgrade("HTTP/", false).is_err());

        response.set_pragma("no-cache").unwrap();
        assert_eq!(value(&response, ResponseHeaderName::Pragma).as_deref(), Some("no-cache"));

        response.set_accept_patch("text/example;charset=utf-8", false).unwrap();
        assert!(response.set_accept_patch("text", false).is_err());

        assert!(response.set_content_range(ContentRange::Range { start: 5, end: 1, complete_length: None }).is_err());
        response.set_access_control_allow_credentials(true);
        response.set_access_control_allow_credentials(false);
        assert!(response.get(ResponseHeaderName::AccessControlAllowCredentials).is_none());
    }

    #[test]
    fn test_checksum_setters() {
        let mut response = response();
        assert_eq!(response.set_checksum_content(ChecksumSpec::auto(ChecksumAlgorithm::Pg)), Outcome::Unsupported);
        assert!(response.set_checksum_content(ChecksumSpec::auto(ChecksumAlgorithm::Crc32)).is_applied());
        assert!(response.set_checksum_content(ChecksumSpec::none()).is_applied());
        assert!(response.get(ResponseHeaderName::ChecksumContent).is_none());

        response.set_checksum_headers(ResponseHeaderName::ContentType, true).unwrap();
        response.set_checksum_headers(ResponseHeaderName::ETag, true).unwrap();
        assert_eq!(value(&response, ResponseHeaderName::ChecksumHeaders).as_deref(), Some("content-type, etag"));
        assert!(response.set_checksum_headers(ResponseHeaderName::ChecksumHeader, true).is_err());
    }
}
