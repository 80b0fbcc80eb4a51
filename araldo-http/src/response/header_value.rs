// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::fmt::Write;
use std::time::SystemTime;

use araldo_resources::{Charset, Encoding, MediaType};

use crate::{
    cache_control::CacheControl,
    checksum::{ChecksumAction, ChecksumSpec},
    conditional::EntityTag,
    date::format_http_date,
    range::ContentRange,
    request::WarningValue,
    uri::Uri,
    Method,
    ResponseHeaderName,
};

/// Represents the value of a response header.
///
/// Values are kept typed until the headers are sent, so setters can append
/// to lists and the encoding pipeline can rewrite `Content-Length` without
/// reparsing text. Headers sharing a syntax share a variant, and therefore a
/// formatter.
#[derive(Clone, Debug, PartialEq)]
pub enum HeaderValue {
    /// Only `true` is ever sent.
    Boolean(bool),
    CacheControl(CacheControl),

    /// A checksum field. An automatic spec gets its digest when the headers
    /// are sent.
    Checksum(ChecksumSpec),
    ContentRange(ContentRange),
    ContentType {
        media_type: MediaType,
        charset: Option<Charset>,
    },
    DateTime(SystemTime),
    Encodings(Vec<Encoding>),
    EntityTag(EntityTag),
    HeaderNames(Vec<ResponseHeaderName>),

    /// Elements of a comma-separated list, each validated by its setter.
    List(Vec<String>),
    Methods(Vec<Method>),
    Number(u64),
    RetryAfter(RetryAfter),
    StrictTransportSecurity(StrictTransportSecurity),

    /// A value validated by its setter and sent as is.
    String(String),
    Uri(Uri),
    Warning(WarningValue),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RetryAfter {
    Date(SystemTime),
    Seconds(u64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StrictTransportSecurity {
    pub max_age: u64,
    pub include_subdomains: bool,
    pub preload: bool,
}

fn append_joined<T>(response_text: &mut String, items: &[T], mut append: impl FnMut(&mut String, &T)) {
    for (index, item) in items.iter().enumerate() {
        if index != 0 {
            response_text.push_str(", ");
        }
        append(response_text, item);
    }
}

impl HeaderValue {
    /// Returns the value as a string, but does not convert it to a string if
    /// it is some other non-convertible type.
    #[must_use]
    pub fn as_str_no_convert(&self) -> Option<&str> {
        match self {
            HeaderValue::String(string) => Some(string),
            _ => None,
        }
    }

    /// The number, for `Content-Length`, `Age` and the other numeric
    /// headers.
    #[must_use]
    pub fn as_number(&self) -> Option<u64> {
        match self {
            HeaderValue::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn append_to_message(&self, response_text: &mut String) {
        match self {
            HeaderValue::Boolean(value) => {
                response_text.push_str(if *value { "true" } else { "false" });
            }
            HeaderValue::CacheControl(cache_control) => {
                _ = write!(response_text, "{cache_control}");
            }
            HeaderValue::Checksum(spec) => {
                debug_assert!(matches!(spec.action, ChecksumAction::Manual(_)), "automatic checksums are resolved when sending");
                if let ChecksumAction::Manual(digest) = &spec.action {
                    _ = write!(response_text, "{}:{}:{digest}", spec.what.as_str(), spec.algorithm.as_str());
                }
            }
            HeaderValue::ContentRange(content_range) => {
                _ = write!(response_text, "{content_range}");
            }
            HeaderValue::ContentType { media_type, charset } => {
                response_text.push_str(media_type.as_str());
                if let Some(charset) = charset {
                    response_text.push_str("; charset=");
                    response_text.push_str(charset.as_str());
                }
            }
            HeaderValue::DateTime(date_time) => {
                response_text.push_str(&format_http_date(*date_time));
            }
            HeaderValue::Encodings(encodings) => {
                append_joined(response_text, encodings, |text, encoding| text.push_str(encoding.http_identifier()));
            }
            HeaderValue::EntityTag(entity_tag) => {
                _ = write!(response_text, "{entity_tag}");
            }
            HeaderValue::HeaderNames(names) => {
                append_joined(response_text, names, |text, name| text.push_str(name.to_string_lowercase()));
            }
            HeaderValue::List(elements) => {
                append_joined(response_text, elements, |text, element| text.push_str(element));
            }
            HeaderValue::Methods(methods) => {
                append_joined(response_text, methods, |text, method| text.push_str(method.as_str()));
            }
            HeaderValue::Number(number) => {
                _ = write!(response_text, "{number}");
            }
            HeaderValue::RetryAfter(RetryAfter::Date(date_time)) => {
                response_text.push_str(&format_http_date(*date_time));
            }
            HeaderValue::RetryAfter(RetryAfter::Seconds(seconds)) => {
                _ = write!(response_text, "{seconds}");
            }
            HeaderValue::StrictTransportSecurity(policy) => {
                _ = write!(response_text, "max-age={}", policy.max_age);
                if policy.include_subdomains {
                    response_text.push_str("; includeSubDomains");
                }
                if policy.preload {
                    response_text.push_str("; preload");
                }
            }
            HeaderValue::String(string) => {
                response_text.push_str(string);
            }
            HeaderValue::Uri(uri) => {
                _ = write!(response_text, "{uri}");
            }
            HeaderValue::Warning(warning) => {
                _ = write!(response_text, "{warning}");
            }
        }
    }

    /// Get the header in string form.
    #[allow(clippy::inherent_to_string)]
    pub fn to_string(&self) -> String {
        let mut result = String::new();
        self.append_to_message(&mut result);
        result
    }
}

impl From<&'static str> for HeaderValue {
    fn from(value: &'static str) -> Self {
        HeaderValue::String(value.to_owned())
    }
}

impl From<String> for HeaderValue {
    fn from(value: String) -> Self {
        HeaderValue::String(value)
    }
}

impl From<SystemTime> for HeaderValue {
    fn from(value: SystemTime) -> Self {
        HeaderValue::DateTime(value)
    }
}
