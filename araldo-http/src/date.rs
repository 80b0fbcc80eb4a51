// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Strict HTTP dates. A value is only accepted when formatting the parsed
//! timestamp again reproduces the received text, which rejects the relative
//! and loosely formatted dates a lenient parser would take (`now`,
//! `Sun, 6 Nov 1994 ...`, a weekday that doesn't match the date).
//!
//! # References
//! * [RFC 9110 Section 5.6.7](https://www.rfc-editor.org/rfc/rfc9110.html#name-date-time-formats)
//! * [RFC 5322 Section 3.3](https://www.rfc-editor.org/rfc/rfc5322.html#section-3.3)

use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime};

use crate::{syntax::is_whitespace_character, HttpParseError};

/// `Sun, 06 Nov 1994 08:49:37 GMT`, the preferred format.
const FORMAT_RFC5322: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// `Sun, 06 Nov 1994 08:49:37 +0000`
const FORMAT_RFC1123: &str = "%a, %d %b %Y %H:%M:%S %z";

/// `Sunday, 06-Nov-94 08:49:37 GMT`
const FORMAT_RFC850: &str = "%A, %d-%b-%y %H:%M:%S GMT";

/// Parses a date in one of the three accepted formats. Comparison ignores
/// case and surrounding whitespace.
pub fn parse_strict_date(raw: &str) -> Result<SystemTime, HttpParseError> {
    let trimmed = raw.trim_matches(is_whitespace_character);
    if trimmed.is_empty() {
        return Err(HttpParseError::FieldValueEmpty);
    }

    let expected = trimmed.to_ascii_lowercase();
    let normalized = normalize_zone(trimmed);

    for format in [FORMAT_RFC5322, FORMAT_RFC850] {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(&normalized, format) {
            if date_time.format(format).to_string().to_ascii_lowercase() == expected {
                return Ok(SystemTime::from(date_time.and_utc()));
            }
        }
    }

    if let Ok(date_time) = DateTime::parse_from_str(&normalized, FORMAT_RFC1123) {
        if date_time.format(FORMAT_RFC1123).to_string().to_ascii_lowercase() == expected {
            return Ok(SystemTime::from(date_time));
        }
    }

    Err(HttpParseError::InvalidDate)
}

/// The zone literal is matched case-sensitively by the parser, unlike the
/// day and month names.
fn normalize_zone(value: &str) -> String {
    match value.len().checked_sub(3) {
        Some(split) if value.is_char_boundary(split) && value[split..].eq_ignore_ascii_case("gmt") => {
            format!("{}GMT", &value[..split])
        }
        _ => value.to_owned(),
    }
}

/// Formats a timestamp as an IMF-fixdate, the format used for every
/// outbound date.
#[must_use]
pub fn format_http_date(time: SystemTime) -> String {
    httpdate::fmt_http_date(time)
}
