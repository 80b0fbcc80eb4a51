// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Byte ranges: the `Range` request header and the `Content-Range`
//! response header.
//!
//! # References
//! * [RFC 9110 Section 14](https://www.rfc-editor.org/rfc/rfc9110.html#name-range-requests)

use std::fmt::Display;

use crate::{lists::parse_http_list, syntax, HttpParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Range {
    StartPointToEnd { start: u64 },
    Points {
        start: u64,
        end: u64,
    },
    Suffix { suffix: u64 },
}

impl Range {
    /// Resolves the range against a representation of `length` bytes,
    /// returning the inclusive first and last byte positions, or `None` when
    /// it can't be satisfied.
    #[must_use]
    pub fn resolve(&self, length: u64) -> Option<(u64, u64)> {
        if length == 0 {
            return None;
        }

        match *self {
            Range::StartPointToEnd { start } if start < length => Some((start, length - 1)),
            Range::Points { start, end } if start < length => Some((start, end.min(length - 1))),
            Range::Suffix { suffix } if suffix > 0 => Some((length.saturating_sub(suffix), length - 1)),
            _ => None,
        }
    }
}

/// ```text
/// Range            = ranges-specifier
/// ranges-specifier = range-unit "=" range-set
/// range-set        = 1#range-spec
/// range-spec       = int-range / suffix-range / other-range
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRangeList {
    /// The range unit, lowercased. Only `bytes` is registered.
    pub unit: String,
    pub ranges: Vec<Range>,
}

impl HttpRangeList {
    pub fn parse(value: &str) -> Result<Self, HttpParseError> {
        let (unit, set) = value.split_once('=').ok_or(HttpParseError::InvalidRange)?;
        syntax::validate_token(unit).map_err(|_| HttpParseError::InvalidRange)?;

        let mut ranges = Vec::new();
        for range in parse_http_list(set) {
            ranges.push(parse_range_spec(range).ok_or(HttpParseError::InvalidRange)?);
        }

        if ranges.is_empty() {
            return Err(HttpParseError::InvalidRange);
        }

        Ok(Self { unit: unit.to_ascii_lowercase(), ranges })
    }

    /// Returns the first and only range if there is only one range.
    /// Otherwise, when there are 0 or more than one, returns `None`.
    #[must_use]
    pub fn first_and_only(&self) -> Option<Range> {
        match self.ranges.as_slice() {
            [range] => Some(*range),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range> {
        self.ranges.iter()
    }
}

fn parse_number(value: &str) -> Option<u64> {
    let (number, position) = syntax::scan_digits(value, 0).into_result().ok()?;
    (position == value.len()).then_some(number)
}

fn parse_range_spec(range: &str) -> Option<Range> {
    if let Some(suffix) = range.strip_prefix('-') {
        return Some(Range::Suffix { suffix: parse_number(suffix)? });
    }

    let (start, end) = range.split_once('-')?;
    let start = parse_number(start)?;
    if end.is_empty() {
        return Some(Range::StartPointToEnd { start });
    }

    let end = parse_number(end)?;
    if end < start {
        return None;
    }
    Some(Range::Points { start, end })
}

/// The `Content-Range` header field indicates where in a full body a partial
/// message belongs.
///
/// ### References
/// * [RFC 9110](https://httpwg.org/specs/rfc9110.html#field.content-range)
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContentRange {
    Range {
        /// The start of the range, inclusive.
        start: u64,

        /// The end of the range, inclusive.
        end: u64,

        /// Complete length of the **resource**, not the body.
        complete_length: Option<u64>,
    },

    /// Used for 416 Range Not Satisfiable.
    ///
    /// ### RFC 9110, section 14.4:
    /// > A server generating a 416 (Range Not Satisfiable) response to a
    /// byte-range request SHOULD send a Content-Range header field with an
    /// unsatisfied-range value, as in the following example:
    /// > ```text
    /// > Content-Range: bytes */1234
    /// > ```
    Unsatisfied {
        /// The complete length of the resource.
        complete_length: u64,
    },
}

impl ContentRange {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match *self {
            ContentRange::Range { start, end, complete_length } => {
                start <= end && complete_length.map_or(true, |length| end < length)
            }
            ContentRange::Unsatisfied { .. } => true,
        }
    }
}

impl Display for ContentRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentRange::Range { start, end, complete_length: Some(length) } => write!(f, "bytes {start}-{end}/{length}"),
            ContentRange::Range { start, end, complete_length: None } => write!(f, "bytes {start}-{end}/*"),
            ContentRange::Unsatisfied { complete_length } => write!(f, "bytes */{complete_length}"),
        }
    }
}
