// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Conditional requests: entity-tags, the `If-*` request headers and the
//! order in which they are evaluated.
//!
//! # References
//! * [RFC 9110 Section 8.8.3](https://www.rfc-editor.org/rfc/rfc9110.html#name-etag)
//! * [RFC 9110 Section 13](https://www.rfc-editor.org/rfc/rfc9110.html#name-conditional-requests)

use std::{fmt::Display, time::{SystemTime, UNIX_EPOCH}};

use crate::{
    date::parse_strict_date,
    syntax::{self, scan_entity_tag, scan_entity_tag_list},
    HttpParseError,
    Method,
};

/// ```text
/// entity-tag = [ weak ] opaque-tag
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityTag {
    /// The opaque tag without the quotes.
    pub tag: String,
    pub weak: bool,
}

impl EntityTag {
    pub fn strong(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), weak: false }
    }

    pub fn weak(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), weak: true }
    }

    /// Parses a single entity-tag, e.g. the value of an `ETag` field.
    pub fn parse(value: &str) -> Result<Self, HttpParseError> {
        let value = syntax::prepare(value)?;
        let (tag, position) = scan_entity_tag(value, 0).into_result()?;
        if position != value.len() {
            return Err(HttpParseError::InvalidEntityTag);
        }
        Ok(tag)
    }

    /// Both tags must be strong and have the same opaque tag.
    #[must_use]
    pub fn strong_eq(&self, other: &EntityTag) -> bool {
        !self.weak && !other.weak && self.tag == other.tag
    }

    /// The opaque tags are equal, weakness is ignored.
    #[must_use]
    pub fn weak_eq(&self, other: &EntityTag) -> bool {
        self.tag == other.tag
    }
}

impl Display for EntityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.weak {
            f.write_str("W/")?;
        }
        write!(f, "\"{}\"", self.tag)
    }
}

/// The comparison function of RFC 9110 Section 8.8.3.2.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Comparison {
    Strong,
    Weak,
}

/// The value of `If-Match` or `If-None-Match`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConditionalMatchSet {
    pub tags: Vec<EntityTag>,

    /// The field was `*`.
    pub any: bool,
}

impl ConditionalMatchSet {
    /// Returns whether `candidate`, the entity-tag of the selected
    /// representation, is matched by the set.
    #[must_use]
    pub fn evaluate(&self, candidate: &EntityTag, comparison: Comparison) -> bool {
        if self.any {
            return true;
        }

        self.tags.iter().any(|tag| match comparison {
            Comparison::Strong => tag.strong_eq(candidate),
            Comparison::Weak => tag.weak_eq(candidate),
        })
    }
}

/// `If-Match` uses the strong comparison, so weak tags can never match and
/// are left out of the set.
pub fn parse_if_match(value: &str) -> Result<ConditionalMatchSet, HttpParseError> {
    let mut set = parse_if_none_match(value)?;
    set.tags.retain(|tag| !tag.weak);
    Ok(set)
}

pub fn parse_if_none_match(value: &str) -> Result<ConditionalMatchSet, HttpParseError> {
    let value = syntax::prepare(value)?;
    scan_entity_tag_list(value, 0).into_result().map(|(set, _)| set)
}

/// ```text
/// If-Range = entity-tag / HTTP-date
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IfRange {
    Date(SystemTime),
    EntityTag(EntityTag),
}

impl IfRange {
    /// Whether the range request may be honoured for a representation with
    /// these validators. Entity-tags use the strong comparison.
    #[must_use]
    pub fn evaluate(&self, etag: Option<&EntityTag>, last_modified: Option<SystemTime>) -> bool {
        match self {
            IfRange::EntityTag(tag) => etag.is_some_and(|etag| tag.strong_eq(etag)),
            IfRange::Date(date) => last_modified.is_some_and(|modified| seconds(modified) == seconds(*date)),
        }
    }
}

/// A strict date is tried first, anything else must be an entity-tag.
pub fn parse_if_range(value: &str) -> Result<IfRange, HttpParseError> {
    if let Ok(date) = parse_strict_date(value) {
        return Ok(IfRange::Date(date));
    }

    EntityTag::parse(value).map(IfRange::EntityTag)
}

fn seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_secs())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PreconditionOutcome {
    Proceed,

    /// Answer with `304 Not Modified`.
    NotModified,

    /// Answer with `412 Precondition Failed`.
    PreconditionFailed,
}

/// The preconditions of a request, evaluated in the order of RFC 9110
/// Section 13.2.2.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub if_match: Option<ConditionalMatchSet>,
    pub if_unmodified_since: Option<SystemTime>,
    pub if_none_match: Option<ConditionalMatchSet>,
    pub if_modified_since: Option<SystemTime>,
}

impl Preconditions {
    #[must_use]
    pub fn evaluate(&self, method: &Method, etag: Option<&EntityTag>, last_modified: Option<SystemTime>) -> PreconditionOutcome {
        let is_get_or_head = matches!(method, Method::Get | Method::Head);

        if let Some(if_match) = &self.if_match {
            let matched = match etag {
                Some(etag) => if_match.evaluate(etag, Comparison::Strong),
                None => false,
            };
            if !matched {
                return PreconditionOutcome::PreconditionFailed;
            }
        } else if let (Some(since), Some(modified)) = (self.if_unmodified_since, last_modified) {
            if seconds(modified) > seconds(since) {
                return PreconditionOutcome::PreconditionFailed;
            }
        }

        if let Some(if_none_match) = &self.if_none_match {
            let matched = match etag {
                Some(etag) => if_none_match.evaluate(etag, Comparison::Weak),
                None => false,
            };
            if matched {
                return if is_get_or_head {
                    PreconditionOutcome::NotModified
                } else {
                    PreconditionOutcome::PreconditionFailed
                };
            }
        } else if let (true, Some(since), Some(modified)) = (is_get_or_head, self.if_modified_since, last_modified) {
            if seconds(modified) <= seconds(since) {
                return PreconditionOutcome::NotModified;
            }
        }

        PreconditionOutcome::Proceed
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rstest::rstest;

    #[test]
    fn test_weak_tag_matches_if_none_match_only() {
        let value = r#""abc", W/"def""#;
        let candidate = EntityTag::weak("def");

        let if_none_match = parse_if_none_match(value).unwrap();
        assert!(if_none_match.evaluate(&candidate, Comparison::Weak));

        let if_match = parse_if_match(value).unwrap();
        assert_eq!(if_match.tags, vec![EntityTag::strong("abc")]);
        assert!(!if_match.evaluate(&candidate, Comparison::Strong));
        assert!(!if_match.evaluate(&EntityTag::strong("def"), Comparison::Strong));
        assert!(if_match.evaluate(&EntityTag::strong("abc"), Comparison::Strong));
    }

    #[rstest]
    #[case(EntityTag::strong("1"), EntityTag::strong("1"), true, true)]
    #[case(EntityTag::weak("1"), EntityTag::weak("1"), false, true)]
    #[case(EntityTag::weak("1"), EntityTag::strong("1"), false, true)]
    #[case(EntityTag::weak("1"), EntityTag::weak("2"), false, false)]
    fn test_comparison(#[case] a: EntityTag, #[case] b: EntityTag, #[case] strong: bool, #[case] weak: bool) {
        assert_eq!(a.strong_eq(&b), strong);
        assert_eq!(a.weak_eq(&b), weak);
    }

    #[test]
    fn test_any() {
        let set = parse_if_match("*").unwrap();
        assert!(set.any);
        assert!(set.evaluate(&EntityTag::weak("whatever"), Comparison::Strong));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case(r#""abc" "def""#)]
    #[case(r#"*, "abc""#)]
    #[case(r#"w/"abc""#)]
    fn test_invalid(#[case] input: &str) {
        assert!(parse_if_none_match(input).is_err(), "input: {input}");
        assert!(parse_if_match(input).is_err(), "input: {input}");
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityTag::strong("xyzzy").to_string(), r#""xyzzy""#);
        assert_eq!(EntityTag::weak("xyzzy").to_string(), r#"W/"xyzzy""#);
        assert_eq!(EntityTag::parse(r#" W/"xyzzy" "#), Ok(EntityTag::weak("xyzzy")));
    }

    #[test]
    fn test_parse_if_range() {
        assert_eq!(parse_if_range("Sun, 06 Nov 1994 08:49:37 GMT"),
            Ok(IfRange::Date(UNIX_EPOCH + Duration::from_secs(784111777))));
        assert_eq!(parse_if_range(r#""v2""#), Ok(IfRange::EntityTag(EntityTag::strong("v2"))));
        assert_eq!(parse_if_range("yesterday"), Err(HttpParseError::InvalidEntityTag));

        let if_range = IfRange::EntityTag(EntityTag::strong("v2"));
        assert!(if_range.evaluate(Some(&EntityTag::strong("v2")), None));
        assert!(!if_range.evaluate(Some(&EntityTag::weak("v2")), None));
    }

    fn time(seconds: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(seconds)
    }

    #[test]
    fn test_preconditions() {
        let etag = EntityTag::strong("v1");
        let none = Preconditions::default();
        assert_eq!(none.evaluate(&Method::Get, Some(&etag), None), PreconditionOutcome::Proceed);

        let if_none_match = Preconditions {
            if_none_match: Some(parse_if_none_match(r#"W/"v1""#).unwrap()),
            ..Default::default()
        };
        assert_eq!(if_none_match.evaluate(&Method::Get, Some(&etag), None), PreconditionOutcome::NotModified);
        assert_eq!(if_none_match.evaluate(&Method::Put, Some(&etag), None), PreconditionOutcome::PreconditionFailed);
        assert_eq!(if_none_match.evaluate(&Method::Get, None, None), PreconditionOutcome::Proceed);

        let if_match = Preconditions {
            if_match: Some(parse_if_match(r#""v0""#).unwrap()),
            ..Default::default()
        };
        assert_eq!(if_match.evaluate(&Method::Put, Some(&etag), None), PreconditionOutcome::PreconditionFailed);

        let modified_since = Preconditions {
            if_modified_since: Some(time(1000)),
            ..Default::default()
        };
        assert_eq!(modified_since.evaluate(&Method::Get, None, Some(time(1000))), PreconditionOutcome::NotModified);
        assert_eq!(modified_since.evaluate(&Method::Get, None, Some(time(1001))), PreconditionOutcome::Proceed);
        assert_eq!(modified_since.evaluate(&Method::Post, None, Some(time(1000))), PreconditionOutcome::Proceed);

        let unmodified_since = Preconditions {
            if_unmodified_since: Some(time(1000)),
            ..Default::default()
        };
        assert_eq!(unmodified_since.evaluate(&Method::Put, None, Some(time(1001))), PreconditionOutcome::PreconditionFailed);
        assert_eq!(unmodified_since.evaluate(&Method::Put, None, Some(time(999))), PreconditionOutcome::Proceed);
    }
}
