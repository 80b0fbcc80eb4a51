// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This module provides support for the HTTP Lists `#rule` ABNF extension.
//!
//! # Definition for Recipients
//! ```text
//! #element => [ element ] *( OWS "," OWS [ element ] )
//! ```
//!
//! Commas inside a quoted-string don't separate elements, so
//! `W/"a,b", "c"` is two elements.
//!
//! # References
//! * [RFC 9110 Section 5.6.1](https://www.rfc-editor.org/rfc/rfc9110.html#section-5.6.1)

use crate::{syntax::is_whitespace_character, abnf};

struct HttpListElementIterator<'a> {
    value: &'a str,
}

impl<'a> HttpListElementIterator<'a> {
    /// Finds the next separating comma that isn't inside a quoted-string.
    fn find_separator(&self) -> Option<usize> {
        let mut in_quotes = false;
        let mut escaped = false;
        for (index, byte) in self.value.bytes().enumerate() {
            if escaped {
                escaped = false;
                continue;
            }

            match byte {
                b'\\' if in_quotes => escaped = true,
                b'"' => in_quotes = !in_quotes,
                b',' if !in_quotes => return Some(index),
                _ => (),
            }
        }
        None
    }
}

impl<'a> Iterator for HttpListElementIterator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.find_separator() {
            let value = self.value;
            let element = &value[..index];
            self.value = value[index + 1..].trim_matches(is_whitespace_character);

            let result = element.trim_matches(is_whitespace_character);
            if !result.is_empty() {
                return Some(result);
            }
        }

        let rest = std::mem::take(&mut self.value).trim_matches(is_whitespace_character);
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}

/// This function parses a field-value and returns an iterator of list elements
/// for HTTP. The iterator will never return the empty string, as those cannot
/// occur in HTTP lists and will be ignored.
///
/// # Definition for Recipients
/// ```text
/// #element => [ element ] *( OWS "," OWS [ element ] )
/// ```
///
/// # References
/// * [RFC 9110 Section 5.6.1](https://www.rfc-editor.org/rfc/rfc9110.html#section-5.6.1)
pub fn parse_http_list(value: &str) -> impl Iterator<Item = &'_ str> {
    HttpListElementIterator { value }
}

/// Parses a `qvalue` as defined by
/// [RFC 9110, section 12.4.2](https://www.rfc-editor.org/rfc/rfc9110.html#name-quality-values).
///
/// # Definition
/// ```text
/// qvalue = ( "0" [ "." 0*3DIGIT ] )
///        / ( "1" [ "." 0*3("0") ] )
/// ```
///
/// # Invalid Syntax
/// The sender MUST NOT generate these values, but there isn't an explicit
/// definition of what should be done if an endpoint receives these. In that
/// case, we should go with the default value of `1.0`.
///
/// # References
/// * [RFC 9110 Section 12.4.2](https://www.rfc-editor.org/rfc/rfc9110.html#name-quality-values)
pub fn parse_quality_value(value: &str) -> f32 {
    const DEFAULT_VALUE_FOR_INVALID_SYNTAX: f32 = 1.0;

    // Length restrictions
    if value.is_empty() || value.len() > 5 {
        return DEFAULT_VALUE_FOR_INVALID_SYNTAX;
    }

    let mut characters = value.chars();
    match (characters.next(), characters.next()) {
        // This covers valid cases and invalid cases, since it can never be
        // more than `1.0`.
        (Some('1'), None | Some('.')) => return 1.0,
        (Some('0'), None) => return 0.0,
        (Some('0'), Some('.')) => (),
        _ => return DEFAULT_VALUE_FOR_INVALID_SYNTAX,
    }

    let mut fractional = 0.0;
    for (idx, character) in characters.enumerate() {
        let Some(digit) = abnf::parse_digit_character(character) else {
            return DEFAULT_VALUE_FOR_INVALID_SYNTAX;
        };
        fractional += digit as f32 * 10_f32.powi(-(idx as i32 + 1));
    }

    fractional
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use float_cmp::approx_eq;

    #[rstest]
    #[case("en-US", &["en-US"])]
    #[case("foo,bar", &["foo", "bar"])]
    #[case("foo , bar,", &["foo", "bar"])]
    #[case("foo , ,bar,charlie", &["foo", "bar", "charlie"])]
    #[case("", &[])]
    #[case(",", &[])]
    #[case(",     ,", &[])]
    #[case(",     ,  ", &[])]
    #[case("gzip, br, deflate", &["gzip", "br", "deflate"])]
    #[case(r#""a,b", W/"c""#, &[r#""a,b""#, r#"W/"c""#])]
    #[case(r#"x; p="1,\"2", y"#, &[r#"x; p="1,\"2""#, "y"])]
    fn test_parse_http_list(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_http_list(input).collect::<Vec<&str>>(), expected.to_vec());
    }

    #[rstest]
    #[case("0", 0.0)]
    #[case("0.", 0.0)]
    #[case("0.0", 0.0)]
    #[case("0.00", 0.0)]
    #[case("0.000", 0.0)]
    #[case("1", 1.0)]
    #[case("1.", 1.0)]
    #[case("1.0", 1.0)]
    #[case("1.00", 1.0)]
    #[case("1.000", 1.0)]
    #[case("0.5", 0.5)]
    #[case("0.05", 0.05)]
    #[case("0.001", 0.001)]
    #[case("0.123", 0.123)]
    #[case("0.089", 0.089)]
    fn test_parse_quality_value_valid(#[case] input: &str, #[case] expected: f32) {
        let outcome = parse_quality_value(input);
        assert!(approx_eq!(f32, outcome, expected, ulps = 3), "Incorrect, outcome={outcome}, expected={expected} for input=\"{input}\"");
    }

    #[rstest]
    #[case("ABCFDGNSDG")]
    #[case("")]
    #[case("-0.0")]
    #[case("+0.0")]
    #[case("+0")]
    #[case("+1")]
    #[case("-1.0")]
    #[case("0.000005")]
    #[case("-.582")]
    #[case("0.x")]
    #[case("2")]
    #[case("2.0")]
    #[case("2.001")]
    fn test_parse_quality_value_invalid(#[case] input: &str) {
        let outcome = parse_quality_value(input);
        assert!(approx_eq!(f32, outcome, 1.0, ulps = 3), "Incorrect, outcome={outcome}");
    }
}
