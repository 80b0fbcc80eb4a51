// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Character classes from the Augmented BNF core rules and the HTTP and URI
//! grammars built on them.
//!
//! # Ranges
//! Ranges are inclusive:
//! ```text
//! DIGIT       =  %x30-39
//! ```
//! is equivalent to:
//! ```text
//! DIGIT       =  "0" / "1" / "2" / "3" / "4" / "5" / "6" /
//!                "7" / "8" / "9"
//! ```
//!
//! # References
//! * [RFC 5234 Augmented BNF for Syntax Specifications: ABNF](https://www.rfc-editor.org/rfc/rfc5234.html)
//! * [RFC 3986 Uniform Resource Identifier (URI): Generic Syntax](https://www.rfc-editor.org/rfc/rfc3986.html)

/// Is the character a visible (printing) character.
///
/// ```text
/// VCHAR          =  %x21-7E
/// ```
#[inline]
pub fn is_visible_character(byte: u8) -> bool {
    matches!(byte, 0x21..=0x7E)
}

/// ```text
/// obs-text       = %x80-FF
/// ```
#[inline]
pub fn is_obs_text(byte: u8) -> bool {
    matches!(byte, 0x80..=0xFF)
}

/// Converts a `DIGIT` into its value.
#[inline]
pub fn parse_digit_character(character: char) -> Option<u32> {
    character.to_digit(10)
}

/// ```text
/// qdtext         = HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text
/// ```
#[inline]
pub fn is_quoted_text(byte: u8) -> bool {
    matches!(byte, b'\t' | b' ' | 0x21 | 0x23..=0x5B | 0x5D..=0x7E) || is_obs_text(byte)
}

/// ```text
/// ctext          = HTAB / SP / %x21-27 / %x2A-5B / %x5D-7E / obs-text
/// ```
#[inline]
pub fn is_comment_text(byte: u8) -> bool {
    matches!(byte, b'\t' | b' ' | 0x21..=0x27 | 0x2A..=0x5B | 0x5D..=0x7E) || is_obs_text(byte)
}

/// ```text
/// etagc          = %x21 / %x23-7E / obs-text
///                ; VCHAR except double quotes, plus obs-text
/// ```
#[inline]
pub fn is_entity_tag_character(byte: u8) -> bool {
    matches!(byte, 0x21 | 0x23..=0x7E) || is_obs_text(byte)
}

/// ```text
/// token68        = 1*( ALPHA / DIGIT /
///                      "-" / "." / "_" / "~" / "+" / "/" ) *"="
/// ```
#[inline]
pub fn is_token68_character(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~' | b'+' | b'/')
}

/// ```text
/// unreserved    = ALPHA / DIGIT / "-" / "." / "_" / "~"
/// ```
#[inline]
pub fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// ```text
/// sub-delims    = "!" / "$" / "&" / "'" / "(" / ")"
///               / "*" / "+" / "," / ";" / "="
/// ```
#[inline]
pub fn is_sub_delim(byte: u8) -> bool {
    matches!(byte, b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=')
}

/// A `pchar` without the percent-encoded triplet, which callers validate
/// separately since it spans three bytes.
///
/// ```text
/// pchar         = unreserved / pct-encoded / sub-delims / ":" / "@"
/// ```
#[inline]
pub fn is_path_character(byte: u8) -> bool {
    is_unreserved(byte) || is_sub_delim(byte) || matches!(byte, b':' | b'@')
}
