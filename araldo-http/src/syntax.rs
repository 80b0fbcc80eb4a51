// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This module contains the grammar tokenizer: small sub-grammars that each
//! consume part of a field value and report how far they got. They never
//! abort the caller; a malformed value produces a [`Scan`] carrying the
//! error, and the caller decides whether that invalidates the whole field.
//!
//! Sub-grammars chain through [`Scan::position`], so an entity-tag can be
//! scanned in the middle of a list, or parameters after a media type.
//!
//! # References
//! * [RFC 9110](https://www.rfc-editor.org/rfc/rfc9110.html)

use crate::{
    abnf,
    conditional::{ConditionalMatchSet, EntityTag},
    lists::parse_http_list,
    HttpParseError,
};

/// The outcome of running one sub-grammar over part of a field value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scan<T> {
    pub value: T,

    /// The byte offset just after the last consumed byte.
    pub position: usize,

    /// Set when the input didn't match the grammar. `value` then holds what
    /// was recognised before the failure.
    pub error: Option<HttpParseError>,
}

impl<T> Scan<T> {
    fn valid(value: T, position: usize) -> Self {
        Self { value, position, error: None }
    }

    fn invalid(value: T, position: usize, error: HttpParseError) -> Self {
        Self { value, position, error: Some(error) }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_result(self) -> Result<(T, usize), HttpParseError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok((self.value, self.position)),
        }
    }
}

/// A media type as it appears on the wire, with its essence lowercased and
/// parameter names lowercased. Parameter values keep their case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaTypeSyntax {
    pub essence: String,
    pub parameters: Vec<(String, String)>,
}

impl MediaTypeSyntax {
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.iter()
            .find(|(parameter, _)| parameter.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// ```text
/// credentials = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    /// The scheme, lowercased, e.g. `basic`.
    pub scheme: String,
    pub token68: Option<String>,
    pub parameters: Vec<(String, String)>,
}

/// Is the given character a character that can occur (anywhere) in the string?
/// This is useful for early exits, but use [`validate_token`] after the
/// token is parsed.
///
/// ```text
/// tchar          = "!" / "#" / "$" / "%" / "&" / "'" / "*"
///                / "+" / "-" / "." / "^" / "_" / "`" / "|" / "~"
///                / DIGIT / ALPHA
///                ; any VCHAR, except delimiters
/// ```
#[inline]
pub fn is_token_character(byte: u8) -> bool {
    validate_token_character(byte).is_ok()
}

/// Returns whether or not the character is whitespace according to the HTTP
/// specification. This is in effect just `U+0020 SPACE` and `U+0009 CHARACTER
/// TABULATION`.
///
/// # Definition
/// ```text
/// OWS            = *( SP / HTAB )
///                ; optional whitespace
/// RWS            = 1*( SP / HTAB )
///                ; required whitespace
/// BWS            = OWS
///                ; "bad" whitespace
/// ```
///
/// # References
/// * [RFC 9110 Section 5.6.3](https://www.rfc-editor.org/rfc/rfc9110.html#name-whitespace)
#[inline]
pub fn is_whitespace_character(character: char) -> bool {
    character == ' ' || character == '\t'
}

/// Validate a field character. Note that in HTTP, UTF-8 is optional (US-ASCII),
/// and isn't used before validating the content.
///
/// ```text
/// field-vchar    = VCHAR / obs-text
/// ```
#[inline]
fn is_field_value_character(byte: u8) -> bool {
    abnf::is_visible_character(byte) || abnf::is_obs_text(byte)
}

pub fn validate_field_content(value: &[u8]) -> Result<(), HttpParseError> {
    if value.iter().all(|byte| is_field_value_character(*byte) || *byte == b' ' || *byte == b'\t') {
        Ok(())
    } else {
        Err(HttpParseError::FieldValueContainsInvalidCharacters)
    }
}

pub fn validate_token(value: &str) -> Result<(), HttpParseError> {
    if value.is_empty() {
        return Err(HttpParseError::TokenEmpty);
    }

    for character in value.bytes() {
        validate_token_character(character)?;
    }

    Ok(())
}

/// Validate a token character.
fn validate_token_character(character: u8) -> Result<(), HttpParseError> {
    match character {
        b' ' | b'\t' => Err(HttpParseError::TokenContainsWhitespace),

        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'^' | b'_' | b'`' | b'|' | b'~' => Ok(()),

        b'0'..=b'9' => Ok(()),
        b'A'..=b'Z' => Ok(()),
        b'a'..=b'z' => Ok(()),

        b'"' | b'(' | b')' | b',' | b'/' | b':' | b';' | b'<' | b'=' | b'>' |
        b'?' | b'@' | b'[' | b'\\' | b']' | b'{' | b'}' => Err(HttpParseError::TokenContainsDelimiter),

        _ => Err(HttpParseError::TokenContainsNonVisibleAscii),
    }
}

/// Prepares a raw field value for the sub-grammars: strips the surrounding
/// optional whitespace and rejects control characters and empty values.
///
/// ```text
/// field-value    = *field-content
/// field-content  = field-vchar
///                  [ 1*( SP / HTAB / field-vchar ) field-vchar ]
/// ```
pub fn prepare(raw: &str) -> Result<&str, HttpParseError> {
    let value = raw.trim_matches(is_whitespace_character);
    if value.is_empty() {
        return Err(HttpParseError::FieldValueEmpty);
    }

    validate_field_content(value.as_bytes())?;
    Ok(value)
}

/// Returns the position of the first non-whitespace byte at or after `start`.
#[must_use]
pub fn skip_whitespace(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut position = start;
    while position < bytes.len() && matches!(bytes[position], b' ' | b'\t') {
        position += 1;
    }
    position
}

/// ```text
/// token          = 1*tchar
/// ```
#[must_use]
pub fn scan_token(input: &str, start: usize) -> Scan<&str> {
    let bytes = input.as_bytes();
    let mut position = start;
    while position < bytes.len() && is_token_character(bytes[position]) {
        position += 1;
    }

    let token = &input[start..position];
    if token.is_empty() {
        Scan::invalid(token, position, HttpParseError::TokenEmpty)
    } else {
        Scan::valid(token, position)
    }
}

/// ```text
/// token68        = 1*( ALPHA / DIGIT /
///                      "-" / "." / "_" / "~" / "+" / "/" ) *"="
/// ```
#[must_use]
pub fn scan_token68(input: &str, start: usize) -> Scan<&str> {
    let bytes = input.as_bytes();
    let mut position = start;
    while position < bytes.len() && abnf::is_token68_character(bytes[position]) {
        position += 1;
    }

    if position == start {
        return Scan::invalid("", position, HttpParseError::TokenEmpty);
    }

    while position < bytes.len() && bytes[position] == b'=' {
        position += 1;
    }

    Scan::valid(&input[start..position], position)
}

/// Scans a quoted-string starting at the opening quote, returning the
/// unescaped contents.
///
/// ```text
/// quoted-string  = DQUOTE *( qdtext / quoted-pair ) DQUOTE
/// qdtext         = HTAB / SP / %x21 / %x23-5B / %x5D-7E / obs-text
/// quoted-pair    = "\" ( HTAB / SP / VCHAR / obs-text )
/// ```
#[must_use]
pub fn scan_quoted_string(input: &str, start: usize) -> Scan<String> {
    let mut text = String::new();
    if !input[start..].starts_with('"') {
        return Scan::invalid(text, start, HttpParseError::QuotedStringUnterminated);
    }

    let mut characters = input[start + 1..].char_indices();
    while let Some((offset, character)) = characters.next() {
        let position = start + 1 + offset;
        match character {
            '"' => return Scan::valid(text, position + 1),
            '\\' => match characters.next() {
                Some((_, escaped)) if escaped == '\t' || escaped == ' ' || !escaped.is_ascii_control() => {
                    text.push(escaped);
                }
                _ => return Scan::invalid(text, position, HttpParseError::QuotedStringContainsInvalidCharacter),
            },
            _ if !character.is_ascii() || abnf::is_quoted_text(character as u8) => text.push(character),
            _ => return Scan::invalid(text, position, HttpParseError::QuotedStringContainsInvalidCharacter),
        }
    }

    Scan::invalid(text, input.len(), HttpParseError::QuotedStringUnterminated)
}

/// The inverse of [`scan_quoted_string`]: wraps the text in double quotes,
/// escaping `"` and `\`. Control characters other than HTAB can't be
/// represented.
pub fn to_quoted_string(text: &str) -> Result<String, HttpParseError> {
    let mut result = String::with_capacity(text.len() + 2);
    result.push('"');
    for character in text.chars() {
        match character {
            '"' | '\\' => {
                result.push('\\');
                result.push(character);
            }
            '\t' => result.push(character),
            _ if character.is_ascii_control() => return Err(HttpParseError::QuotedStringContainsInvalidCharacter),
            _ => result.push(character),
        }
    }
    result.push('"');
    Ok(result)
}

/// Scans a (possibly nested) comment starting at the opening parenthesis,
/// returning the text between the outermost parentheses.
///
/// ```text
/// comment        = "(" *( ctext / quoted-pair / comment ) ")"
/// ctext          = HTAB / SP / %x21-27 / %x2A-5B / %x5D-7E / obs-text
/// ```
#[must_use]
pub fn scan_comment(input: &str, start: usize) -> Scan<&str> {
    let bytes = input.as_bytes();
    if bytes.get(start) != Some(&b'(') {
        return Scan::invalid("", start, HttpParseError::CommentUnterminated);
    }

    let mut depth = 0_usize;
    let mut position = start;
    while position < bytes.len() {
        match bytes[position] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Scan::valid(&input[start + 1..position], position + 1);
                }
            }
            b'\\' => position += 1,
            byte if abnf::is_comment_text(byte) => (),
            _ => return Scan::invalid("", position, HttpParseError::FieldValueContainsInvalidCharacters),
        }
        position += 1;
    }

    Scan::invalid("", bytes.len(), HttpParseError::CommentUnterminated)
}

/// ```text
/// 1*DIGIT
/// ```
#[must_use]
pub fn scan_digits(input: &str, start: usize) -> Scan<u64> {
    let bytes = input.as_bytes();
    let mut position = start;
    let mut value: u64 = 0;
    while position < bytes.len() && bytes[position].is_ascii_digit() {
        let digit = u64::from(bytes[position] - b'0');
        value = match value.checked_mul(10).and_then(|value| value.checked_add(digit)) {
            Some(value) => value,
            None => return Scan::invalid(0, position, HttpParseError::InvalidNumber),
        };
        position += 1;
    }

    if position == start {
        Scan::invalid(0, position, HttpParseError::InvalidNumber)
    } else {
        Scan::valid(value, position)
    }
}

/// ```text
/// entity-tag     = [ weak ] opaque-tag
/// weak           = %s"W/"
/// opaque-tag     = DQUOTE *etagc DQUOTE
/// ```
///
/// The weakness indicator is case-sensitive.
#[must_use]
pub fn scan_entity_tag(input: &str, start: usize) -> Scan<EntityTag> {
    let bytes = input.as_bytes();
    let weak = input[start..].starts_with("W/");
    let quote = if weak { start + 2 } else { start };

    if bytes.get(quote) != Some(&b'"') {
        return Scan::invalid(EntityTag::default(), quote, HttpParseError::InvalidEntityTag);
    }

    let mut position = quote + 1;
    while position < bytes.len() && abnf::is_entity_tag_character(bytes[position]) {
        position += 1;
    }

    if bytes.get(position) != Some(&b'"') {
        return Scan::invalid(EntityTag::default(), position, HttpParseError::InvalidEntityTag);
    }

    let tag = EntityTag {
        tag: input[quote + 1..position].to_owned(),
        weak,
    };
    Scan::valid(tag, position + 1)
}

/// Scans `;`-separated parameters. Parameter names are lowercased.
///
/// ```text
/// parameters      = *( OWS ";" OWS [ parameter ] )
/// parameter       = parameter-name "=" parameter-value
/// parameter-name  = token
/// parameter-value = ( token / quoted-string )
/// ```
#[must_use]
pub fn scan_parameters(input: &str, start: usize) -> Scan<Vec<(String, String)>> {
    let bytes = input.as_bytes();
    let mut parameters = Vec::new();
    let mut position = start;

    loop {
        let after_whitespace = skip_whitespace(input, position);
        if bytes.get(after_whitespace) != Some(&b';') {
            return Scan::valid(parameters, position);
        }

        position = skip_whitespace(input, after_whitespace + 1);
        if position >= bytes.len() || matches!(bytes[position], b';' | b',') {
            // Empty parameter, which the grammar allows.
            continue;
        }

        let name = scan_token(input, position);
        if name.is_invalid() || bytes.get(name.position) != Some(&b'=') {
            return Scan::invalid(parameters, name.position, HttpParseError::InvalidParameter);
        }

        let value_start = name.position + 1;
        let (value, end) = if bytes.get(value_start) == Some(&b'"') {
            let quoted = scan_quoted_string(input, value_start);
            if let Some(error) = quoted.error {
                return Scan::invalid(parameters, quoted.position, error);
            }
            (quoted.value, quoted.position)
        } else {
            let token = scan_token(input, value_start);
            if token.is_invalid() {
                return Scan::invalid(parameters, token.position, HttpParseError::InvalidParameter);
            }
            (token.value.to_owned(), token.position)
        };

        parameters.push((name.value.to_ascii_lowercase(), value));
        position = end;
    }
}

/// ```text
/// media-type = type "/" subtype parameters
/// type       = token
/// subtype    = token
/// ```
#[must_use]
pub fn scan_media_type(input: &str, start: usize) -> Scan<MediaTypeSyntax> {
    let mut result = MediaTypeSyntax::default();

    let category = scan_token(input, start);
    if category.is_invalid() || input.as_bytes().get(category.position) != Some(&b'/') {
        return Scan::invalid(result, category.position, HttpParseError::InvalidMediaType);
    }

    let subtype = scan_token(input, category.position + 1);
    if subtype.is_invalid() {
        return Scan::invalid(result, subtype.position, HttpParseError::InvalidMediaType);
    }

    result.essence = input[start..subtype.position].to_ascii_lowercase();

    let parameters = scan_parameters(input, subtype.position);
    result.parameters = parameters.value;
    Scan {
        value: result,
        position: parameters.position,
        error: parameters.error,
    }
}

/// ```text
/// credentials = auth-scheme [ 1*SP ( token68 / #auth-param ) ]
/// auth-scheme = token
/// auth-param  = token BWS "=" BWS ( token / quoted-string )
/// ```
///
/// A parameter list is tried first, since `a=b` is also a valid token68.
#[must_use]
pub fn scan_credentials(input: &str, start: usize) -> Scan<Credentials> {
    let mut credentials = Credentials::default();

    let scheme = scan_token(input, start);
    if scheme.is_invalid() {
        return Scan::invalid(credentials, scheme.position, HttpParseError::InvalidCredentials);
    }
    credentials.scheme = scheme.value.to_ascii_lowercase();

    let bytes = input.as_bytes();
    let mut position = scheme.position;
    if position >= bytes.len() {
        return Scan::valid(credentials, position);
    }

    if bytes[position] != b' ' {
        return Scan::invalid(credentials, position, HttpParseError::InvalidCredentials);
    }
    while position < bytes.len() && bytes[position] == b' ' {
        position += 1;
    }

    if let Some((parameters, end)) = scan_auth_parameters(input, position) {
        credentials.parameters = parameters;
        return Scan::valid(credentials, end);
    }

    let token68 = scan_token68(input, position);
    if token68.is_invalid() || skip_whitespace(input, token68.position) != input.len() {
        return Scan::invalid(credentials, token68.position, HttpParseError::InvalidCredentials);
    }

    credentials.token68 = Some(token68.value.to_owned());
    Scan::valid(credentials, token68.position)
}

fn scan_auth_parameters(input: &str, start: usize) -> Option<(Vec<(String, String)>, usize)> {
    let bytes = input.as_bytes();
    let mut parameters = Vec::new();
    let mut position = start;

    loop {
        let name = scan_token(input, position);
        if name.is_invalid() {
            return None;
        }

        position = skip_whitespace(input, name.position);
        if bytes.get(position) != Some(&b'=') {
            return None;
        }
        position = skip_whitespace(input, position + 1);

        let value = if bytes.get(position) == Some(&b'"') {
            let quoted = scan_quoted_string(input, position);
            if quoted.is_invalid() {
                return None;
            }
            position = quoted.position;
            quoted.value
        } else {
            let token = scan_token(input, position);
            if token.is_invalid() {
                return None;
            }
            position = token.position;
            token.value.to_owned()
        };
        parameters.push((name.value.to_ascii_lowercase(), value));

        position = skip_whitespace(input, position);
        if position >= bytes.len() {
            return Some((parameters, position));
        }
        if bytes[position] != b',' {
            return None;
        }
        position = skip_whitespace(input, position + 1);
    }
}

/// Splits the rest of the input into `#element` list elements. Fails when a
/// quoted-string is left open, since the element boundaries are then unknown.
#[must_use]
pub fn scan_comma_list(input: &str, start: usize) -> Scan<Vec<&str>> {
    let rest = &input[start..];
    let elements = parse_http_list(rest).collect();

    let quotes = rest.bytes()
        .scan(false, |escaped, byte| {
            let counted = byte == b'"' && !*escaped;
            *escaped = byte == b'\\' && !*escaped;
            Some(counted)
        })
        .filter(|counted| *counted)
        .count();

    if quotes % 2 == 0 {
        Scan::valid(elements, input.len())
    } else {
        Scan::invalid(elements, input.len(), HttpParseError::QuotedStringUnterminated)
    }
}

/// ```text
/// If-None-Match = "*" / #entity-tag
/// ```
#[must_use]
pub fn scan_entity_tag_list(input: &str, start: usize) -> Scan<ConditionalMatchSet> {
    let mut set = ConditionalMatchSet::default();
    if input[start..].trim_matches(is_whitespace_character) == "*" {
        set.any = true;
        return Scan::valid(set, input.len());
    }

    let list = scan_comma_list(input, start);
    if let Some(error) = list.error {
        return Scan::invalid(set, list.position, error);
    }

    for element in list.value {
        let tag = scan_entity_tag(element, 0);
        if tag.is_invalid() || tag.position != element.len() {
            return Scan::invalid(set, input.len(), HttpParseError::InvalidEntityTag);
        }
        set.tags.push(tag.value);
    }

    if set.tags.is_empty() {
        return Scan::invalid(set, input.len(), HttpParseError::InvalidEntityTag);
    }

    Scan::valid(set, input.len())
}
