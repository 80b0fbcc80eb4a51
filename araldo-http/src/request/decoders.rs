// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! One decoder per request header. Every decoder is a pure function from the
//! raw field value to the typed value, and never looks at other fields.

use std::{fmt::Display, time::SystemTime};

use araldo_resources::{Charset, Encoding, Language, MediaRange};

use crate::{
    cache_control::CacheControl,
    checksum::{self, ChecksumRecord},
    conditional::{self, ConditionalMatchSet, IfRange},
    date::{format_http_date, parse_strict_date},
    lists::parse_http_list,
    negotiation::{parse_negotiation, NegotiationTable},
    range::HttpRangeList,
    syntax::{self, Credentials, MediaTypeSyntax},
    uri::{scan_authority, Authority, Uri},
    HttpParseError,
    Method,
};

use super::user_agent::{Product, UserAgent};

/// One hop of the `Via` header.
///
/// ```text
/// Via = #( received-protocol RWS received-by [ RWS comment ] )
/// received-protocol = [ protocol-name "/" ] protocol-version
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViaEntry {
    pub protocol_name: Option<String>,
    pub protocol_version: String,
    pub received_by: String,
    pub comment: Option<String>,
}

/// ```text
/// warning-value = warn-code SP warn-agent SP warn-text [ SP warn-date ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarningValue {
    pub code: u16,
    pub agent: String,
    pub text: String,
    pub date: Option<SystemTime>,
}

impl Display for WarningValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = syntax::to_quoted_string(&self.text).map_err(|_| std::fmt::Error)?;
        write!(f, "{:03} {} {text}", self.code, self.agent)?;
        if let Some(date) = self.date {
            write!(f, " \"{}\"", format_http_date(date))?;
        }
        Ok(())
    }
}

pub fn accept(value: &str) -> Result<NegotiationTable<MediaRange>, HttpParseError> {
    let table = parse_negotiation(syntax::prepare(value)?)?;
    if table.iter().any(|choice| !choice.value.contains('/')) {
        return Err(HttpParseError::InvalidMediaType);
    }
    Ok(table.resolve(MediaRange::identify))
}

pub fn accept_charset(value: &str) -> Result<NegotiationTable<Charset>, HttpParseError> {
    Ok(parse_negotiation(syntax::prepare(value)?)?.resolve(Charset::from_token))
}

pub fn accept_encoding(value: &str) -> Result<NegotiationTable<Encoding>, HttpParseError> {
    Ok(parse_negotiation(syntax::prepare(value)?)?.resolve(Encoding::from_token))
}

pub fn accept_language(value: &str) -> Result<NegotiationTable<Language>, HttpParseError> {
    Ok(parse_negotiation(syntax::prepare(value)?)?.resolve(Language::from_tag))
}

/// `TE` has the same shape as `Accept-Encoding`, plus the `trailers`
/// keyword.
pub fn te(value: &str) -> Result<NegotiationTable<Encoding>, HttpParseError> {
    accept_encoding(value)
}

/// `Accept-Datetime`, `Date`, `If-Modified-Since` and
/// `If-Unmodified-Since`.
pub fn timestamp(value: &str) -> Result<SystemTime, HttpParseError> {
    parse_strict_date(value)
}

pub fn access_control_request_method(value: &str) -> Result<Method, HttpParseError> {
    let value = syntax::prepare(value)?;
    syntax::validate_token(value).map_err(|_| HttpParseError::InvalidMethod)?;
    Ok(Method::from(value))
}

/// A list of tokens, lowercased. Used by `Access-Control-Request-Headers`,
/// `Connection`, `Trailer` and `Expect`.
pub fn token_list(value: &str) -> Result<Vec<String>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut tokens = Vec::new();
    for element in parse_http_list(value) {
        syntax::validate_token(element)?;
        tokens.push(element.to_ascii_lowercase());
    }

    if tokens.is_empty() {
        return Err(HttpParseError::TokenEmpty);
    }
    Ok(tokens)
}

/// `Authorization` and `Proxy-Authorization`.
pub fn credentials(value: &str) -> Result<Credentials, HttpParseError> {
    let value = syntax::prepare(value)?;
    let (credentials, position) = syntax::scan_credentials(value, 0).into_result()?;
    if position != value.len() {
        return Err(HttpParseError::InvalidCredentials);
    }
    Ok(credentials)
}

pub fn cache_control(value: &str) -> Result<CacheControl, HttpParseError> {
    CacheControl::parse(syntax::prepare(value)?)
}

/// `Pragma` shares the directive grammar of `Cache-Control`.
pub fn pragma(value: &str) -> Result<CacheControl, HttpParseError> {
    cache_control(value)
}

pub fn checksum_record(value: &str) -> Result<ChecksumRecord, HttpParseError> {
    ChecksumRecord::parse(value)
}

pub fn checksum_headers(value: &str) -> Result<Vec<String>, HttpParseError> {
    checksum::parse_checksum_headers(value)
}

/// `Content-Encoding` and `Transfer-Encoding`: the codings in the order they
/// were applied.
pub fn codings(value: &str) -> Result<Vec<Encoding>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let codings = parse_http_list(value)
        .map(|element| Encoding::from_token(element).ok_or(HttpParseError::UnknownContentCoding))
        .collect::<Result<Vec<_>, _>>()?;

    if codings.is_empty() {
        return Err(HttpParseError::UnknownContentCoding);
    }
    Ok(codings)
}

fn number(value: &str) -> Result<u64, HttpParseError> {
    let (number, position) = syntax::scan_digits(value, 0).into_result()?;
    if position != value.len() {
        return Err(HttpParseError::TrailingCharacters);
    }
    Ok(number)
}

/// Repeated `Content-Length` lines are only acceptable when they agree.
pub fn content_length(value: &str) -> Result<u64, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut result = None;
    for element in parse_http_list(value) {
        let length = number(element)?;
        if result.is_some_and(|previous| previous != length) {
            return Err(HttpParseError::InvalidNumber);
        }
        result = Some(length);
    }
    result.ok_or(HttpParseError::InvalidNumber)
}

pub fn content_type(value: &str) -> Result<MediaTypeSyntax, HttpParseError> {
    let value = syntax::prepare(value)?;
    let (media_type, position) = syntax::scan_media_type(value, 0).into_result()?;
    if position != value.len() {
        return Err(HttpParseError::InvalidMediaType);
    }
    Ok(media_type)
}

/// Splits the cookie-string into name-value pairs. Values keep their
/// quotes, the cookie entity outside this crate interprets them.
///
/// ```text
/// cookie-string = cookie-pair *( ";" SP cookie-pair )
/// cookie-pair   = cookie-name "=" cookie-value
/// ```
pub fn cookie(value: &str) -> Result<Vec<(String, String)>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut pairs = Vec::new();
    for pair in value.split(';') {
        let pair = pair.trim_matches(syntax::is_whitespace_character);
        if pair.is_empty() {
            continue;
        }

        let (name, cookie_value) = pair.split_once('=').ok_or(HttpParseError::InvalidCookie)?;
        let name = name.trim_matches(syntax::is_whitespace_character);
        if syntax::validate_token(name).is_err() {
            return Err(HttpParseError::InvalidCookie);
        }
        pairs.push((name.to_owned(), cookie_value.trim_matches(syntax::is_whitespace_character).to_owned()));
    }

    if pairs.is_empty() {
        return Err(HttpParseError::InvalidCookie);
    }
    Ok(pairs)
}

/// `From` carries a mailbox; only its general shape is checked.
pub fn from(value: &str) -> Result<String, HttpParseError> {
    let value = syntax::prepare(value)?;
    match value.rsplit_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains(char::is_whitespace) => {
            Ok(value.to_owned())
        }
        _ => Err(HttpParseError::InvalidUri),
    }
}

/// ```text
/// Host = uri-host [ ":" port ]
/// ```
pub fn host(value: &str) -> Result<Authority, HttpParseError> {
    let value = syntax::prepare(value)?;
    let (authority, position) = scan_authority(value, 0).into_result()?;
    if position != value.len() {
        return Err(HttpParseError::InvalidHost);
    }

    match authority {
        Some(authority) if authority.user_info.is_none() && authority.host != crate::uri::Host::Name(String::new()) => Ok(authority),
        _ => Err(HttpParseError::InvalidHost),
    }
}

pub fn if_match(value: &str) -> Result<ConditionalMatchSet, HttpParseError> {
    conditional::parse_if_match(value)
}

pub fn if_none_match(value: &str) -> Result<ConditionalMatchSet, HttpParseError> {
    conditional::parse_if_none_match(value)
}

pub fn if_range(value: &str) -> Result<IfRange, HttpParseError> {
    conditional::parse_if_range(value)
}

pub fn max_forwards(value: &str) -> Result<u32, HttpParseError> {
    let value = syntax::prepare(value)?;
    u32::try_from(number(value)?).map_err(|_| HttpParseError::InvalidNumber)
}

/// `Origin` must be a serialized origin: scheme and host, without a path.
/// The opaque `null` origin is rejected as well.
pub fn origin(value: &str) -> Result<Uri, HttpParseError> {
    let uri = Uri::parse(syntax::prepare(value)?)?;
    if uri.authority.is_none() || !uri.is_absolute() || !(uri.path.is_empty() || uri.path == "/") {
        return Err(HttpParseError::InvalidUri);
    }
    Ok(uri)
}

pub fn range(value: &str) -> Result<HttpRangeList, HttpParseError> {
    HttpRangeList::parse(syntax::prepare(value)?)
}

pub fn referer(value: &str) -> Result<Uri, HttpParseError> {
    let uri = Uri::parse(syntax::prepare(value)?)?;
    if uri.fragment.is_some() {
        return Err(HttpParseError::InvalidUri);
    }
    Ok(uri)
}

/// ```text
/// Upgrade = #protocol
/// protocol = protocol-name ["/" protocol-version]
/// ```
pub fn upgrade(value: &str) -> Result<Vec<Product>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut products = Vec::new();
    for element in parse_http_list(value) {
        let (name, version) = match element.split_once('/') {
            Some((name, version)) => (name, Some(version)),
            None => (element, None),
        };
        syntax::validate_token(name)?;
        if let Some(version) = version {
            syntax::validate_token(version)?;
        }
        products.push(Product {
            name: name.to_owned(),
            version: version.map(str::to_owned),
        });
    }

    if products.is_empty() {
        return Err(HttpParseError::TokenEmpty);
    }
    Ok(products)
}

pub fn user_agent(value: &str) -> Result<UserAgent, HttpParseError> {
    UserAgent::parse(value)
}

pub fn via(value: &str) -> Result<Vec<ViaEntry>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut entries = Vec::new();
    for element in parse_http_list(value) {
        let protocol = syntax::scan_token(element, 0);
        if protocol.is_invalid() {
            return Err(HttpParseError::TokenEmpty);
        }

        let (protocol_name, protocol_version, mut position) = if element[protocol.position..].starts_with('/') {
            let version = syntax::scan_token(element, protocol.position + 1);
            if version.is_invalid() {
                return Err(HttpParseError::TokenEmpty);
            }
            (Some(protocol.value.to_owned()), version.value.to_owned(), version.position)
        } else {
            (None, protocol.value.to_owned(), protocol.position)
        };

        let after_protocol = syntax::skip_whitespace(element, position);
        if after_protocol == position {
            return Err(HttpParseError::TokenContainsWhitespace);
        }
        position = after_protocol;

        let end = element[position..].find(char::is_whitespace).map_or(element.len(), |offset| position + offset);
        let received_by = &element[position..end];
        if received_by.is_empty() || received_by.contains(['(', ')']) {
            return Err(HttpParseError::InvalidHost);
        }

        position = syntax::skip_whitespace(element, end);
        let comment = if position < element.len() {
            let (comment, comment_end) = syntax::scan_comment(element, position).into_result()?;
            if comment_end != element.len() {
                return Err(HttpParseError::TrailingCharacters);
            }
            Some(comment.to_owned())
        } else {
            None
        };

        entries.push(ViaEntry {
            protocol_name,
            protocol_version,
            received_by: received_by.to_owned(),
            comment,
        });
    }

    if entries.is_empty() {
        return Err(HttpParseError::TokenEmpty);
    }
    Ok(entries)
}

pub fn warning(value: &str) -> Result<Vec<WarningValue>, HttpParseError> {
    let value = syntax::prepare(value)?;
    let mut warnings = Vec::new();
    for element in parse_http_list(value) {
        let code = syntax::scan_digits(element, 0);
        if code.is_invalid() || code.position != 3 || element.as_bytes().get(3) != Some(&b' ') {
            return Err(HttpParseError::InvalidNumber);
        }

        let agent_end = element[4..].find(' ').map(|offset| 4 + offset).ok_or(HttpParseError::TrailingCharacters)?;
        let agent = &element[4..agent_end];
        if agent.is_empty() {
            return Err(HttpParseError::InvalidHost);
        }

        let (text, text_end) = syntax::scan_quoted_string(element, agent_end + 1).into_result()?;
        let date = match &element[text_end..] {
            "" => None,
            rest => {
                let rest = rest.strip_prefix(' ').ok_or(HttpParseError::TrailingCharacters)?;
                let (date, date_end) = syntax::scan_quoted_string(rest, 0).into_result()?;
                if date_end != rest.len() {
                    return Err(HttpParseError::TrailingCharacters);
                }
                Some(parse_strict_date(&date)?)
            }
        };

        warnings.push(WarningValue {
            code: code.value as u16,
            agent: agent.to_owned(),
            text,
            date,
        });
    }

    if warnings.is_empty() {
        return Err(HttpParseError::InvalidNumber);
    }
    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::uri::Host;
    use rstest::rstest;

    #[test]
    fn test_accept_resolves_media_ranges() {
        let table = accept("text/html, application/xhtml+xml;q=0.9, */*;q=0.8").unwrap();
        let codes: Vec<_> = table.iter().map(|choice| choice.resolved_code.clone()).collect();
        assert_eq!(codes[2], Some(MediaRange::Any));
        assert!(codes[0].is_some());
        assert_eq!(table.weights().collect::<Vec<_>>(), vec![1.0, 0.9, 0.8]);

        assert_eq!(accept("html").unwrap_err(), HttpParseError::InvalidMediaType);
        assert_eq!(accept("  ").unwrap_err(), HttpParseError::FieldValueEmpty);
    }

    #[test]
    fn test_unknown_tokens_stay_in_the_table() {
        let table = accept_encoding("gzip, zstd;q=0.5").unwrap();
        let choices: Vec<_> = table.iter().map(|choice| (choice.value.as_str(), choice.resolved_code)).collect();
        assert_eq!(choices, vec![("gzip", Some(Encoding::Gzip)), ("zstd", None)]);
    }

    #[rstest]
    #[case("keep-alive, Upgrade", &["keep-alive", "upgrade"])]
    #[case("close", &["close"])]
    fn test_token_list(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(token_list(input).unwrap(), expected.to_vec());
    }

    #[test]
    fn test_token_list_round_trip() {
        let tokens = token_list("Keep-Alive, upgrade, TE").unwrap();
        assert_eq!(token_list(&tokens.join(", ")).unwrap(), tokens);
    }

    #[rstest]
    #[case("42", Ok(42))]
    #[case("42, 42", Ok(42))]
    #[case("42, 43", Err(HttpParseError::InvalidNumber))]
    #[case("4 2", Err(HttpParseError::TrailingCharacters))]
    #[case("-1", Err(HttpParseError::InvalidNumber))]
    #[case("", Err(HttpParseError::FieldValueEmpty))]
    fn test_content_length(#[case] input: &str, #[case] expected: Result<u64, HttpParseError>) {
        assert_eq!(content_length(input), expected);
    }

    #[test]
    fn test_max_forwards() {
        assert_eq!(max_forwards("10"), Ok(10));
        assert_eq!(max_forwards("99999999999"), Err(HttpParseError::InvalidNumber));
    }

    #[test]
    fn test_cookie() {
        assert_eq!(cookie("a=1; b=\"two\";c=").unwrap(), vec![
            ("a".to_owned(), "1".to_owned()),
            ("b".to_owned(), "\"two\"".to_owned()),
            ("c".to_owned(), String::new()),
        ]);
        assert_eq!(cookie("=value; lonely"), Err(HttpParseError::InvalidCookie));
    }

    #[test]
    fn test_host() {
        let authority = host("Example.org:8080").unwrap();
        assert_eq!(authority.host, Host::Name("example.org".to_owned()));
        assert_eq!(authority.port, Some(8080));

        assert_eq!(host("user@example.org"), Err(HttpParseError::InvalidHost));
        assert_eq!(host("exa mple.org"), Err(HttpParseError::InvalidHost));
        assert_eq!(host("example.org:99999"), Err(HttpParseError::InvalidPort));
    }

    #[rstest]
    #[case("https://example.org", true)]
    #[case("http://localhost:8080", true)]
    #[case("null", false)]
    #[case("https://example.org/path", false)]
    fn test_origin(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(origin(input).is_ok(), valid, "{input}");
    }

    #[test]
    fn test_referer() {
        assert!(referer("https://example.org/page?x=1").is_ok());
        assert!(referer("/relative/page").is_ok());
        assert_eq!(referer("https://example.org/#top"), Err(HttpParseError::InvalidUri));
    }

    #[test]
    fn test_credentials() {
        let basic = credentials("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==").unwrap();
        assert_eq!(basic.scheme, "basic");
        assert_eq!(basic.token68.as_deref(), Some("QWxhZGRpbjpvcGVuIHNlc2FtZQ=="));
        assert!(credentials("Basic a b c").is_err());
    }

    #[test]
    fn test_codings() {
        assert_eq!(codings("gzip, chunked"), Ok(vec![Encoding::Gzip, Encoding::Chunked]));
        assert_eq!(codings("zstd"), Err(HttpParseError::UnknownContentCoding));
    }

    #[test]
    fn test_from() {
        assert_eq!(from("webmaster@example.org").as_deref(), Ok("webmaster@example.org"));
        assert!(from("nobody").is_err());
    }

    #[test]
    fn test_upgrade() {
        assert_eq!(upgrade("websocket, HTTP/2.0").unwrap(), vec![
            Product { name: "websocket".to_owned(), version: None },
            Product { name: "HTTP".to_owned(), version: Some("2.0".to_owned()) },
        ]);
    }

    #[test]
    fn test_via() {
        let entries = via("1.0 fred, 1.1 p.example.net (Apache/1.1), HTTP/2 edge").unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].protocol_version, "1.0");
        assert_eq!(entries[0].received_by, "fred");
        assert_eq!(entries[1].comment.as_deref(), Some("Apache/1.1"));
        assert_eq!(entries[2].protocol_name.as_deref(), Some("HTTP"));
        assert_eq!(entries[2].protocol_version, "2");

        assert!(via("1.1").is_err());
        assert!(via("1.1 proxy (unclosed").is_err());
    }

    #[test]
    fn test_warning() {
        let warnings = warning(r#"110 anderson/1.3.37 "Response is stale" "Sun, 06 Nov 1994 08:49:37 GMT""#).unwrap();
        assert_eq!(warnings, vec![WarningValue {
            code: 110,
            agent: "anderson/1.3.37".to_owned(),
            text: "Response is stale".to_owned(),
            date: Some(UNIX_EPOCH + Duration::from_secs(784111777)),
        }]);
        assert_eq!(warnings[0].to_string(), r#"110 anderson/1.3.37 "Response is stale" "Sun, 06 Nov 1994 08:49:37 GMT""#);

        assert!(warning("1100 agent \"text\"").is_err());
        assert!(warning("110 agent text").is_err());
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(timestamp("now"), Err(HttpParseError::InvalidDate));
        assert!(timestamp("Sun, 06 Nov 1994 08:49:37 GMT").is_ok());
    }

    #[test]
    fn test_pragma_uses_cache_directives() {
        let pragma = pragma("no-cache").unwrap();
        assert_eq!(pragma, CacheControl::no_cache());
    }
}
