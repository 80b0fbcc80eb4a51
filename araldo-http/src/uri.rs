// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The URI grammar used by `Host`, `Origin`, `Referer`, `Location` and the
//! other headers carrying a reference.
//!
//! # References
//! * [RFC 3986](https://www.rfc-editor.org/rfc/rfc3986.html)

use std::{fmt::Display, net::{Ipv4Addr, Ipv6Addr}};

use crate::{abnf, syntax::Scan, HttpParseError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Host {
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
    /// A registered name, lowercased.
    Name(String),
}

impl Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ipv4(address) => address.fmt(f),
            Self::Ipv6(address) => write!(f, "[{address}]"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// ```text
/// authority   = [ userinfo "@" ] host [ ":" port ]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Authority {
    pub user_info: Option<String>,
    pub host: Host,
    pub port: Option<u16>,
}

impl Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(user_info) = &self.user_info {
            write!(f, "{user_info}@")?;
        }
        self.host.fmt(f)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// A URI reference. Relative references leave `scheme` and `authority`
/// empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    /// The scheme, lowercased.
    pub scheme: Option<String>,
    pub authority: Option<Authority>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl Uri {
    /// Parses a complete URI reference; trailing input is an error.
    pub fn parse(input: &str) -> Result<Self, HttpParseError> {
        let (uri, position) = scan_uri(input, 0).into_result()?;
        if position != input.len() {
            return Err(HttpParseError::TrailingCharacters);
        }
        Ok(uri)
    }

    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// The `scheme://authority` part, as used by `Origin`.
    #[must_use]
    pub fn origin(&self) -> Option<String> {
        match (&self.scheme, &self.authority) {
            (Some(scheme), Some(authority)) => Some(format!("{scheme}://{}", authority.host_and_port())),
            _ => None,
        }
    }
}

impl Authority {
    fn host_and_port(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{port}", self.host),
            None => self.host.to_string(),
        }
    }
}

impl Display for Uri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

fn is_percent_encoded(bytes: &[u8], position: usize) -> bool {
    bytes.get(position) == Some(&b'%')
        && bytes.get(position + 1).is_some_and(u8::is_ascii_hexdigit)
        && bytes.get(position + 2).is_some_and(u8::is_ascii_hexdigit)
}

/// Consumes characters accepted by `predicate` and percent-encodings,
/// returning the end position.
fn consume(input: &str, start: usize, predicate: impl Fn(u8) -> bool) -> usize {
    let bytes = input.as_bytes();
    let mut position = start;
    while position < bytes.len() {
        if is_percent_encoded(bytes, position) {
            position += 3;
        } else if predicate(bytes[position]) {
            position += 1;
        } else {
            break;
        }
    }
    position
}

/// ```text
/// scheme      = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
/// ```
fn scan_scheme(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    if !bytes.first()?.is_ascii_alphabetic() {
        return None;
    }

    let end = bytes.iter()
        .position(|byte| !(byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.')))?;
    (bytes[end] == b':').then_some(end)
}

/// ```text
/// host        = IP-literal / IPv4address / reg-name
/// IP-literal  = "[" IPv6address "]"
/// port        = *DIGIT
/// ```
#[must_use]
pub fn scan_authority(input: &str, start: usize) -> Scan<Option<Authority>> {
    let end = consume(input, start, |byte| {
        abnf::is_unreserved(byte) || abnf::is_sub_delim(byte) || matches!(byte, b':' | b'@' | b'[' | b']')
    });
    let text = &input[start..end];
    let fail = |error| Scan { value: None, position: end, error: Some(error) };

    let (user_info, host_port) = match text.rsplit_once('@') {
        Some((user_info, host_port)) => (Some(user_info.to_owned()), host_port),
        None => (None, text),
    };

    let (host, port) = if let Some(literal) = host_port.strip_prefix('[') {
        let Some((address, rest)) = literal.split_once(']') else {
            return fail(HttpParseError::InvalidHost);
        };
        let Ok(address) = address.parse::<Ipv6Addr>() else {
            return fail(HttpParseError::InvalidHost);
        };
        let port = match rest {
            "" => None,
            _ => match rest.strip_prefix(':') {
                Some(port) => Some(port),
                None => return fail(HttpParseError::InvalidHost),
            },
        };
        (Host::Ipv6(address), port)
    } else {
        let (name, port) = match host_port.split_once(':') {
            Some((name, port)) => (name, Some(port)),
            None => (host_port, None),
        };
        if name.contains(['[', ']', ':']) {
            return fail(HttpParseError::InvalidHost);
        }
        let host = match name.parse::<Ipv4Addr>() {
            Ok(address) => Host::Ipv4(address),
            Err(_) => Host::Name(name.to_ascii_lowercase()),
        };
        (host, port)
    };

    // An empty port is allowed by the grammar and means the default one.
    let port = match port {
        None | Some("") => None,
        Some(port) => match port.parse::<u16>() {
            Ok(port_number) if port.bytes().all(|byte| byte.is_ascii_digit()) => Some(port_number),
            _ => return fail(HttpParseError::InvalidPort),
        },
    };

    Scan { value: Some(Authority { user_info, host, port }), position: end, error: None }
}

/// ```text
/// URI-reference = URI / relative-ref
/// URI           = scheme ":" hier-part [ "?" query ] [ "#" fragment ]
/// relative-ref  = relative-part [ "?" query ] [ "#" fragment ]
/// hier-part     = "//" authority path-abempty
///               / path-absolute / path-rootless / path-empty
/// ```
#[must_use]
pub fn scan_uri(input: &str, start: usize) -> Scan<Uri> {
    let bytes = input.as_bytes();
    let mut uri = Uri::default();
    let mut position = start;

    if let Some(length) = scan_scheme(&input[start..]) {
        uri.scheme = Some(input[start..start + length].to_ascii_lowercase());
        position += length + 1;
    }

    if input[position..].starts_with("//") {
        let authority = scan_authority(input, position + 2);
        if let Some(error) = authority.error {
            return Scan { value: uri, position: authority.position, error: Some(error) };
        }
        uri.authority = authority.value;
        position = authority.position;
    }

    let path_end = consume(input, position, |byte| abnf::is_path_character(byte) || byte == b'/');
    uri.path = input[position..path_end].to_owned();
    position = path_end;

    if bytes.get(position) == Some(&b'?') {
        let end = consume(input, position + 1, |byte| abnf::is_path_character(byte) || matches!(byte, b'/' | b'?'));
        uri.query = Some(input[position + 1..end].to_owned());
        position = end;
    }

    if bytes.get(position) == Some(&b'#') {
        let end = consume(input, position + 1, |byte| abnf::is_path_character(byte) || matches!(byte, b'/' | b'?'));
        uri.fragment = Some(input[position + 1..end].to_owned());
        position = end;
    }

    if position == start {
        return Scan { value: uri, position, error: Some(HttpParseError::InvalidUri) };
    }

    Scan { value: uri, position, error: None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_absolute() {
        let uri = Uri::parse("HTTPS://user:pw@Example.COM:8443/a/b%20c?x=1&y#top").unwrap();
        assert_eq!(uri.scheme.as_deref(), Some("https"));
        assert_eq!(uri.authority, Some(Authority {
            user_info: Some("user:pw".to_owned()),
            host: Host::Name("example.com".to_owned()),
            port: Some(8443),
        }));
        assert_eq!(uri.path, "/a/b%20c");
        assert_eq!(uri.query.as_deref(), Some("x=1&y"));
        assert_eq!(uri.fragment.as_deref(), Some("top"));
        assert_eq!(uri.origin().as_deref(), Some("https://example.com:8443"));
    }

    #[rstest]
    #[case("192.168.0.1:80", Host::Ipv4(Ipv4Addr::new(192, 168, 0, 1)), Some(80))]
    #[case("[::1]:8080", Host::Ipv6(Ipv6Addr::LOCALHOST), Some(8080))]
    #[case("[::1]", Host::Ipv6(Ipv6Addr::LOCALHOST), None)]
    #[case("localhost", Host::Name("localhost".to_owned()), None)]
    #[case("localhost:", Host::Name("localhost".to_owned()), None)]
    fn test_scan_authority(#[case] input: &str, #[case] host: Host, #[case] port: Option<u16>) {
        let scan = scan_authority(input, 0);
        assert_eq!(scan.error, None);
        assert_eq!(scan.position, input.len());
        let authority = scan.value.unwrap();
        assert_eq!(authority.host, host);
        assert_eq!(authority.port, port);
    }

    #[rstest]
    #[case("example.com:http", HttpParseError::InvalidPort)]
    #[case("example.com:70000", HttpParseError::InvalidPort)]
    #[case("[::1", HttpParseError::InvalidHost)]
    #[case("[nonsense]", HttpParseError::InvalidHost)]
    #[case("a:b:c", HttpParseError::InvalidPort)]
    fn test_scan_authority_invalid(#[case] input: &str, #[case] expected: HttpParseError) {
        assert_eq!(scan_authority(input, 0).error, Some(expected));
    }

    #[rstest]
    #[case("/index.html?q=1")]
    #[case("relative/path")]
    #[case("mailto:someone@example.org")]
    #[case("https://example.org")]
    #[case("http://[2001:db8::7]/c=GB?objectClass?one")]
    fn test_display_round_trip(#[case] input: &str) {
        assert_eq!(Uri::parse(input).unwrap().to_string(), input.to_owned());
    }

    #[rstest]
    #[case("")]
    #[case("https://exa mple.org")]
    #[case("/path with spaces")]
    #[case("http://a/<script>")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(Uri::parse(input).is_err(), "{input} should be invalid");
    }
}
