// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum HttpVersion {
    Http10,
    #[default]
    Http11,
    Http2,
    Http3,
}

impl HttpVersion {
    /// Formats the [`HttpVersion`] to a HTTP-Version, as specified by RFC 9112.
    ///
    /// # References
    /// * [RFC 9112 Section 2.3](https://www.rfc-editor.org/rfc/rfc9112.html#name-http-version)
    pub fn to_http_version(&self) -> &'static str {
        match self {
            Self::Http10 => "HTTP/1.0",
            Self::Http11 => "HTTP/1.1",
            Self::Http2 => "HTTP/2.0",
            Self::Http3 => "HTTP/3.0",
        }
    }

    /// Parses the protocol as passed on by the transport, e.g. `HTTP/1.1`
    /// or the CGI `SERVER_PROTOCOL` value.
    pub fn from_protocol(protocol: &str) -> Option<Self> {
        match protocol {
            "HTTP/1.0" => Some(Self::Http10),
            "HTTP/1.1" => Some(Self::Http11),
            "HTTP/2" | "HTTP/2.0" => Some(Self::Http2),
            "HTTP/3" | "HTTP/3.0" => Some(Self::Http3),
            _ => None,
        }
    }
}
