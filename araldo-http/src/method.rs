// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use phf::phf_map;
use unicase::UniCase;

/// The request methods the engine recognises. Other methods are kept
/// verbatim so the application can still answer them, e.g. with `501`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Other(String),
    Connect,
    Debug,
    Delete,
    Get,
    Head,
    Options,
    Patch,
    Post,
    Put,
    Trace,
    Track,
}

impl Method {
    /// Get the method in string form.
    ///
    /// # Notes
    /// RFC 9110 makes methods case-sensitive, but clients in the wild send
    /// `get` and `Post`, so lookup ignores case and the canonical uppercase
    /// form is returned here.
    ///
    /// # References
    /// * [RFC 9110 - Section 9. Methods](https://www.rfc-editor.org/rfc/rfc9110.html#section-9)
    pub fn as_str(&self) -> &str {
        match self {
            Self::Other(str) => str,
            Self::Connect => "CONNECT",
            Self::Debug => "DEBUG",
            Self::Delete => "DELETE",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Trace => "TRACE",
            Self::Track => "TRACK",
        }
    }

    /// Safe methods don't change state on the server, which is what allows
    /// `If-None-Match` to answer with `304`.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Get | Self::Head | Self::Options | Self::Trace)
    }
}

static METHOD_MAP: phf::Map<UniCase<&'static str>, Method> = phf_map!(
    UniCase::ascii("CONNECT") => Method::Connect,
    UniCase::ascii("DEBUG") => Method::Debug,
    UniCase::ascii("DELETE") => Method::Delete,
    UniCase::ascii("GET") => Method::Get,
    UniCase::ascii("HEAD") => Method::Head,
    UniCase::ascii("OPTIONS") => Method::Options,
    UniCase::ascii("PATCH") => Method::Patch,
    UniCase::ascii("POST") => Method::Post,
    UniCase::ascii("PUT") => Method::Put,
    UniCase::ascii("TRACE") => Method::Trace,
    UniCase::ascii("TRACK") => Method::Track,
);

impl From<String> for Method {
    fn from(value: String) -> Self {
        match METHOD_MAP.get(&UniCase::ascii(value.as_str())) {
            Some(method) => method.clone(),
            None => Method::Other(value),
        }
    }
}

impl From<&str> for Method {
    fn from(value: &str) -> Self {
        match METHOD_MAP.get(&UniCase::ascii(value)) {
            Some(method) => method.clone(),
            None => Method::Other(value.to_string()),
        }
    }
}
