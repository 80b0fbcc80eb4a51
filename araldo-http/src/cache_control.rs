// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The `Cache-Control` directive map, shared by the request decoder and the
//! response builder.
//!
//! ```text
//! Cache-Control   = #cache-directive
//! cache-directive = token [ "=" ( token / quoted-string ) ]
//! ```
//!
//! # References
//! * [RFC 9111 Section 5.2](https://www.rfc-editor.org/rfc/rfc9111.html#name-cache-control)

use std::fmt::Display;

use phf::phf_map;
use unicase::UniCase;

use crate::{lists::parse_http_list, syntax, HttpParseError};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheDirective {
    MaxAge,
    MaxStale,
    MinFresh,
    MustRevalidate,
    NoCache,
    NoStore,
    NoTransform,
    OnlyIfCached,
    Private,
    ProxyRevalidate,
    Public,
    SMaxAge,

    /// A directive this module doesn't know, lowercased.
    Extension(String),
}

static CACHE_DIRECTIVE_MAP: phf::Map<UniCase<&'static str>, CacheDirective> = phf_map!(
    UniCase::ascii("max-age") => CacheDirective::MaxAge,
    UniCase::ascii("max-stale") => CacheDirective::MaxStale,
    UniCase::ascii("min-fresh") => CacheDirective::MinFresh,
    UniCase::ascii("must-revalidate") => CacheDirective::MustRevalidate,
    UniCase::ascii("no-cache") => CacheDirective::NoCache,
    UniCase::ascii("no-store") => CacheDirective::NoStore,
    UniCase::ascii("no-transform") => CacheDirective::NoTransform,
    UniCase::ascii("only-if-cached") => CacheDirective::OnlyIfCached,
    UniCase::ascii("private") => CacheDirective::Private,
    UniCase::ascii("proxy-revalidate") => CacheDirective::ProxyRevalidate,
    UniCase::ascii("public") => CacheDirective::Public,
    UniCase::ascii("s-maxage") => CacheDirective::SMaxAge,
);

impl CacheDirective {
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match CACHE_DIRECTIVE_MAP.get(&UniCase::ascii(token)) {
            Some(directive) => directive.clone(),
            None => CacheDirective::Extension(token.to_ascii_lowercase()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            CacheDirective::MaxAge => "max-age",
            CacheDirective::MaxStale => "max-stale",
            CacheDirective::MinFresh => "min-fresh",
            CacheDirective::MustRevalidate => "must-revalidate",
            CacheDirective::NoCache => "no-cache",
            CacheDirective::NoStore => "no-store",
            CacheDirective::NoTransform => "no-transform",
            CacheDirective::OnlyIfCached => "only-if-cached",
            CacheDirective::Private => "private",
            CacheDirective::ProxyRevalidate => "proxy-revalidate",
            CacheDirective::Public => "public",
            CacheDirective::SMaxAge => "s-maxage",
            CacheDirective::Extension(name) => name,
        }
    }

    /// How the argument of the directive is validated.
    fn argument(&self) -> Argument {
        match self {
            CacheDirective::MaxAge | CacheDirective::MinFresh | CacheDirective::SMaxAge => Argument::Seconds,
            CacheDirective::MaxStale => Argument::OptionalSeconds,
            CacheDirective::NoCache | CacheDirective::Private | CacheDirective::Extension(_) => Argument::Any,
            _ => Argument::None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Argument {
    None,
    Seconds,
    OptionalSeconds,
    Any,
}

/// Directives in insertion order. A directive occurs at most once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: Vec<(CacheDirective, Option<String>)>,
}

impl CacheControl {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The map `Pragma: no-cache` stands for when `Cache-Control` is absent.
    #[must_use]
    pub fn no_cache() -> Self {
        let mut map = Self::new();
        map.directives.push((CacheDirective::NoCache, None));
        map
    }

    pub fn parse(value: &str) -> Result<Self, HttpParseError> {
        let mut map = Self::new();
        for element in parse_http_list(value) {
            let name = syntax::scan_token(element, 0);
            if name.is_invalid() {
                return Err(HttpParseError::InvalidCacheControl);
            }

            let rest = &element[name.position..];
            let argument = if rest.is_empty() {
                None
            } else if let Some(argument) = rest.strip_prefix('=') {
                Some(parse_argument(argument)?)
            } else {
                return Err(HttpParseError::InvalidCacheControl);
            };

            let directive = CacheDirective::from_token(name.value);
            validate_argument(&directive, argument.as_deref())?;
            map.insert(directive, argument);
        }

        if map.is_empty() {
            return Err(HttpParseError::InvalidCacheControl);
        }
        Ok(map)
    }

    /// Sets the directive, replacing the argument when it's already present.
    pub fn insert(&mut self, directive: CacheDirective, argument: Option<String>) {
        match self.directives.iter_mut().find(|(existing, _)| *existing == directive) {
            Some(entry) => entry.1 = argument,
            None => self.directives.push((directive, argument)),
        }
    }

    /// Like [`CacheControl::insert`], but rejects an argument the directive
    /// doesn't take, e.g. `max-age` without seconds.
    pub fn try_insert(&mut self, directive: CacheDirective, argument: Option<String>) -> Result<(), HttpParseError> {
        if let Some(argument) = &argument {
            syntax::validate_field_content(argument.as_bytes())?;
        }
        validate_argument(&directive, argument.as_deref())?;
        self.insert(directive, argument);
        Ok(())
    }

    pub fn remove(&mut self, directive: &CacheDirective) {
        self.directives.retain(|(existing, _)| existing != directive);
    }

    #[must_use]
    pub fn contains(&self, directive: &CacheDirective) -> bool {
        self.directives.iter().any(|(existing, _)| existing == directive)
    }

    /// Returns `Some(argument)` when the directive is present.
    #[must_use]
    pub fn get(&self, directive: &CacheDirective) -> Option<Option<&str>> {
        self.directives.iter()
            .find(|(existing, _)| existing == directive)
            .map(|(_, argument)| argument.as_deref())
    }

    /// The argument of a delta-seconds directive such as `max-age`.
    #[must_use]
    pub fn seconds(&self, directive: &CacheDirective) -> Option<u64> {
        self.get(directive)??.parse().ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CacheDirective, Option<&str>)> {
        self.directives.iter().map(|(directive, argument)| (directive, argument.as_deref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

fn parse_argument(argument: &str) -> Result<String, HttpParseError> {
    if argument.starts_with('"') {
        let (text, position) = syntax::scan_quoted_string(argument, 0).into_result()
            .map_err(|_| HttpParseError::InvalidCacheControl)?;
        if position != argument.len() {
            return Err(HttpParseError::InvalidCacheControl);
        }
        return Ok(text);
    }

    syntax::validate_token(argument).map_err(|_| HttpParseError::InvalidCacheControl)?;
    Ok(argument.to_owned())
}

fn is_delta_seconds(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}

fn validate_argument(directive: &CacheDirective, argument: Option<&str>) -> Result<(), HttpParseError> {
    let valid = match (directive.argument(), argument) {
        (Argument::None, argument) => argument.is_none(),
        (Argument::Seconds, Some(value)) => is_delta_seconds(value),
        (Argument::Seconds, None) => false,
        (Argument::OptionalSeconds, argument) => argument.map_or(true, is_delta_seconds),
        (Argument::Any, _) => true,
    };

    if valid {
        Ok(())
    } else {
        Err(HttpParseError::InvalidCacheControl)
    }
}

impl Display for CacheControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, (directive, argument)) in self.directives.iter().enumerate() {
            if index != 0 {
                f.write_str(", ")?;
            }
            f.write_str(directive.as_str())?;

            match argument {
                Some(argument) if syntax::validate_token(argument).is_ok() => write!(f, "={argument}")?,
                Some(argument) => match syntax::to_quoted_string(argument) {
                    Ok(quoted) => write!(f, "={quoted}")?,
                    Err(_) => return Err(std::fmt::Error),
                },
                None => (),
            }
        }
        Ok(())
    }
}
