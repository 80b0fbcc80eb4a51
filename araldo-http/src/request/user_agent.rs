// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Parsing and classification of the `User-Agent` request header.
//!
//! ```text
//! User-Agent = product *( RWS ( product / comment ) )
//! product         = token [ "/" product-version ]
//! product-version = token
//! ```
//!
//! The classification is a heuristic over the well-known product tokens and
//! the platform comment. It is meant for serving workarounds, never for
//! access control: every part of the value is chosen by the client.
//!
//! # References
//! * [RFC 9110 Section 10.1.5](https://www.rfc-editor.org/rfc/rfc9110.html#name-user-agent)

use crate::{syntax, HttpParseError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub version: Option<String>,
}

/// The browser or tool that sent the request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Agent {
    Chrome,
    Curl,
    Elinks,
    Epiphany,
    Firefox,
    InternetExplorer,
    Konqueror,
    Links,
    Lynx,
    Midori,
    Opera,
    Safari,
    Seamonkey,
    Wget,
}

impl Agent {
    #[must_use]
    pub fn machine_name(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Curl => "curl",
            Self::Elinks => "elinks",
            Self::Epiphany => "epiphany",
            Self::Firefox => "firefox",
            Self::InternetExplorer => "ie",
            Self::Konqueror => "konqueror",
            Self::Links => "links",
            Self::Lynx => "lynx",
            Self::Midori => "midori",
            Self::Opera => "opera",
            Self::Safari => "safari",
            Self::Seamonkey => "seamonkey",
            Self::Wget => "wget",
        }
    }

    #[must_use]
    pub fn human_name(&self) -> &'static str {
        match self {
            Self::Chrome => "Google Chrome",
            Self::Curl => "Curl",
            Self::Elinks => "ELinks",
            Self::Epiphany => "Epiphany",
            Self::Firefox => "Firefox",
            Self::InternetExplorer => "Internet Explorer",
            Self::Konqueror => "Konqueror",
            Self::Links => "Links",
            Self::Lynx => "Lynx",
            Self::Midori => "Midori",
            Self::Opera => "Opera",
            Self::Safari => "Safari",
            Self::Seamonkey => "SeaMonkey",
            Self::Wget => "Wget",
        }
    }
}

/// The rendering engine. Command line tools are their own engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Engine {
    Curl,
    Elinks,
    Gecko,
    Links,
    Lynx,
    Presto,
    Trident,
    Webkit,
    Wget,
}

impl Engine {
    #[must_use]
    pub fn machine_name(&self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Elinks => "elinks",
            Self::Gecko => "gecko",
            Self::Links => "links",
            Self::Lynx => "lynx",
            Self::Presto => "presto",
            Self::Trident => "trident",
            Self::Webkit => "webkit",
            Self::Wget => "wget",
        }
    }

    #[must_use]
    pub fn human_name(&self) -> &'static str {
        match self {
            Self::Curl => "Curl",
            Self::Elinks => "ELinks",
            Self::Gecko => "Gecko",
            Self::Links => "Links",
            Self::Lynx => "Lynx",
            Self::Presto => "Presto",
            Self::Trident => "Trident",
            Self::Webkit => "WebKit",
            Self::Wget => "Wget",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserAgent {
    /// The value as received, trimmed.
    pub full: String,
    pub products: Vec<Product>,
    pub comments: Vec<String>,

    pub agent: Option<Agent>,
    pub engine: Option<Engine>,
    pub version_major: Option<u32>,
    pub version_engine: Option<u32>,

    /// Legacy Edge, which announces itself with an `Edge/` product.
    pub is_ie_edge: bool,

    /// Internet Explorer claiming to be version 7 while running a newer
    /// Trident.
    pub is_ie_compatibility: bool,
}

/// The leading number of a version, e.g. `120` for `120.0.6099.71`.
fn major_version(version: &str) -> Option<u32> {
    let end = version.bytes().position(|byte| !byte.is_ascii_digit()).unwrap_or(version.len());
    version[..end].parse().ok()
}

/// Undoes the compatibility-mode version, based on the Trident version.
fn ie_version_for_trident(trident: Option<u32>) -> Option<u32> {
    match trident? {
        4 => Some(8),
        5 => Some(9),
        6 => Some(10),
        7 => Some(11),
        _ => None,
    }
}

enum Element<'a> {
    Product(&'a str, Option<&'a str>),
    Comment(&'a str),
}

fn tokenize(value: &str) -> Result<Vec<Element<'_>>, HttpParseError> {
    let mut elements = Vec::new();
    let mut position = 0;

    while position < value.len() {
        if value[position..].starts_with('(') {
            let comment = syntax::scan_comment(value, position);
            if comment.is_invalid() {
                return Err(HttpParseError::InvalidUserAgent);
            }
            elements.push(Element::Comment(comment.value));
            position = comment.position;
        } else {
            let name = syntax::scan_token(value, position);
            if name.is_invalid() {
                return Err(HttpParseError::InvalidUserAgent);
            }
            position = name.position;

            let mut version = None;
            if value[position..].starts_with('/') {
                let scan = syntax::scan_token(value, position + 1);
                if scan.is_invalid() {
                    return Err(HttpParseError::InvalidUserAgent);
                }
                version = Some(scan.value);
                position = scan.position;
            }
            elements.push(Element::Product(name.value, version));
        }

        let next = syntax::skip_whitespace(value, position);
        if next == position && next != value.len() && !value[next..].starts_with('(') {
            return Err(HttpParseError::InvalidUserAgent);
        }
        position = next;
    }

    match elements.first() {
        Some(Element::Product(..)) => Ok(elements),
        _ => Err(HttpParseError::InvalidUserAgent),
    }
}

impl UserAgent {
    pub fn parse(value: &str) -> Result<Self, HttpParseError> {
        let value = syntax::prepare(value)?;
        let elements = tokenize(value)?;

        let mut user_agent = UserAgent {
            full: value.to_owned(),
            ..Default::default()
        };

        let mut seen_platform = false;
        for element in &elements {
            match element {
                Element::Product(name, version) => {
                    user_agent.products.push(Product {
                        name: (*name).to_owned(),
                        version: version.map(str::to_owned),
                    });
                    if let Some(version) = version {
                        user_agent.classify_product(&name.to_ascii_lowercase(), version);
                    }
                }
                Element::Comment(comment) => {
                    user_agent.comments.push((*comment).to_owned());
                    if seen_platform {
                        user_agent.classify_trailing_comment(&comment.to_ascii_lowercase());
                    } else {
                        seen_platform = true;
                        user_agent.classify_platform(&comment.to_ascii_lowercase());
                    }
                }
            }
        }

        user_agent.apply_version_product();
        user_agent.apply_internet_explorer_rules(value);
        if user_agent.engine.is_none() {
            user_agent.classify_command_line_tool();
        }

        Ok(user_agent)
    }

    /// The first comment, e.g. `(Windows NT 10.0; Trident/7.0; rv:11.0)`.
    fn classify_platform(&mut self, comment: &str) {
        for piece in comment.split(';').map(str::trim) {
            let mut parts = piece.split('/');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(name), Some(version), None) => {
                    let engine = match name.trim() {
                        "trident" => {
                            self.agent = Some(Agent::InternetExplorer);
                            Engine::Trident
                        }
                        "gecko" => Engine::Gecko,
                        "presto" => Engine::Presto,
                        _ => continue,
                    };
                    self.engine = Some(engine);
                    self.version_engine = major_version(version.trim());
                }
                (Some(piece), None, None) => {
                    if let Some(version) = piece.strip_prefix("msie ") {
                        self.agent = Some(Agent::InternetExplorer);
                        self.version_major = self.version_major.or(major_version(version));
                    } else if piece.contains("midori") {
                        self.agent = Some(Agent::Midori);
                        self.engine = Some(Engine::Webkit);
                    } else if let Some(revision) = piece.strip_prefix("rv:") {
                        self.version_major = self.version_major.or(major_version(revision));
                    }
                }
                _ => (),
            }
        }
    }

    /// A comment after the platform, `(KHTML, like Gecko)` being the only
    /// one that matters.
    fn classify_trailing_comment(&mut self, comment: &str) {
        if !comment.starts_with("khtml") {
            return;
        }

        if self.engine.is_none() || matches!(self.agent, Some(Agent::Epiphany | Agent::Konqueror)) {
            self.engine = Some(Engine::Webkit);
        }
        if self.agent.is_none() {
            self.agent = Some(Agent::Safari);
        }
    }

    fn set_agent(&mut self, agent: Agent, version: &str) {
        self.agent = Some(agent);
        self.version_major = self.version_major.or(major_version(version));
    }

    fn classify_product(&mut self, name: &str, version: &str) {
        match name {
            "applewebkit" => {
                self.engine = Some(Engine::Webkit);
                self.version_engine = major_version(version);
            }
            // Many browsers mention Safari, so it only counts when nothing
            // else was found.
            "safari" => if matches!(self.agent, None | Some(Agent::Safari)) {
                self.set_agent(Agent::Safari, version);
                self.engine.get_or_insert(Engine::Webkit);
            },
            "firefox" => {
                self.set_agent(Agent::Firefox, version);
                self.engine = Some(Engine::Gecko);
            }
            "seamonkey" => {
                self.set_agent(Agent::Seamonkey, version);
                self.engine = Some(Engine::Gecko);
            }
            "gecko" => if self.version_engine.is_none() && matches!(self.engine, None | Some(Engine::Gecko)) {
                self.engine = Some(Engine::Gecko);
                self.version_engine = major_version(version);
            },
            "chrome" => if matches!(self.agent, None | Some(Agent::Safari)) {
                self.set_agent(Agent::Chrome, version);
            },
            "chromium" => self.set_agent(Agent::Chrome, version),
            "epiphany" => {
                self.set_agent(Agent::Epiphany, version);
                self.engine.get_or_insert(Engine::Gecko);
            }
            "konqueror" => {
                self.set_agent(Agent::Konqueror, version);
                self.engine.get_or_insert(Engine::Gecko);
            }
            "khtml" => self.set_agent(Agent::Konqueror, version),
            "opr" | "opera" => {
                self.set_agent(Agent::Opera, version);
                self.engine.get_or_insert(Engine::Presto);
            }
            "edge" => {
                self.set_agent(Agent::InternetExplorer, version);
                self.is_ie_edge = true;
            }
            "midori" => self.set_agent(Agent::Midori, version),
            _ => (),
        }
    }

    /// Safari and Presto-era Opera put the browser version in a separate
    /// `Version/` product.
    fn apply_version_product(&mut self) {
        if !matches!(self.agent, Some(Agent::Safari | Agent::Opera)) {
            return;
        }

        let version = self.products.iter()
            .find(|product| product.name.eq_ignore_ascii_case("version"))
            .and_then(|product| product.version.as_deref())
            .and_then(major_version);
        if version.is_some() {
            self.version_major = version;
        }
    }

    fn apply_internet_explorer_rules(&mut self, value: &str) {
        if self.agent != Some(Agent::InternetExplorer) {
            return;
        }

        if self.engine == Some(Engine::Trident) && self.version_major.is_none() {
            self.version_major = if self.is_ie_edge {
                Some(12)
            } else {
                ie_version_for_trident(self.version_engine)
            };
        }

        if self.version_major == Some(7) && self.engine == Some(Engine::Trident) {
            self.is_ie_compatibility = true;

            let actual = if self.is_ie_edge {
                Some(12)
            } else {
                ie_version_for_trident(self.version_engine)
            };
            match actual {
                Some(version) => self.version_major = Some(version),
                None if value.to_ascii_lowercase().contains("; eie10;") => self.version_major = Some(10),
                None => (),
            }
        }

        self.engine = Some(Engine::Trident);
    }

    fn classify_command_line_tool(&mut self) {
        let Some(product) = self.products.first() else {
            return;
        };

        let (agent, engine) = match product.name.to_ascii_lowercase().as_str() {
            "curl" => (Agent::Curl, Engine::Curl),
            "wget" => (Agent::Wget, Engine::Wget),
            "elinks" => (Agent::Elinks, Engine::Elinks),
            "lynx" => (Agent::Lynx, Engine::Lynx),
            "links" => (Agent::Links, Engine::Links),
            _ => return,
        };

        let version = product.version.as_deref().and_then(major_version);
        self.agent = Some(agent);
        self.engine = Some(engine);
        self.version_major = version;
        self.version_engine = version;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        Some(Agent::Chrome), Some(Engine::Webkit), Some(120)
    )]
    #[case(
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
        Some(Agent::Firefox), Some(Engine::Gecko), Some(121)
    )]
    #[case(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
        Some(Agent::Safari), Some(Engine::Webkit), Some(17)
    )]
    #[case(
        "Mozilla/5.0 (Windows NT 10.0; Trident/7.0; rv:11.0) like Gecko",
        Some(Agent::InternetExplorer), Some(Engine::Trident), Some(11)
    )]
    #[case("curl/8.4.0", Some(Agent::Curl), Some(Engine::Curl), Some(8))]
    #[case("Wget/1.21.4", Some(Agent::Wget), Some(Engine::Wget), Some(1))]
    #[case("Lynx/2.9.0dev.12 libwww-FM/2.14", Some(Agent::Lynx), Some(Engine::Lynx), Some(2))]
    #[case("Links", Some(Agent::Links), Some(Engine::Links), None)]
    #[case("SomeBot/1.0 (+https://example.org/bot)", None, None, None)]
    fn test_classification(#[case] input: &str, #[case] agent: Option<Agent>, #[case] engine: Option<Engine>, #[case] version: Option<u32>) {
        let user_agent = UserAgent::parse(input).unwrap();
        assert_eq!(user_agent.agent, agent, "agent of {input}");
        assert_eq!(user_agent.engine, engine, "engine of {input}");
        assert_eq!(user_agent.version_major, version, "version of {input}");
        assert_eq!(user_agent.full, input);
    }

    #[test]
    fn test_ie_compatibility_mode() {
        let user_agent = UserAgent::parse("Mozilla/4.0 (compatible; MSIE 7.0; Windows NT 6.3; Trident/7.0)").unwrap();
        assert_eq!(user_agent.agent, Some(Agent::InternetExplorer));
        assert!(user_agent.is_ie_compatibility);
        assert_eq!(user_agent.version_major, Some(11));
        assert_eq!(user_agent.version_engine, Some(7));
    }

    #[test]
    fn test_products_and_comments() {
        let user_agent = UserAgent::parse("Mozilla/5.0 (X11; Linux x86_64) Foo").unwrap();
        assert_eq!(user_agent.products, vec![
            Product { name: "Mozilla".to_owned(), version: Some("5.0".to_owned()) },
            Product { name: "Foo".to_owned(), version: None },
        ]);
        assert_eq!(user_agent.comments, vec!["X11; Linux x86_64".to_owned()]);
    }

    #[rstest]
    #[case("Mozilla/5.0 (X11; Linux")]
    #[case("(comment) Mozilla/5.0")]
    #[case("Mozilla/")]
    #[case("Mozilla/5.0/extra")]
    fn test_invalid(#[case] input: &str) {
        assert_eq!(UserAgent::parse(input), Err(HttpParseError::InvalidUserAgent));
    }

    #[test]
    fn test_names() {
        assert_eq!(Agent::InternetExplorer.machine_name(), "ie");
        assert_eq!(Agent::Chrome.human_name(), "Google Chrome");
        assert_eq!(Engine::Trident.human_name(), "Trident");
    }
}
