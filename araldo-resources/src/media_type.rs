// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use phf::phf_map;
use unicase::UniCase;

/// A media type essence (`type/subtype`), without parameters. The `charset`
/// parameter is carried separately by the `Content-Type` value.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaType {
    Common(&'static str),
    Custom(String),
}

impl MediaType {
    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Common(s) => s,
            MediaType::Custom(s) => s,
        }
    }

    /// Parses a `type/subtype` essence. Known types map onto the shared
    /// constants, other well-formed types are kept lowercased.
    ///
    /// # References
    /// * [RFC 6838 Section 4.2](https://www.rfc-editor.org/rfc/rfc6838.html#section-4.2)
    #[must_use]
    pub fn parse(essence: &str) -> Option<Self> {
        if let Some(common) = MEDIA_TYPE_MAP.get(&UniCase::ascii(essence)) {
            return Some(MediaType::Common(*common));
        }

        let (category, subtype) = essence.split_once('/')?;
        if !is_restricted_name(category) || !is_restricted_name(subtype) {
            return None;
        }

        Some(MediaType::Custom(essence.to_ascii_lowercase()))
    }

    #[must_use]
    pub fn category(&self) -> MediaCategory {
        let category = self.as_str().split('/').next().unwrap_or_default();
        MediaCategory::from_name(category).unwrap_or(MediaCategory::Unknown)
    }
}

/// ```text
/// restricted-name = restricted-name-first *126restricted-name-chars
/// restricted-name-first  = ALPHA / DIGIT
/// restricted-name-chars  = ALPHA / DIGIT / "!" / "#" /
///                          "$" / "&" / "-" / "^" / "_"
/// restricted-name-chars =/ "." ; Characters before first dot always
///                               ; specify a facet name
/// restricted-name-chars =/ "+" ; Characters after last plus always
///                               ; specify a structured syntax suffix
/// ```
fn is_restricted_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };

    first.is_ascii_alphanumeric()
        && name.len() <= 127
        && bytes.all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'!' | b'#' | b'$' | b'&' | b'-' | b'^' | b'_' | b'.' | b'+'))
}

impl MediaType {
    //
    // General
    //
    pub const OCTET_STREAM: MediaType = MediaType::Common("application/octet-stream");

    //
    // Text
    //
    pub const CASCADING_STYLE_SHEETS: MediaType = MediaType::Common("text/css");
    pub const CSV: MediaType = MediaType::Common("text/csv");
    pub const HTML: MediaType = MediaType::Common("text/html");
    pub const JAVASCRIPT: MediaType = MediaType::Common("text/javascript");
    pub const MARKDOWN: MediaType = MediaType::Common("text/markdown");
    pub const PLAIN_TEXT: MediaType = MediaType::Common("text/plain");

    //
    // Application
    //
    pub const ATOM: MediaType = MediaType::Common("application/atom+xml");
    pub const FORM_URLENCODED: MediaType = MediaType::Common("application/x-www-form-urlencoded");
    pub const GZIP: MediaType = MediaType::Common("application/gzip");
    pub const JSON: MediaType = MediaType::Common("application/json");
    pub const JSON_PATCH: MediaType = MediaType::Common("application/json-patch+json");
    pub const PDF: MediaType = MediaType::Common("application/pdf");
    pub const RSS: MediaType = MediaType::Common("application/rss+xml");
    pub const XHTML: MediaType = MediaType::Common("application/xhtml+xml");
    pub const XML: MediaType = MediaType::Common("application/xml");
    pub const ZIP: MediaType = MediaType::Common("application/zip");

    //
    // Image
    //
    pub const GIF: MediaType = MediaType::Common("image/gif");
    pub const ICO: MediaType = MediaType::Common("image/x-icon");
    pub const JPEG: MediaType = MediaType::Common("image/jpeg");
    pub const PNG: MediaType = MediaType::Common("image/png");
    pub const SVG: MediaType = MediaType::Common("image/svg+xml");
    pub const WEBP: MediaType = MediaType::Common("image/webp");

    //
    // Audio / Video
    //
    pub const MP3: MediaType = MediaType::Common("audio/mpeg");
    pub const OGG_AUDIO: MediaType = MediaType::Common("audio/ogg");
    pub const MP4: MediaType = MediaType::Common("video/mp4");
    pub const WEBM: MediaType = MediaType::Common("video/webm");

    //
    // Multipart
    //
    pub const FORM_DATA: MediaType = MediaType::Common("multipart/form-data");
}

static MEDIA_TYPE_MAP: phf::Map<UniCase<&'static str>, &'static str> = phf_map!(
    UniCase::ascii("application/octet-stream") => "application/octet-stream",
    UniCase::ascii("text/css") => "text/css",
    UniCase::ascii("text/csv") => "text/csv",
    UniCase::ascii("text/html") => "text/html",
    UniCase::ascii("text/javascript") => "text/javascript",
    UniCase::ascii("text/markdown") => "text/markdown",
    UniCase::ascii("text/plain") => "text/plain",
    UniCase::ascii("application/atom+xml") => "application/atom+xml",
    UniCase::ascii("application/x-www-form-urlencoded") => "application/x-www-form-urlencoded",
    UniCase::ascii("application/gzip") => "application/gzip",
    UniCase::ascii("application/json") => "application/json",
    UniCase::ascii("application/json-patch+json") => "application/json-patch+json",
    UniCase::ascii("application/pdf") => "application/pdf",
    UniCase::ascii("application/rss+xml") => "application/rss+xml",
    UniCase::ascii("application/xhtml+xml") => "application/xhtml+xml",
    UniCase::ascii("application/xml") => "application/xml",
    UniCase::ascii("application/zip") => "application/zip",
    UniCase::ascii("image/gif") => "image/gif",
    UniCase::ascii("image/x-icon") => "image/x-icon",
    UniCase::ascii("image/jpeg") => "image/jpeg",
    UniCase::ascii("image/png") => "image/png",
    UniCase::ascii("image/svg+xml") => "image/svg+xml",
    UniCase::ascii("image/webp") => "image/webp",
    UniCase::ascii("audio/mpeg") => "audio/mpeg",
    UniCase::ascii("audio/ogg") => "audio/ogg",
    UniCase::ascii("video/mp4") => "video/mp4",
    UniCase::ascii("video/webm") => "video/webm",
    UniCase::ascii("multipart/form-data") => "multipart/form-data",
);

/// The top-level media type.
///
/// # References
/// * [IANA Media Types](https://www.iana.org/assignments/media-types/media-types.xhtml)
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaCategory {
    Application,
    Audio,
    Font,
    Image,
    Message,
    Model,
    Multipart,
    Text,
    Video,
    Unknown,
}

impl MediaCategory {
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "application" => Self::Application,
            "audio" => Self::Audio,
            "font" => Self::Font,
            "image" => Self::Image,
            "message" => Self::Message,
            "model" => Self::Model,
            "multipart" => Self::Multipart,
            "text" => Self::Text,
            "video" => Self::Video,
            _ => return None,
        })
    }
}

/// A `media-range` as offered in `Accept`, resolved against the dictionary.
///
/// ```text
/// media-range    = ( "*/*"
///                  / ( type "/" "*" )
///                  / ( type "/" subtype )
///                  ) parameters
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MediaRange {
    /// `*/*`
    Any,

    /// `type/*`
    Category(MediaCategory),

    /// A type present in the dictionary.
    Exact(MediaType),
}

impl MediaRange {
    /// Resolves a media range essence. Returns `None` for syntactically
    /// broken values and for types missing from the dictionary.
    #[must_use]
    pub fn identify(essence: &str) -> Option<Self> {
        if essence == "*/*" {
            return Some(Self::Any);
        }

        if let Some(category) = essence.strip_suffix("/*") {
            return MediaCategory::from_name(category).map(Self::Category);
        }

        MEDIA_TYPE_MAP.get(&UniCase::ascii(essence))
            .map(|common| Self::Exact(MediaType::Common(*common)))
    }

    #[must_use]
    pub fn matches(&self, media_type: &MediaType) -> bool {
        match self {
            Self::Any => true,
            Self::Category(category) => media_type.category() == *category,
            Self::Exact(exact) => unicase::eq_ascii(exact.as_str(), media_type.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("text/html", Some(MediaType::HTML))]
    #[case("TEXT/HTML", Some(MediaType::HTML))]
    #[case("application/vnd.example+json", Some(MediaType::Custom("application/vnd.example+json".into())))]
    #[case("text", None)]
    #[case("text/", None)]
    #[case("/html", None)]
    #[case("text/ht ml", None)]
    fn test_parse(#[case] input: &str, #[case] expected: Option<MediaType>) {
        assert_eq!(MediaType::parse(input), expected);
    }

    #[rstest]
    #[case("*/*", Some(MediaRange::Any))]
    #[case("image/*", Some(MediaRange::Category(MediaCategory::Image)))]
    #[case("text/plain", Some(MediaRange::Exact(MediaType::PLAIN_TEXT)))]
    #[case("bogus/*", None)]
    #[case("application/x-unknown", None)]
    fn test_identify(#[case] input: &str, #[case] expected: Option<MediaRange>) {
        assert_eq!(MediaRange::identify(input), expected);
    }

    #[test]
    fn test_matches() {
        assert!(MediaRange::Any.matches(&MediaType::PNG));
        assert!(MediaRange::Category(MediaCategory::Image).matches(&MediaType::PNG));
        assert!(!MediaRange::Category(MediaCategory::Text).matches(&MediaType::PNG));
        assert!(MediaRange::Exact(MediaType::JSON).matches(&MediaType::JSON));
    }

    #[test]
    fn test_category() {
        assert_eq!(MediaType::SVG.category(), MediaCategory::Image);
        assert_eq!(MediaType::Custom("x-foo/bar".into()).category(), MediaCategory::Unknown);
    }
}
