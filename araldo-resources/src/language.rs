// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! A static dictionary of language tags recognised in `Accept-Language` and
//! emitted in `Content-Language`.
//!
//! # References
//! * [RFC 5646: Tags for Identifying Languages](https://www.rfc-editor.org/rfc/rfc5646.html)
//! * [ISO 639-1](https://www.loc.gov/standards/iso639-2/php/code_list.php)

use phf::phf_map;
use unicase::UniCase;

/// A known language tag. Only tags present in the dictionary can be
/// constructed, so holding a `Language` means the tag was recognised.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Language(&'static str);

static LANGUAGE_MAP: phf::Map<UniCase<&'static str>, &'static str> = phf_map!(
    UniCase::ascii("ar") => "ar",
    UniCase::ascii("bg") => "bg",
    UniCase::ascii("ca") => "ca",
    UniCase::ascii("cs") => "cs",
    UniCase::ascii("da") => "da",
    UniCase::ascii("de") => "de",
    UniCase::ascii("de-at") => "de-AT",
    UniCase::ascii("de-ch") => "de-CH",
    UniCase::ascii("de-de") => "de-DE",
    UniCase::ascii("el") => "el",
    UniCase::ascii("en") => "en",
    UniCase::ascii("en-au") => "en-AU",
    UniCase::ascii("en-ca") => "en-CA",
    UniCase::ascii("en-gb") => "en-GB",
    UniCase::ascii("en-us") => "en-US",
    UniCase::ascii("eo") => "eo",
    UniCase::ascii("es") => "es",
    UniCase::ascii("es-es") => "es-ES",
    UniCase::ascii("es-mx") => "es-MX",
    UniCase::ascii("et") => "et",
    UniCase::ascii("fa") => "fa",
    UniCase::ascii("fi") => "fi",
    UniCase::ascii("fr") => "fr",
    UniCase::ascii("fr-be") => "fr-BE",
    UniCase::ascii("fr-ca") => "fr-CA",
    UniCase::ascii("fr-fr") => "fr-FR",
    UniCase::ascii("fy") => "fy",
    UniCase::ascii("ga") => "ga",
    UniCase::ascii("he") => "he",
    UniCase::ascii("hi") => "hi",
    UniCase::ascii("hr") => "hr",
    UniCase::ascii("hu") => "hu",
    UniCase::ascii("id") => "id",
    UniCase::ascii("is") => "is",
    UniCase::ascii("it") => "it",
    UniCase::ascii("ja") => "ja",
    UniCase::ascii("ko") => "ko",
    UniCase::ascii("lt") => "lt",
    UniCase::ascii("lv") => "lv",
    UniCase::ascii("nb") => "nb",
    UniCase::ascii("nl") => "nl",
    UniCase::ascii("nl-be") => "nl-BE",
    UniCase::ascii("nl-nl") => "nl-NL",
    UniCase::ascii("no") => "no",
    UniCase::ascii("pl") => "pl",
    UniCase::ascii("pt") => "pt",
    UniCase::ascii("pt-br") => "pt-BR",
    UniCase::ascii("pt-pt") => "pt-PT",
    UniCase::ascii("ro") => "ro",
    UniCase::ascii("ru") => "ru",
    UniCase::ascii("sk") => "sk",
    UniCase::ascii("sl") => "sl",
    UniCase::ascii("sr") => "sr",
    UniCase::ascii("sv") => "sv",
    UniCase::ascii("th") => "th",
    UniCase::ascii("tr") => "tr",
    UniCase::ascii("uk") => "uk",
    UniCase::ascii("vi") => "vi",
    UniCase::ascii("zh") => "zh",
    UniCase::ascii("zh-cn") => "zh-CN",
    UniCase::ascii("zh-tw") => "zh-TW",
);

impl Language {
    /// Looks up a language tag, ignoring ASCII case.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        LANGUAGE_MAP.get(&UniCase::ascii(tag)).map(|canonical| Self(*canonical))
    }

    /// The tag in its canonical casing, e.g. `en-US`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// The primary language subtag, e.g. `en` for `en-US`.
    #[must_use]
    pub fn primary(&self) -> &'static str {
        self.0.split('-').next().unwrap_or(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", Some("en"))]
    #[case("EN-us", Some("en-US"))]
    #[case("zh-TW", Some("zh-TW"))]
    #[case("tlh", None)]
    #[case("*", None)]
    fn test_from_tag(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(Language::from_tag(input).map(|language| language.as_str()), expected);
    }

    #[test]
    fn test_primary() {
        assert_eq!(Language::from_tag("pt-br").map(|language| language.primary()), Some("pt"));
        assert_eq!(Language::from_tag("de").map(|language| language.primary()), Some("de"));
    }
}
