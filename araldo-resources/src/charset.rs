// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The character encodings that can be negotiated with `Accept-Charset` and
//! announced with the `charset` parameter of `Content-Type`.
//!
//! # References
//! * [IANA Character Sets](https://www.iana.org/assignments/character-sets/character-sets.xhtml)

use phf::phf_map;
use unicase::UniCase;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Charset {
    Ascii,
    Utf8,
    Utf16,
    Utf32,
    Iso8859_1,
    Iso8859_2,
    Iso8859_3,
    Iso8859_4,
    Iso8859_5,
    Iso8859_6,
    Iso8859_7,
    Iso8859_8,
    Iso8859_9,
    Iso8859_10,
    Iso8859_11,
    Iso8859_12,
    Iso8859_13,
    Iso8859_14,
    Iso8859_15,
    Iso8859_16,
}

static CHARSET_MAP: phf::Map<UniCase<&'static str>, Charset> = phf_map!(
    UniCase::ascii("ascii") => Charset::Ascii,
    UniCase::ascii("us-ascii") => Charset::Ascii,
    UniCase::ascii("utf-8") => Charset::Utf8,
    UniCase::ascii("utf8") => Charset::Utf8,
    UniCase::ascii("utf-16") => Charset::Utf16,
    UniCase::ascii("utf-32") => Charset::Utf32,
    UniCase::ascii("iso-8859-1") => Charset::Iso8859_1,
    UniCase::ascii("iso-8859-2") => Charset::Iso8859_2,
    UniCase::ascii("iso-8859-3") => Charset::Iso8859_3,
    UniCase::ascii("iso-8859-4") => Charset::Iso8859_4,
    UniCase::ascii("iso-8859-5") => Charset::Iso8859_5,
    UniCase::ascii("iso-8859-6") => Charset::Iso8859_6,
    UniCase::ascii("iso-8859-7") => Charset::Iso8859_7,
    UniCase::ascii("iso-8859-8") => Charset::Iso8859_8,
    UniCase::ascii("iso-8859-9") => Charset::Iso8859_9,
    UniCase::ascii("iso-8859-10") => Charset::Iso8859_10,
    UniCase::ascii("iso-8859-11") => Charset::Iso8859_11,
    UniCase::ascii("iso-8859-12") => Charset::Iso8859_12,
    UniCase::ascii("iso-8859-13") => Charset::Iso8859_13,
    UniCase::ascii("iso-8859-14") => Charset::Iso8859_14,
    UniCase::ascii("iso-8859-15") => Charset::Iso8859_15,
    UniCase::ascii("iso-8859-16") => Charset::Iso8859_16,
);

impl Charset {
    /// Looks up a charset token, ignoring ASCII case.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        CHARSET_MAP.get(&UniCase::ascii(token)).copied()
    }

    /// The preferred MIME name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascii => "us-ascii",
            Self::Utf8 => "utf-8",
            Self::Utf16 => "utf-16",
            Self::Utf32 => "utf-32",
            Self::Iso8859_1 => "iso-8859-1",
            Self::Iso8859_2 => "iso-8859-2",
            Self::Iso8859_3 => "iso-8859-3",
            Self::Iso8859_4 => "iso-8859-4",
            Self::Iso8859_5 => "iso-8859-5",
            Self::Iso8859_6 => "iso-8859-6",
            Self::Iso8859_7 => "iso-8859-7",
            Self::Iso8859_8 => "iso-8859-8",
            Self::Iso8859_9 => "iso-8859-9",
            Self::Iso8859_10 => "iso-8859-10",
            Self::Iso8859_11 => "iso-8859-11",
            Self::Iso8859_12 => "iso-8859-12",
            Self::Iso8859_13 => "iso-8859-13",
            Self::Iso8859_14 => "iso-8859-14",
            Self::Iso8859_15 => "iso-8859-15",
            Self::Iso8859_16 => "iso-8859-16",
        }
    }
}
