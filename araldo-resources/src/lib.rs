// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This crate contains the static dictionaries and codecs the header engine
//! resolves against: charsets, languages, media types, coding tokens, the
//! compression codecs, the digest algorithms and the body container.

pub mod charset;
pub mod content;
pub mod content_coding;
pub mod digest;
pub mod encoding;
pub mod language;
pub mod media_type;

pub use charset::*;
pub use content::*;
pub use content_coding::*;
pub use digest::*;
pub use encoding::*;
pub use language::*;
pub use media_type::*;
