// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This crate contains the HTTP message header engine: decoding of request
//! headers into typed values, content negotiation, conditional request
//! evaluation, and the response header builder with its content coding and
//! checksum pipeline. It is independent of the HTTP version and of the
//! transport.

pub mod abnf;
pub mod cache_control;
pub mod checksum;
pub mod conditional;
pub mod config;
pub mod date;
pub mod encoding;
pub mod error;
pub mod header_name;
pub mod lists;
pub mod method;
pub mod negotiation;
pub mod parsed;
pub mod range;
pub mod raw;
pub mod request;
pub mod response;
pub mod status;
pub mod syntax;
pub mod uri;
pub mod version;

pub use cache_control::{CacheControl, CacheDirective};
pub use checksum::{ChecksumAction, ChecksumRecord, ChecksumSpec, ChecksumWhat};
pub use conditional::{EntityTag, PreconditionOutcome, Preconditions};
pub use config::*;
pub use encoding::select_content_coding;
pub use error::*;
pub use header_name::*;
pub use method::*;
pub use negotiation::{NegotiationChoice, NegotiationTable};
pub use parsed::*;
pub use raw::*;
pub use request::RequestHeaders;
pub use response::{BufferedSink, HeaderSink, HeaderValue, Response, WriteSink};
pub use status::*;
pub use version::*;
