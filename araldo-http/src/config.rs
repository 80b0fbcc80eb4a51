// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use araldo_resources::ChecksumAlgorithm;

/// Limits applied while decoding request headers. Values kept verbatim are
/// truncated to these lengths (in bytes) so a client can't make the server
/// retain unbounded data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeSettings {
    /// Headers that aren't in the registry.
    pub max_unknown_length: usize,

    /// `Authorization` and `Proxy-Authorization`.
    pub max_authorization_length: usize,

    /// `Access-Control-Request-Headers`.
    pub max_access_control_length: usize,

    pub max_x_requested_with_length: usize,
    pub max_x_forwarded_proto_length: usize,
    pub max_x_forwarded_for_length: usize,
    pub max_x_forwarded_host_length: usize,

    /// Known headers that are only kept as text, e.g. `Sec-Fetch-Mode`.
    pub max_rawish_length: usize,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            max_unknown_length: 256,
            max_authorization_length: 4096,
            max_access_control_length: 256,
            max_x_requested_with_length: 64,
            max_x_forwarded_proto_length: 64,
            max_x_forwarded_for_length: 512,
            max_x_forwarded_host_length: 512,
            max_rawish_length: 256,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseSettings {
    /// Emit the header fields in a random order, so the response doesn't
    /// reveal the server by the order of its fields. The status line always
    /// comes first.
    pub shuffle_headers: bool,

    /// Seeds the shuffle, making the order reproducible.
    pub shuffle_seed: Option<u64>,

    /// The size of the chunks file-backed bodies are read in.
    pub content_chunk_size: usize,

    /// Used by the automatic checksums when no algorithm is given.
    pub checksum_algorithm: ChecksumAlgorithm,
}

impl Default for ResponseSettings {
    fn default() -> Self {
        Self {
            shuffle_headers: true,
            shuffle_seed: None,
            content_chunk_size: 8192,
            checksum_algorithm: ChecksumAlgorithm::Sha256,
        }
    }
}
