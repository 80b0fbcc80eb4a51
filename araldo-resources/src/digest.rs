// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Digest algorithms used by the `Checksum-*` headers and the automatic
//! `ETag`.

use phf::phf_map;
use sha2::Digest;
use unicase::UniCase;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChecksumAlgorithm {
    Md2,
    Md4,
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,

    /// CRC-32 with the IEEE polynomial, as used by gzip and zip.
    Crc32,

    /// A PGP/GPG signature. Recognised, but never computed here: the signer
    /// lives outside this engine.
    Pg,
}

static ALGORITHM_MAP: phf::Map<UniCase<&'static str>, ChecksumAlgorithm> = phf_map!(
    UniCase::ascii("md2") => ChecksumAlgorithm::Md2,
    UniCase::ascii("md4") => ChecksumAlgorithm::Md4,
    UniCase::ascii("md5") => ChecksumAlgorithm::Md5,
    UniCase::ascii("sha1") => ChecksumAlgorithm::Sha1,
    UniCase::ascii("sha224") => ChecksumAlgorithm::Sha224,
    UniCase::ascii("sha256") => ChecksumAlgorithm::Sha256,
    UniCase::ascii("sha384") => ChecksumAlgorithm::Sha384,
    UniCase::ascii("sha512") => ChecksumAlgorithm::Sha512,
    UniCase::ascii("crc32") => ChecksumAlgorithm::Crc32,
    UniCase::ascii("pg") => ChecksumAlgorithm::Pg,
);

impl ChecksumAlgorithm {
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        ALGORITHM_MAP.get(&UniCase::ascii(token)).copied()
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md2 => "md2",
            Self::Md4 => "md4",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Crc32 => "crc32",
            Self::Pg => "pg",
        }
    }

    /// Whether [`Digester`] can compute this algorithm.
    #[must_use]
    pub fn is_computable(&self) -> bool {
        !matches!(self, Self::Pg)
    }
}

/// Incremental digest computation, fed in chunks so file-backed bodies never
/// need to be buffered whole.
pub enum Digester {
    Md2(md2::Md2),
    Md4(md4::Md4),
    Md5(md5::Md5),
    Sha1(sha1::Sha1),
    Sha224(sha2::Sha224),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
    Crc32(crc32fast::Hasher),
}

impl Digester {
    /// Returns `None` for algorithms that can't be computed locally.
    #[must_use]
    pub fn new(algorithm: ChecksumAlgorithm) -> Option<Self> {
        Some(match algorithm {
            ChecksumAlgorithm::Md2 => Self::Md2(md2::Md2::new()),
            ChecksumAlgorithm::Md4 => Self::Md4(md4::Md4::new()),
            ChecksumAlgorithm::Md5 => Self::Md5(md5::Md5::new()),
            ChecksumAlgorithm::Sha1 => Self::Sha1(sha1::Sha1::new()),
            ChecksumAlgorithm::Sha224 => Self::Sha224(sha2::Sha224::new()),
            ChecksumAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            ChecksumAlgorithm::Sha384 => Self::Sha384(sha2::Sha384::new()),
            ChecksumAlgorithm::Sha512 => Self::Sha512(sha2::Sha512::new()),
            ChecksumAlgorithm::Crc32 => Self::Crc32(crc32fast::Hasher::new()),
            ChecksumAlgorithm::Pg => return None,
        })
    }

    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md2(hasher) => hasher.update(data),
            Self::Md4(hasher) => hasher.update(data),
            Self::Md5(hasher) => hasher.update(data),
            Self::Sha1(hasher) => hasher.update(data),
            Self::Sha224(hasher) => hasher.update(data),
            Self::Sha256(hasher) => hasher.update(data),
            Self::Sha384(hasher) => hasher.update(data),
            Self::Sha512(hasher) => hasher.update(data),
            Self::Crc32(hasher) => hasher.update(data),
        }
    }

    /// Returns the raw digest bytes. CRC-32 is returned big-endian.
    #[must_use]
    pub fn finalize(self) -> Vec<u8> {
        match self {
            Self::Md2(hasher) => hasher.finalize().to_vec(),
            Self::Md4(hasher) => hasher.finalize().to_vec(),
            Self::Md5(hasher) => hasher.finalize().to_vec(),
            Self::Sha1(hasher) => hasher.finalize().to_vec(),
            Self::Sha224(hasher) => hasher.finalize().to_vec(),
            Self::Sha256(hasher) => hasher.finalize().to_vec(),
            Self::Sha384(hasher) => hasher.finalize().to_vec(),
            Self::Sha512(hasher) => hasher.finalize().to_vec(),
            Self::Crc32(hasher) => hasher.finalize().to_be_bytes().to_vec(),
        }
    }

    #[must_use]
    pub fn finalize_hex(self) -> String {
        hex::encode(self.finalize())
    }
}

/// Digests a single buffer, returning lowercase hex.
#[must_use]
pub fn digest_hex(algorithm: ChecksumAlgorithm, data: &[u8]) -> Option<String> {
    let mut digester = Digester::new(algorithm)?;
    digester.update(data);
    Some(digester.finalize_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ChecksumAlgorithm::Md5, "900150983cd24fb0d6963f7d28e17f72")]
    #[case(ChecksumAlgorithm::Sha1, "a9993e364706816aba3e25717850c26c9cd0d89d")]
    #[case(ChecksumAlgorithm::Sha256, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")]
    #[case(ChecksumAlgorithm::Crc32, "352441c2")]
    fn test_digest_hex_known_answers(#[case] algorithm: ChecksumAlgorithm, #[case] expected: &str) {
        assert_eq!(digest_hex(algorithm, b"abc").as_deref(), Some(expected));
    }

    #[test]
    fn test_chunked_updates_match_single_update() {
        let mut digester = Digester::new(ChecksumAlgorithm::Sha512).unwrap();
        digester.update(b"hello ");
        digester.update(b"world");
        assert_eq!(Some(digester.finalize_hex()), digest_hex(ChecksumAlgorithm::Sha512, b"hello world"));
    }

    #[test]
    fn test_pg_is_not_computable() {
        assert!(Digester::new(ChecksumAlgorithm::Pg).is_none());
        assert!(!ChecksumAlgorithm::Pg.is_computable());
    }

    #[rstest]
    #[case("SHA256", Some(ChecksumAlgorithm::Sha256))]
    #[case("crc32", Some(ChecksumAlgorithm::Crc32))]
    #[case("sha3", None)]
    fn test_from_token(#[case] input: &str, #[case] expected: Option<ChecksumAlgorithm>) {
        assert_eq!(ChecksumAlgorithm::from_token(input), expected);
    }
}
