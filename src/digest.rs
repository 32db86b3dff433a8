//! Pluggable digest functions for module identities.
//!
//! A digest is a hash function paired with an output encoding. The pair is
//! chosen once, when the assigner is built, and every module identity in a
//! pass is hashed with the same instance.
//!
//! | Function | Output bytes | Crate |
//! |----------|--------------|-------|
//! | `xxhash64` (default) | 8 | `xxhash-rust` |
//! | `md4` | 16 | `md4` |
//! | `xxh3` | 16 | `xxhash-rust` (xxh3-128) |
//! | `sha256` | 32 | `sha2` |
//! | `sha512` | 64 | `sha2` |
//!
//! | Encoding | Alphabet |
//! |----------|----------|
//! | `hex` | `0-9a-f` |
//! | `base64` (default) | standard alphabet with `=` padding |
//! | `base64url` | URL-safe alphabet, no padding |

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use md4::Md4;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use xxhash_rust::xxh3::xxh3_128;
use xxhash_rust::xxh64::xxh64;

/// Hash algorithm applied to a module identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    /// xxHash 64-bit, seed 0. Fast, non-cryptographic.
    #[default]
    Xxhash64,
    /// MD4. Matches the identities webpack hashes by default.
    Md4,
    /// xxHash3 128-bit.
    Xxh3,
    /// SHA-256.
    Sha256,
    /// SHA-512.
    Sha512,
}

impl HashFunction {
    /// Parse an algorithm name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "xxhash64" | "xxh64" => Some(Self::Xxhash64),
            "md4" => Some(Self::Md4),
            "xxh3" | "xxh3-128" => Some(Self::Xxh3),
            "sha256" | "sha-256" => Some(Self::Sha256),
            "sha512" | "sha-512" => Some(Self::Sha512),
            _ => None,
        }
    }

    /// Number of raw bytes this function produces.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Xxhash64 => 8,
            Self::Md4 => 16,
            Self::Xxh3 => 16,
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Hash input bytes. Integer hashes are emitted big-endian.
    pub fn hash(&self, input: &[u8]) -> Vec<u8> {
        match self {
            Self::Xxhash64 => xxh64(input, 0).to_be_bytes().to_vec(),
            Self::Md4 => Md4::digest(input).to_vec(),
            Self::Xxh3 => xxh3_128(input).to_be_bytes().to_vec(),
            Self::Sha256 => Sha256::digest(input).to_vec(),
            Self::Sha512 => Sha512::digest(input).to_vec(),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xxhash64 => write!(f, "xxhash64"),
            Self::Md4 => write!(f, "md4"),
            Self::Xxh3 => write!(f, "xxh3"),
            Self::Sha256 => write!(f, "sha256"),
            Self::Sha512 => write!(f, "sha512"),
        }
    }
}

/// Text encoding of the raw hash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashDigest {
    /// Lowercase hexadecimal.
    Hex,
    /// Standard base64 with padding.
    #[default]
    Base64,
    /// URL-safe base64 without padding.
    Base64Url,
}

impl HashDigest {
    /// Parse an encoding name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hex" => Some(Self::Hex),
            "base64" => Some(Self::Base64),
            "base64url" => Some(Self::Base64Url),
            _ => None,
        }
    }

    /// Length in characters of `byte_len` raw bytes once encoded.
    pub fn encoded_len(&self, byte_len: usize) -> usize {
        match self {
            Self::Hex => byte_len * 2,
            Self::Base64 => byte_len.div_ceil(3) * 4,
            Self::Base64Url => (byte_len * 4).div_ceil(3),
        }
    }

    /// Encode raw bytes.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64 => STANDARD.encode(bytes),
            Self::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        }
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hex => write!(f, "hex"),
            Self::Base64 => write!(f, "base64"),
            Self::Base64Url => write!(f, "base64url"),
        }
    }
}

/// Digest strategy used by the assigner.
///
/// Implementations must be pure: the same input always yields the same
/// string, and every output has exactly `digest_len()` characters.
pub trait ModuleDigest: Send + Sync {
    /// Hash and encode an identity.
    fn digest(&self, input: &[u8]) -> String;

    /// Length in characters of every digest this strategy produces.
    fn digest_len(&self) -> usize;

    /// Human-readable name, used in logs.
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

/// Built-in digest: a [`HashFunction`] followed by a [`HashDigest`] encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Digester {
    function: HashFunction,
    encoding: HashDigest,
}

impl Digester {
    /// Create a digester.
    pub fn new(function: HashFunction, encoding: HashDigest) -> Self {
        Self { function, encoding }
    }

    /// The hash function.
    pub fn function(&self) -> HashFunction {
        self.function
    }

    /// The output encoding.
    pub fn encoding(&self) -> HashDigest {
        self.encoding
    }
}

impl ModuleDigest for Digester {
    fn digest(&self, input: &[u8]) -> String {
        self.encoding.encode(&self.function.hash(input))
    }

    fn digest_len(&self) -> usize {
        self.encoding.encoded_len(self.function.output_len())
    }

    fn describe(&self) -> String {
        format!("{}/{}", self.function, self.encoding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FUNCTIONS: [HashFunction; 5] = [
        HashFunction::Xxhash64,
        HashFunction::Md4,
        HashFunction::Xxh3,
        HashFunction::Sha256,
        HashFunction::Sha512,
    ];
    const ALL_ENCODINGS: [HashDigest; 3] = [HashDigest::Hex, HashDigest::Base64, HashDigest::Base64Url];

    #[test]
    fn test_sha256_hex_known_value() {
        let d = Digester::new(HashFunction::Sha256, HashDigest::Hex);
        assert!(d.digest(b"./a.js").starts_with("78189b4d10cc"));
    }

    #[test]
    fn test_sha256_base64_known_value() {
        let d = Digester::new(HashFunction::Sha256, HashDigest::Base64);
        assert_eq!(d.digest(b"./a.js"), "eBibTRDMc4CbAkrUbYI+d02RapvW7gltnM2IXA7KL1w=");
    }

    #[test]
    fn test_md4_known_values() {
        let hex = Digester::new(HashFunction::Md4, HashDigest::Hex);
        assert_eq!(hex.digest(b"abc"), "a448017aaf21d8525fc10ae87aa6729d");
        assert_eq!(hex.digest(b"./a.js"), "2a91f0ff0a367e934225d9983eab46ac");

        let b64 = Digester::new(HashFunction::Md4, HashDigest::Base64);
        assert_eq!(b64.digest(b"./a.js"), "KpHw/wo2fpNCJdmYPqtGrA==");
        assert_eq!(b64.digest_len(), 24);
    }

    #[test]
    fn test_base64url_uses_url_alphabet() {
        let d = Digester::new(HashFunction::Sha256, HashDigest::Base64Url);
        assert_eq!(d.digest(b"./a.js"), "eBibTRDMc4CbAkrUbYI-d02RapvW7gltnM2IXA7KL1w");
    }

    #[test]
    fn test_digest_len_matches_output() {
        for function in ALL_FUNCTIONS {
            for encoding in ALL_ENCODINGS {
                let d = Digester::new(function, encoding);
                assert_eq!(
                    d.digest(b"./src/index.js").chars().count(),
                    d.digest_len(),
                    "length mismatch for {}",
                    d.describe()
                );
            }
        }
    }

    #[test]
    fn test_defaults() {
        let d = Digester::default();
        assert_eq!(d.function(), HashFunction::Xxhash64);
        assert_eq!(d.encoding(), HashDigest::Base64);
        assert_eq!(d.digest_len(), 12);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(HashFunction::from_name("SHA-256"), Some(HashFunction::Sha256));
        assert_eq!(HashFunction::from_name("xxh64"), Some(HashFunction::Xxhash64));
        assert_eq!(HashFunction::from_name("MD4"), Some(HashFunction::Md4));
        assert_eq!(HashFunction::from_name("md5"), None);
        assert_eq!(HashDigest::from_name("Base64URL"), Some(HashDigest::Base64Url));
        assert_eq!(HashDigest::from_name("latin1"), None);
    }

    #[test]
    fn test_deterministic_and_input_sensitive() {
        let d = Digester::default();
        assert_eq!(d.digest(b"./a.js"), d.digest(b"./a.js"));
        assert_ne!(d.digest(b"./a.js"), d.digest(b"./b.js"));
    }
}
