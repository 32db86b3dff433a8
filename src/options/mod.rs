//! Assigner configuration.

pub mod hashed;

pub use hashed::{HashedModuleIdsOptions, ValidatedOptions};

/// Error raised when options are rejected.
///
/// Options are validated when the assigner is constructed, so these errors
/// surface before any module is touched.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// Unknown key or wrongly typed value in the options document.
    #[error("Invalid options: {0}")]
    Schema(#[from] serde_json::Error),
    /// Hash function name not recognized.
    #[error("Unsupported hash function: {0:?} (expected xxhash64, xxh3, sha256 or sha512)")]
    UnsupportedHashFunction(String),
    /// Digest encoding name not recognized.
    #[error("Unsupported hash digest: {0:?} (expected hex, base64 or base64url)")]
    UnsupportedHashDigest(String),
    /// Initial digest length below one.
    #[error("hashDigestLength must be at least 1, got {0}")]
    NonPositiveDigestLength(i64),
    /// Initial digest length longer than the digest itself.
    #[error("hashDigestLength {length} exceeds the digest length {max}")]
    DigestLengthOutOfRange {
        /// Requested initial length.
        length: i64,
        /// Full digest length for the configured function and encoding.
        max: usize,
    },
    /// Context given as a relative path.
    #[error("context must be an absolute path, got {0:?}")]
    RelativeContext(String),
}
