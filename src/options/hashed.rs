//! Options for hashed module IDs.
//!
//! ## Recognized Keys
//!
//! | Key | Type | Default |
//! |-----|------|---------|
//! | `context` | absolute path | the graph's global context |
//! | `hashFunction` | string | `xxhash64` |
//! | `hashDigest` | string | `base64` |
//! | `hashDigestLength` | integer >= 1 | `4` |
//! | `reserveExistingIds` | bool | `false` |
//!
//! Any other key is rejected.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use super::OptionsError;
use crate::canonical::canonical_hash_hex;
use crate::digest::{Digester, HashDigest, HashFunction};
use crate::ident::is_absolute_path;
use crate::{DEFAULT_HASH_DIGEST, DEFAULT_HASH_DIGEST_LENGTH, DEFAULT_HASH_FUNCTION};

/// User-facing options, as written in configuration.
///
/// Names are kept as strings here so that a bad value can be reported
/// verbatim by [`HashedModuleIdsOptions::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct HashedModuleIdsOptions {
    /// Directory identities are made relative to.
    pub context: Option<String>,
    /// Hash algorithm name.
    pub hash_function: String,
    /// Digest encoding name.
    pub hash_digest: String,
    /// Initial ID length in characters.
    pub hash_digest_length: i64,
    /// Seed the namespace with IDs already present on candidate modules.
    pub reserve_existing_ids: bool,
}

impl Default for HashedModuleIdsOptions {
    fn default() -> Self {
        Self {
            context: None,
            hash_function: DEFAULT_HASH_FUNCTION.to_string(),
            hash_digest: DEFAULT_HASH_DIGEST.to_string(),
            hash_digest_length: DEFAULT_HASH_DIGEST_LENGTH as i64,
            reserve_existing_ids: false,
        }
    }
}

impl HashedModuleIdsOptions {
    /// Parse options from a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the context directory.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the hash function name.
    pub fn with_hash_function(mut self, name: impl Into<String>) -> Self {
        self.hash_function = name.into();
        self
    }

    /// Set the digest encoding name.
    pub fn with_hash_digest(mut self, name: impl Into<String>) -> Self {
        self.hash_digest = name.into();
        self
    }

    /// Set the initial ID length.
    pub fn with_hash_digest_length(mut self, length: i64) -> Self {
        self.hash_digest_length = length;
        self
    }

    /// Reserve IDs already held by candidate modules.
    pub fn with_reserve_existing_ids(mut self, reserve: bool) -> Self {
        self.reserve_existing_ids = reserve;
        self
    }

    /// Validate against the built-in digest functions.
    pub fn validate(&self) -> Result<ValidatedOptions, OptionsError> {
        let hash_function = HashFunction::from_name(&self.hash_function)
            .ok_or_else(|| OptionsError::UnsupportedHashFunction(self.hash_function.clone()))?;
        let hash_digest = HashDigest::from_name(&self.hash_digest)
            .ok_or_else(|| OptionsError::UnsupportedHashDigest(self.hash_digest.clone()))?;

        let max = hash_digest.encoded_len(hash_function.output_len());
        let hash_digest_length = self.check_length_and_context(max)?;

        Ok(ValidatedOptions {
            context: self.context.clone(),
            hash_function,
            hash_digest,
            hash_digest_length,
            reserve_existing_ids: self.reserve_existing_ids,
        })
    }

    /// Validate the length and context against a digest of `max` characters.
    ///
    /// Used on its own when a custom digest replaces the named function.
    pub fn check_length_and_context(&self, max: usize) -> Result<NonZeroUsize, OptionsError> {
        if self.hash_digest_length < 1 {
            return Err(OptionsError::NonPositiveDigestLength(self.hash_digest_length));
        }
        let length = usize::try_from(self.hash_digest_length)
            .ok()
            .filter(|&len| len <= max)
            .and_then(NonZeroUsize::new)
            .ok_or(OptionsError::DigestLengthOutOfRange {
                length: self.hash_digest_length,
                max,
            })?;

        if let Some(context) = &self.context {
            if !is_absolute_path(context) {
                return Err(OptionsError::RelativeContext(context.clone()));
            }
        }

        Ok(length)
    }
}

/// Options that passed validation.
///
/// Only [`HashedModuleIdsOptions::validate`] builds one, so the digest length
/// always fits the selected digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedOptions {
    context: Option<String>,
    hash_function: HashFunction,
    hash_digest: HashDigest,
    hash_digest_length: NonZeroUsize,
    reserve_existing_ids: bool,
}

impl ValidatedOptions {
    /// Directory identities are made relative to.
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Hash algorithm.
    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    /// Digest encoding.
    pub fn hash_digest(&self) -> HashDigest {
        self.hash_digest
    }

    /// Initial ID length in characters.
    pub fn hash_digest_length(&self) -> NonZeroUsize {
        self.hash_digest_length
    }

    /// Seed the namespace with IDs already present on candidate modules.
    pub fn reserve_existing_ids(&self) -> bool {
        self.reserve_existing_ids
    }

    /// The digest these options select.
    pub fn digester(&self) -> Digester {
        Digester::new(self.hash_function, self.hash_digest)
    }

    /// Deterministic fingerprint of the configuration.
    ///
    /// Two builds with equal `params_hash` hash identities the same way.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}
