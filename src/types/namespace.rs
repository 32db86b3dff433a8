//! Pass-scoped module ID namespace.
//!
//! A `UsedIds` value lives for exactly one assignment pass. It is owned by
//! the pass and never shared, so independent compilations can run the
//! assigner without seeing each other's IDs.

use std::collections::BTreeSet;

use super::module::ModuleId;

/// Every prefix of a digest, up to its full length, is already taken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Every prefix of digest {digest:?} from length {min_len} is already in use")]
pub struct NamespaceExhausted {
    /// The digest whose prefixes all collided.
    pub digest: String,
    /// Initial prefix length requested.
    pub min_len: usize,
}

/// Set of IDs claimed during one assignment pass.
#[derive(Debug, Clone, Default)]
pub struct UsedIds {
    ids: BTreeSet<ModuleId>,
}

impl UsedIds {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a namespace pre-seeded with IDs that must not be handed out.
    pub fn with_reserved(reserved: impl IntoIterator<Item = ModuleId>) -> Self {
        Self {
            ids: reserved.into_iter().collect(),
        }
    }

    /// Mark an ID as used. Returns `false` if it was already present.
    pub fn reserve(&mut self, id: ModuleId) -> bool {
        self.ids.insert(id)
    }

    /// Whether an ID string is already used.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of used IDs.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no ID has been used yet.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate used IDs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleId> {
        self.ids.iter()
    }

    /// Claim the shortest unused prefix of `digest` that is at least
    /// `min_len` characters long.
    ///
    /// The prefix grows one character at a time while it collides. When
    /// `min_len` exceeds the digest length the whole digest is tried once.
    /// The claimed ID is recorded before returning.
    pub fn claim(&mut self, digest: &str, min_len: usize) -> Result<ModuleId, NamespaceExhausted> {
        let boundaries: Vec<usize> = digest
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .chain(std::iter::once(digest.len()))
            .collect();
        let total = if digest.is_empty() { 0 } else { boundaries.len() };

        let start = min_len.max(1).min(total);
        if start == 0 {
            return Err(NamespaceExhausted {
                digest: digest.to_string(),
                min_len,
            });
        }

        for len in start..=total {
            let candidate = &digest[..boundaries[len - 1]];
            if !self.ids.contains(candidate) {
                let id = ModuleId::new(candidate);
                self.ids.insert(id.clone());
                return Ok(id);
            }
        }

        Err(NamespaceExhausted {
            digest: digest.to_string(),
            min_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_uses_min_len_when_free() {
        let mut used = UsedIds::new();
        let id = used.claim("abcdef", 4).unwrap();
        assert_eq!(id.as_str(), "abcd");
        assert!(used.contains("abcd"));
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn test_claim_extends_on_collision() {
        let mut used = UsedIds::new();
        assert_eq!(used.claim("abcdef", 4).unwrap().as_str(), "abcd");
        assert_eq!(used.claim("abcdxy", 4).unwrap().as_str(), "abcdx");
        assert_eq!(used.claim("abcdxz", 4).unwrap().as_str(), "abcdxz");
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn test_claim_exhausted() {
        let mut used = UsedIds::new();
        used.claim("abcd", 2).unwrap();
        used.claim("abcd", 2).unwrap();
        used.claim("abcd", 2).unwrap();

        let err = used.claim("abcd", 2).unwrap_err();
        assert_eq!(err.digest, "abcd");
        assert_eq!(err.min_len, 2);
        // Exhaustion must not record anything
        assert_eq!(used.len(), 3);
    }

    #[test]
    fn test_claim_min_len_beyond_digest_uses_full_digest() {
        let mut used = UsedIds::new();
        assert_eq!(used.claim("abc", 10).unwrap().as_str(), "abc");
        assert!(used.claim("abc", 10).is_err());
    }

    #[test]
    fn test_claim_empty_digest_fails() {
        let mut used = UsedIds::new();
        assert!(used.claim("", 4).is_err());
        assert!(used.is_empty());
    }

    #[test]
    fn test_reserved_ids_are_skipped() {
        let mut used = UsedIds::with_reserved([ModuleId::new("abcd")]);
        assert_eq!(used.claim("abcdef", 4).unwrap().as_str(), "abcde");
    }

    #[test]
    fn test_claim_counts_characters_not_bytes() {
        let mut used = UsedIds::new();
        assert_eq!(used.claim("äöüß", 2).unwrap().as_str(), "äö");
        assert_eq!(used.claim("äöüß", 2).unwrap().as_str(), "äöü");
    }
}
