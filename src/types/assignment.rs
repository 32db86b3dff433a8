//! Result of one assignment pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::module::{ModuleId, ModuleKey};
use crate::canonical::canonical_hash_hex;

/// A module that received an ID during the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedModule {
    /// Graph reference of the module.
    pub key: ModuleKey,
    /// Unique module identifier from its order key.
    pub identifier: String,
    /// Library identity that was hashed.
    pub identity: String,
    /// Assigned ID.
    pub id: ModuleId,
    /// Whether the ID had to grow past the configured length.
    pub extended: bool,
}

/// Counters describing what the pass did with each candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentStats {
    /// Distinct modules handed to the pass.
    pub candidates: usize,
    /// Modules not contained in any chunk.
    pub skipped_no_chunks: usize,
    /// Modules that already carried an ID.
    pub skipped_existing_id: usize,
    /// Modules without a library identity.
    pub skipped_no_identity: usize,
    /// Modules that received an ID.
    pub assigned: usize,
    /// Assigned modules whose ID is longer than the configured length.
    pub extended: usize,
}

/// Mapping produced by one assignment pass, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleIdAssignment {
    /// Assigned modules in the order they were processed.
    pub entries: Vec<AssignedModule>,
    /// Pass counters.
    pub stats: AssignmentStats,
}

impl ModuleIdAssignment {
    /// Look up the ID assigned to a module in this pass.
    pub fn get(&self, key: ModuleKey) -> Option<&ModuleId> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.id)
    }

    /// Iterate `(module, id)` pairs in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (ModuleKey, &ModuleId)> {
        self.entries.iter().map(|e| (e.key, &e.id))
    }

    /// Number of modules that received an ID.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pass assigned nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mapping keyed by module reference.
    pub fn to_map(&self) -> BTreeMap<ModuleKey, ModuleId> {
        self.iter().map(|(k, id)| (k, id.clone())).collect()
    }

    /// Deterministic fingerprint of the assignment.
    ///
    /// Computed over the ordered `(identifier, id)` pairs, so two runs over
    /// the same graph can be compared by a single string.
    pub fn fingerprint(&self) -> String {
        let pairs: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|e| (e.identifier.as_str(), e.id.as_str()))
            .collect();
        canonical_hash_hex(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: u32, id: &str) -> AssignedModule {
        AssignedModule {
            key: ModuleKey::new(key),
            identifier: format!("/project/m{key}.js"),
            identity: format!("./m{key}.js"),
            id: ModuleId::new(id),
            extended: false,
        }
    }

    #[test]
    fn test_lookup_and_map() {
        let assignment = ModuleIdAssignment {
            entries: vec![entry(2, "abcd"), entry(1, "wxyz")],
            stats: AssignmentStats::default(),
        };

        assert_eq!(assignment.get(ModuleKey::new(1)).unwrap().as_str(), "wxyz");
        assert!(assignment.get(ModuleKey::new(3)).is_none());

        let keys: Vec<_> = assignment.to_map().into_keys().collect();
        assert_eq!(keys, vec![ModuleKey::new(1), ModuleKey::new(2)]);
    }

    #[test]
    fn test_fingerprint_tracks_ids() {
        let a = ModuleIdAssignment {
            entries: vec![entry(1, "abcd")],
            stats: AssignmentStats::default(),
        };
        let mut b = a.clone();
        assert_eq!(a.fingerprint(), b.fingerprint());

        b.entries[0].id = ModuleId::new("abce");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
