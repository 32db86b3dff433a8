//! Module references and assigned module identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Opaque reference to a module node in the build graph.
///
/// Keys are handed out by the graph and carry no meaning of their own;
/// they only implement `Ord` so collections keyed by them iterate
/// deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(u32);

impl ModuleKey {
    /// Create a new key from a raw index.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ModuleKey {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identifier assigned to a module and written into build output.
///
/// Hashed IDs are prefixes of an encoded digest, but the graph may also
/// hold IDs produced by other strategies (e.g. sequential numbering),
/// so this is a plain string wrapper.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Create a module ID from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the ID in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    /// Whether the ID is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_key_ordering() {
        let mut keys = vec![ModuleKey::new(3), ModuleKey::new(1), ModuleKey::new(2)];
        keys.sort();
        assert_eq!(keys, vec![ModuleKey::new(1), ModuleKey::new(2), ModuleKey::new(3)]);
    }

    #[test]
    fn test_module_id_serializes_as_plain_string() {
        let id = ModuleId::new("eBib");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"eBib\"");
        assert_eq!(id.len(), 4);
        assert_eq!(id.to_string(), "eBib");
    }
}
