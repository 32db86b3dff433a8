//! Natural ordering of modules.
//!
//! Collision resolution hands the shorter prefix to whichever module claims
//! it first, so the processing order decides the final IDs. The order must
//! therefore be total and derived only from graph state:
//!
//! 1. Pre-order index of the module in the graph traversal
//! 2. Post-order index
//! 3. The module's unique identifier string
//!
//! A present index sorts before an absent one, so modules the traversal
//! never reached (no index) are processed last.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key for processing modules in natural order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderKey {
    /// Position in the graph's pre-order traversal.
    pub pre_order_index: Option<u32>,
    /// Position in the graph's post-order traversal.
    pub post_order_index: Option<u32>,
    /// Unique module identifier (e.g. the full request string).
    pub identifier: String,
}

impl OrderKey {
    /// Create a key with both traversal indices.
    pub fn new(pre_order_index: u32, post_order_index: u32, identifier: impl Into<String>) -> Self {
        Self {
            pre_order_index: Some(pre_order_index),
            post_order_index: Some(post_order_index),
            identifier: identifier.into(),
        }
    }

    /// Create a key for a module the traversal did not index.
    pub fn unindexed(identifier: impl Into<String>) -> Self {
        Self {
            pre_order_index: None,
            post_order_index: None,
            identifier: identifier.into(),
        }
    }
}

/// Compare optional indices; `Some` sorts before `None`.
fn compare_index(a: Option<u32>, b: Option<u32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_index(self.pre_order_index, other.pre_order_index)
            .then_with(|| compare_index(self.post_order_index, other.post_order_index))
            .then_with(|| compare_identifier(&self.identifier, &other.identifier))
    }
}

/// Identifiers compare by UTF-16 code unit, the order JavaScript strings sort in.
fn compare_identifier(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pre_order_index_wins() {
        let a = OrderKey::new(0, 9, "z");
        let b = OrderKey::new(1, 0, "a");
        assert!(a < b);
    }

    #[test]
    fn test_post_order_breaks_pre_order_tie() {
        let a = OrderKey::new(2, 1, "z");
        let b = OrderKey::new(2, 5, "a");
        assert!(a < b);
    }

    #[test]
    fn test_identifier_breaks_index_tie() {
        let a = OrderKey::new(2, 2, "/project/a.js");
        let b = OrderKey::new(2, 2, "/project/b.js");
        assert!(a < b);
    }

    #[test]
    fn test_identifier_compares_utf16_code_units() {
        // U+1F600 is a surrogate pair (0xD83D..) and sorts before U+FF61,
        // although its UTF-8 bytes sort after.
        let astral = OrderKey::new(0, 0, "/project/\u{1F600}.js");
        let halfwidth = OrderKey::new(0, 0, "/project/\u{FF61}.js");
        assert!(astral < halfwidth);
        assert!(OrderKey::new(0, 0, "/project/a.js") < astral);
    }

    #[test]
    fn test_indexed_before_unindexed() {
        let indexed = OrderKey::new(100, 100, "z");
        let unindexed = OrderKey::unindexed("a");
        assert!(indexed < unindexed);

        let mut keys = vec![unindexed.clone(), indexed.clone()];
        keys.sort();
        assert_eq!(keys, vec![indexed, unindexed]);
    }

    #[test]
    fn test_unindexed_fall_back_to_identifier() {
        let a = OrderKey::unindexed("./a.js");
        let b = OrderKey::unindexed("./b.js");
        assert_eq!(a.cmp(&b), Ordering::Less);
        assert_eq!(a.cmp(&a.clone()), Ordering::Equal);
    }
}
