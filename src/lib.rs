//! # hashed-module-ids
//!
//! Deterministic, content-hashed module IDs for bundler dependency graphs.
//!
//! Sequential module IDs shift whenever a module is added or removed, which
//! invalidates every cached bundle that mentions them. This crate replaces
//! them with short prefixes of a hash of each module's library identity, so
//! an ID only changes when the module itself does.
//!
//! ## Core Contract
//!
//! 1. Take the modules of a build graph that are emitted in some chunk
//! 2. Process them in the graph's natural order
//! 3. Give each module without an ID the shortest unused prefix (at least
//!    `hashDigestLength` characters) of the digest of its identity
//!
//! ## Architecture
//!
//! ```text
//! ModuleGraph → filter → natural order → lib_ident → ModuleDigest → UsedIds → set_module_id
//!                                                        ↑
//!                                            HashedModuleIdsOptions
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same graph + same options → identical assignment
//! - Processing order is total: pre-order index, post-order index, identifier
//! - IDs are unique within one pass; a longer prefix is taken on collision

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod options;
pub mod digest;
pub mod ident;
pub mod graph;
pub mod assigner;
pub mod canonical;

// Re-exports
pub use types::{
    ModuleKey, ModuleId, OrderKey, UsedIds, NamespaceExhausted,
    ModuleIdAssignment, AssignedModule, AssignmentStats,
};
pub use options::{HashedModuleIdsOptions, ValidatedOptions, OptionsError};
pub use digest::{HashFunction, HashDigest, ModuleDigest, Digester};
pub use ident::{contextify, is_absolute_path};
pub use graph::ModuleGraph;
pub use graph::memory::{InMemoryModuleGraph, InMemoryError, ModuleRecord, ModuleSource, GraphManifest};
pub use assigner::{HashedModuleIdAssigner, AssignError};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Default hash function name.
pub const DEFAULT_HASH_FUNCTION: &str = "xxhash64";

/// Default digest encoding name.
pub const DEFAULT_HASH_DIGEST: &str = "base64";

/// Default initial ID length in characters.
pub const DEFAULT_HASH_DIGEST_LENGTH: usize = 4;
