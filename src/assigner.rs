//! Hashed module ID assignment.
//!
//! The assigner hashes each module's library identity and uses the shortest
//! unused prefix of the digest as the module ID.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info, warn};

use crate::canonical::canonical_hash_hex;
use crate::digest::ModuleDigest;
use crate::graph::ModuleGraph;
use crate::options::{HashedModuleIdsOptions, OptionsError, ValidatedOptions};
use crate::types::{
    AssignedModule, AssignmentStats, ModuleIdAssignment, ModuleKey, NamespaceExhausted, OrderKey,
    UsedIds,
};

/// Error type for assignment passes.
#[derive(Debug, thiserror::Error)]
pub enum AssignError {
    /// The graph failed to derive a module's identity.
    #[error("Identity derivation failed for module {module}: {message}")]
    IdentityDerivation {
        /// Module whose identity could not be derived.
        module: ModuleKey,
        /// Error reported by the graph.
        message: String,
    },
    /// The graph rejected an ID write.
    #[error("Graph error: {0}")]
    Graph(String),
    /// Every prefix of the module's digest is taken.
    #[error("ID space exhausted for module {module} (identity {identity:?})")]
    IdSpaceExhausted {
        /// Module that could not be given an ID.
        module: ModuleKey,
        /// Identity that was hashed.
        identity: String,
        /// Namespace failure.
        #[source]
        source: NamespaceExhausted,
    },
}

impl AssignError {
    /// Create a graph error from any error type.
    pub fn from_graph<E: std::error::Error>(e: E) -> Self {
        Self::Graph(e.to_string())
    }
}

/// Assigns content-hashed IDs to modules.
///
/// ## Algorithm
///
/// 1. Drop modules that are in no chunk
/// 2. Sort the rest by natural order ([`OrderKey`], then [`ModuleKey`])
/// 3. For each module without an ID:
///    - Derive its library identity relative to the context; skip if absent
///    - Digest the identity and take the first `hashDigestLength` characters
///    - While that prefix is used, take one more character
///    - Record the ID and mark it used
/// 4. Write every ID to the graph
///
/// The whole pass is planned before anything is written, so an identity or
/// namespace failure leaves the graph unchanged. A write rejected by the
/// graph in step 4 stops the pass with [`AssignError::Graph`]; IDs written
/// before it stay in place.
///
/// The assigner holds no per-pass state and can be reused across
/// compilations.
pub struct HashedModuleIdAssigner {
    context: Option<String>,
    hash_digest_length: usize,
    reserve_existing_ids: bool,
    digest: Box<dyn ModuleDigest>,
    params_hash: String,
}

impl HashedModuleIdAssigner {
    /// Validate options and create an assigner.
    pub fn new(options: &HashedModuleIdsOptions) -> Result<Self, OptionsError> {
        Ok(Self::from_validated(options.validate()?))
    }

    /// Create an assigner from already validated options.
    pub fn from_validated(options: ValidatedOptions) -> Self {
        Self {
            params_hash: options.params_hash(),
            context: options.context().map(str::to_string),
            hash_digest_length: options.hash_digest_length().get(),
            reserve_existing_ids: options.reserve_existing_ids(),
            digest: Box::new(options.digester()),
        }
    }

    /// Create an assigner with a custom digest.
    ///
    /// `hashFunction` and `hashDigest` are ignored; the length is checked
    /// against the custom digest's length.
    pub fn with_digest(
        options: &HashedModuleIdsOptions,
        digest: Box<dyn ModuleDigest>,
    ) -> Result<Self, OptionsError> {
        let hash_digest_length = options.check_length_and_context(digest.digest_len())?;
        let params_hash = canonical_hash_hex(&(
            &options.context,
            digest.describe(),
            hash_digest_length,
            options.reserve_existing_ids,
        ));

        Ok(Self {
            context: options.context.clone(),
            hash_digest_length: hash_digest_length.get(),
            reserve_existing_ids: options.reserve_existing_ids,
            digest,
            params_hash,
        })
    }

    /// Assign IDs to `modules` and write them into the graph.
    ///
    /// Modules already holding an ID, modules in no chunk, and modules
    /// without an identity are left untouched. Duplicate keys count once.
    pub fn assign<G: ModuleGraph>(
        &self,
        graph: &mut G,
        modules: &[ModuleKey],
    ) -> Result<ModuleIdAssignment, AssignError> {
        let assignment = self.plan(graph, modules)?;

        for entry in &assignment.entries {
            graph
                .set_module_id(entry.key, entry.id.clone())
                .map_err(AssignError::from_graph)?;
        }

        info!(
            candidates = assignment.stats.candidates,
            assigned = assignment.stats.assigned,
            extended = assignment.stats.extended,
            skipped_no_chunks = assignment.stats.skipped_no_chunks,
            skipped_existing_id = assignment.stats.skipped_existing_id,
            skipped_no_identity = assignment.stats.skipped_no_identity,
            "hashed module ids assigned"
        );

        Ok(assignment)
    }

    /// Compute the assignment without writing to the graph.
    pub fn plan<G: ModuleGraph>(
        &self,
        graph: &G,
        modules: &[ModuleKey],
    ) -> Result<ModuleIdAssignment, AssignError> {
        let unique: BTreeSet<ModuleKey> = modules.iter().copied().collect();
        let mut stats = AssignmentStats {
            candidates: unique.len(),
            ..AssignmentStats::default()
        };

        let mut used = if self.reserve_existing_ids {
            UsedIds::with_reserved(unique.iter().filter_map(|&key| graph.module_id(key).cloned()))
        } else {
            UsedIds::new()
        };

        let mut ordered: Vec<(OrderKey, ModuleKey)> = Vec::with_capacity(unique.len());
        for key in unique {
            if graph.chunk_count(key) == 0 {
                stats.skipped_no_chunks += 1;
                continue;
            }
            ordered.push((graph.natural_order_key(key), key));
        }
        ordered.sort();

        let context = self.context.as_deref().unwrap_or_else(|| graph.context());
        let mut entries = Vec::with_capacity(ordered.len());

        for (order_key, key) in ordered {
            if graph.module_id(key).is_some() {
                stats.skipped_existing_id += 1;
                continue;
            }

            let identity = graph
                .lib_ident(key, context)
                .map_err(|e| AssignError::IdentityDerivation {
                    module: key,
                    message: e.to_string(),
                })?;
            let identity = match identity {
                Some(identity) if !identity.is_empty() => identity,
                _ => {
                    debug!(module = %order_key.identifier, "no library identity, left for fallback ids");
                    stats.skipped_no_identity += 1;
                    continue;
                }
            };

            let digest = self.digest.digest(identity.as_bytes());
            let id = used
                .claim(&digest, self.hash_digest_length)
                .map_err(|source| AssignError::IdSpaceExhausted {
                    module: key,
                    identity: identity.clone(),
                    source,
                })?;

            let extended = id.len() > self.hash_digest_length;
            if extended {
                stats.extended += 1;
                warn!(
                    module = %order_key.identifier,
                    id = %id,
                    length = id.len(),
                    "hash prefix collision, module id extended"
                );
            } else {
                debug!(module = %order_key.identifier, id = %id, "module id assigned");
            }

            entries.push(AssignedModule {
                key,
                identifier: order_key.identifier,
                identity,
                id,
                extended,
            });
        }

        stats.assigned = entries.len();
        Ok(ModuleIdAssignment { entries, stats })
    }

    /// Fingerprint of the configuration this assigner was built from.
    pub fn params_hash(&self) -> &str {
        &self.params_hash
    }

    /// Initial ID length.
    pub fn hash_digest_length(&self) -> usize {
        self.hash_digest_length
    }

    /// The digest in use.
    pub fn digest(&self) -> &dyn ModuleDigest {
        self.digest.as_ref()
    }
}

impl fmt::Debug for HashedModuleIdAssigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedModuleIdAssigner")
            .field("context", &self.context)
            .field("hash_digest_length", &self.hash_digest_length)
            .field("reserve_existing_ids", &self.reserve_existing_ids)
            .field("digest", &self.digest.describe())
            .field("params_hash", &self.params_hash)
            .finish()
    }
}
