//! Build graph access.

pub mod memory;

use crate::types::{ModuleId, ModuleKey, OrderKey};

/// Read/write capability the assigner needs from a build graph.
///
/// The graph owns module state; the assigner only reads chunk membership,
/// order keys, current IDs and identities, and writes IDs back through
/// [`ModuleGraph::set_module_id`]. Implementations must return the same
/// answers for the same graph state so that assignment stays deterministic.
pub trait ModuleGraph {
    /// Error type for graph operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The build's global context directory.
    fn context(&self) -> &str;

    /// Number of output chunks that contain the module.
    fn chunk_count(&self, module: ModuleKey) -> usize;

    /// Sort key of the module in the graph's natural order.
    fn natural_order_key(&self, module: ModuleKey) -> OrderKey;

    /// ID currently held by the module, if any.
    fn module_id(&self, module: ModuleKey) -> Option<&ModuleId>;

    /// Library identity of the module relative to `context`.
    ///
    /// `Ok(None)` means the module has no stable external identity
    /// (generated or virtual modules).
    fn lib_ident(&self, module: ModuleKey, context: &str) -> Result<Option<String>, Self::Error>;

    /// Store an ID for the module.
    fn set_module_id(&mut self, module: ModuleKey, id: ModuleId) -> Result<(), Self::Error>;
}

pub use memory::InMemoryModuleGraph;
