//! In-memory module graph for tests, benchmarks and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ModuleGraph;
use crate::ident::contextify;
use crate::types::{ModuleId, ModuleKey, OrderKey};

/// Error type for the in-memory graph.
#[derive(Debug, thiserror::Error)]
pub enum InMemoryError {
    /// Module not found.
    #[error("Module not found: {0}")]
    ModuleNotFound(ModuleKey),
    /// Graph manifest could not be parsed.
    #[error("Invalid graph manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Where a module comes from. Decides its library identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ModuleSource {
    /// A file on disk, possibly behind a loader chain.
    Normal {
        /// Full request including loaders and query.
        request: String,
        /// Build layer the module belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// A directory context created by a dynamic require.
    Context {
        /// Directory the context scans.
        directory: String,
        /// Loading mode (e.g. `sync`, `lazy`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mode: Option<String>,
        /// Whether subdirectories are scanned.
        #[serde(default)]
        recursive: bool,
        /// File filter, printed as written.
        #[serde(default, rename = "regExp", skip_serializing_if = "Option::is_none")]
        reg_exp: Option<String>,
        /// Build layer the module belongs to.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer: Option<String>,
    },
    /// A module provided by the runtime environment.
    External {
        /// Request as written by the user.
        request: String,
    },
    /// A runtime or virtual module with no stable identity.
    Generated,
}

impl ModuleSource {
    /// Library identity relative to `context`.
    pub fn lib_ident(&self, context: &str) -> Option<String> {
        match self {
            Self::Normal { request, layer } => {
                let ident = contextify(context, request);
                Some(with_layer(layer.as_deref(), ident))
            }
            Self::Context {
                directory,
                mode,
                recursive,
                reg_exp,
                layer,
            } => {
                let mut ident = with_layer(layer.as_deref(), contextify(context, directory));
                if let Some(mode) = mode {
                    ident.push(' ');
                    ident.push_str(mode);
                }
                if *recursive {
                    ident.push_str(" recursive");
                }
                if let Some(reg_exp) = reg_exp {
                    ident.push(' ');
                    ident.push_str(reg_exp);
                }
                Some(ident)
            }
            Self::External { request } => Some(request.clone()),
            Self::Generated => None,
        }
    }
}

fn with_layer(layer: Option<&str>, ident: String) -> String {
    match layer {
        Some(layer) => format!("({layer})/{ident}"),
        None => ident,
    }
}

/// A module node as stored in the in-memory graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    /// Unique module identifier.
    pub identifier: String,
    /// Pre-order traversal index.
    #[serde(default)]
    pub pre_order_index: Option<u32>,
    /// Post-order traversal index.
    #[serde(default)]
    pub post_order_index: Option<u32>,
    /// Number of chunks containing the module.
    #[serde(default)]
    pub chunks: usize,
    /// Currently assigned ID.
    #[serde(default)]
    pub id: Option<ModuleId>,
    /// Module origin.
    pub source: ModuleSource,
}

impl ModuleRecord {
    /// A normal module at traversal position `index`, in one chunk.
    ///
    /// The request doubles as the module identifier.
    pub fn normal(request: impl Into<String>, index: u32) -> Self {
        let request = request.into();
        Self {
            identifier: request.clone(),
            pre_order_index: Some(index),
            post_order_index: Some(index),
            chunks: 1,
            id: None,
            source: ModuleSource::Normal { request, layer: None },
        }
    }

    /// A generated module with no identity, in one chunk.
    pub fn generated(identifier: impl Into<String>, index: u32) -> Self {
        Self {
            identifier: identifier.into(),
            pre_order_index: Some(index),
            post_order_index: Some(index),
            chunks: 1,
            id: None,
            source: ModuleSource::Generated,
        }
    }

    /// Set the number of containing chunks.
    pub fn in_chunks(mut self, chunks: usize) -> Self {
        self.chunks = chunks;
        self
    }

    /// Set an existing ID.
    pub fn with_id(mut self, id: impl Into<ModuleId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Drop both traversal indices.
    pub fn unindexed(mut self) -> Self {
        self.pre_order_index = None;
        self.post_order_index = None;
        self
    }

    /// Sort key for natural order.
    pub fn order_key(&self) -> OrderKey {
        OrderKey {
            pre_order_index: self.pre_order_index,
            post_order_index: self.post_order_index,
            identifier: self.identifier.clone(),
        }
    }
}

/// Serialized form of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphManifest {
    /// Global context directory.
    pub context: String,
    /// Modules in manifest order.
    pub modules: Vec<ModuleRecord>,
}

/// In-memory module graph.
///
/// Uses BTreeMap for deterministic iteration order. Keys are handed out in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModuleGraph {
    context: String,
    modules: BTreeMap<ModuleKey, ModuleRecord>,
    next_key: u32,
}

impl InMemoryModuleGraph {
    /// Create an empty graph with a global context.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            modules: BTreeMap::new(),
            next_key: 0,
        }
    }

    /// Build a graph from a manifest. Keys follow manifest order.
    pub fn from_manifest(manifest: GraphManifest) -> Self {
        let mut graph = Self::new(manifest.context);
        for record in manifest.modules {
            graph.add_module(record);
        }
        graph
    }

    /// Parse a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, InMemoryError> {
        let manifest: GraphManifest = serde_json::from_str(json)?;
        Ok(Self::from_manifest(manifest))
    }

    /// Snapshot the graph as a manifest, in key order.
    pub fn to_manifest(&self) -> GraphManifest {
        GraphManifest {
            context: self.context.clone(),
            modules: self.modules.values().cloned().collect(),
        }
    }

    /// Add a module and return its key.
    pub fn add_module(&mut self, record: ModuleRecord) -> ModuleKey {
        let key = ModuleKey::new(self.next_key);
        self.next_key += 1;
        self.modules.insert(key, record);
        key
    }

    /// Get a module record.
    pub fn get(&self, key: ModuleKey) -> Option<&ModuleRecord> {
        self.modules.get(&key)
    }

    /// All module keys in ascending order.
    pub fn keys(&self) -> Vec<ModuleKey> {
        self.modules.keys().copied().collect()
    }

    /// Find a module by its identifier.
    pub fn find(&self, identifier: &str) -> Option<ModuleKey> {
        self.modules
            .iter()
            .find(|(_, record)| record.identifier == identifier)
            .map(|(key, _)| *key)
    }

    /// Remove every stored ID.
    pub fn clear_ids(&mut self) {
        for record in self.modules.values_mut() {
            record.id = None;
        }
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the graph has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleGraph for InMemoryModuleGraph {
    type Error = InMemoryError;

    fn context(&self) -> &str {
        &self.context
    }

    fn chunk_count(&self, module: ModuleKey) -> usize {
        self.modules.get(&module).map_or(0, |r| r.chunks)
    }

    fn natural_order_key(&self, module: ModuleKey) -> OrderKey {
        self.modules
            .get(&module)
            .map(ModuleRecord::order_key)
            .unwrap_or_else(|| OrderKey::unindexed(String::new()))
    }

    fn module_id(&self, module: ModuleKey) -> Option<&ModuleId> {
        self.modules.get(&module).and_then(|r| r.id.as_ref())
    }

    fn lib_ident(&self, module: ModuleKey, context: &str) -> Result<Option<String>, Self::Error> {
        let record = self
            .modules
            .get(&module)
            .ok_or(InMemoryError::ModuleNotFound(module))?;
        Ok(record.source.lib_ident(context))
    }

    fn set_module_id(&mut self, module: ModuleKey, id: ModuleId) -> Result<(), Self::Error> {
        let record = self
            .modules
            .get_mut(&module)
            .ok_or(InMemoryError::ModuleNotFound(module))?;
        record.id = Some(id);
        Ok(())
    }
}
