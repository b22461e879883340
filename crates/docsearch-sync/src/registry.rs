//! Explicit index registry.
//!
//! Index definitions are registered on a plain value constructed at
//! startup and handed to the pipeline; nothing is registered through
//! global mutable state.

use serde_json::Value;
use tracing::debug;

use docsearch_index::IndexStore;

use crate::error::SyncError;

/// One index and the creation body that defines it.
#[derive(Debug, Clone)]
pub struct IndexDefinition {
    /// Index name
    pub name: String,

    /// Settings + mappings JSON consumed at index creation
    pub body: Value,
}

impl IndexDefinition {
    /// Create a definition.
    pub fn new(name: impl Into<String>, body: Value) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

/// Registry of index definitions.
#[derive(Debug, Clone, Default)]
pub struct IndexRegistry {
    definitions: Vec<IndexDefinition>,
}

impl IndexRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any existing one with the same
    /// name.
    pub fn register(&mut self, definition: IndexDefinition) {
        if let Some(existing) = self
            .definitions
            .iter_mut()
            .find(|d| d.name == definition.name)
        {
            debug!(index = %definition.name, "Replacing registered index definition");
            *existing = definition;
        } else {
            debug!(index = %definition.name, "Registered index definition");
            self.definitions.push(definition);
        }
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&IndexDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// All registered definitions, in registration order.
    pub fn definitions(&self) -> &[IndexDefinition] {
        &self.definitions
    }

    /// Create every registered index that does not exist yet.
    pub fn ensure_all(&self, store: &dyn IndexStore) -> Result<(), SyncError> {
        for definition in &self.definitions {
            store.ensure_index(&definition.name, &definition.body)?;
        }
        Ok(())
    }

    /// Number of registered definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
