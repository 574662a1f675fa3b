//! Schema modules: named groups of collections.

use serde::{Deserialize, Serialize};

use crate::schema::CollectionDefinition;

/// A logical storage module and the collections it declares.
///
/// `name` is the canonical identity the module declares about itself. It
/// keys the module in the storage handle and in the identity map built from
/// discovered module sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModule {
    name: String,

    #[serde(default)]
    collections: Vec<CollectionDefinition>,
}

impl SchemaModule {
    /// Create a module with no collections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Vec::new(),
        }
    }

    /// Add a collection.
    pub fn with_collection(mut self, collection: CollectionDefinition) -> Self {
        self.collections.push(collection);
        self
    }

    /// Canonical module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared collections, in declaration order.
    pub fn collections(&self) -> &[CollectionDefinition] {
        &self.collections
    }

    /// Names of the declared collections, in declaration order.
    pub fn collection_names(&self) -> impl Iterator<Item = &str> {
        self.collections.iter().map(|c| c.name.as_str())
    }

    /// Whether the module declares no collections.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
