//! Run-wide registry of every collection across all modules.
//!
//! Registration happens on a [`RegistryBuilder`], which is consumed by
//! [`RegistryBuilder::build`] to produce a read-only [`SchemaRegistry`].

use std::collections::{HashMap, HashSet};

use crate::error::{SchemaError, SchemaResult};
use crate::schema::CollectionDefinition;

/// A collection together with the module that declared it.
#[derive(Debug, Clone)]
struct RegisteredCollection {
    owner: String,
    definition: CollectionDefinition,
}

/// Mutable registry used while modules are being aggregated.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    collections: Vec<RegisteredCollection>,
    index: HashMap<String, usize>,
    type_names: HashMap<String, usize>,
}

impl RegistryBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection declared by `owner`.
    ///
    /// Collection names and their type names are unique across the whole
    /// registry. Within a collection, fields, relationship fields and the
    /// implicit primary key share one namespace.
    pub fn register_collection(
        &mut self,
        owner: &str,
        definition: CollectionDefinition,
    ) -> SchemaResult<()> {
        if let Some(&existing) = self.index.get(&definition.name) {
            return Err(SchemaError::duplicate_collection(
                definition.name,
                owner,
                self.collections[existing].owner.clone(),
            ));
        }

        let type_name = definition.type_name();
        if let Some(&existing) = self.type_names.get(&type_name) {
            return Err(SchemaError::DuplicateTypeName {
                type_name,
                collection: definition.name,
                existing_collection: self.collections[existing].definition.name.clone(),
            });
        }

        check_members(&definition)?;

        tracing::trace!(collection = %definition.name, owner, "registered collection");

        self.type_names.insert(type_name, self.collections.len());
        self.index
            .insert(definition.name.clone(), self.collections.len());
        self.collections.push(RegisteredCollection {
            owner: owner.to_string(),
            definition,
        });
        Ok(())
    }

    /// Number of collections registered so far.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Validate cross-collection references and freeze the registry.
    pub fn build(self) -> SchemaResult<SchemaRegistry> {
        for entry in &self.collections {
            let definition = &entry.definition;

            for target in definition.referenced_collections() {
                if !self.index.contains_key(target) {
                    return Err(SchemaError::unknown_collection(target, &definition.name));
                }
            }

            for indexed in &definition.indices {
                if !definition.has_member(indexed) {
                    return Err(SchemaError::UnknownIndexField {
                        collection: definition.name.clone(),
                        field: indexed.clone(),
                    });
                }
            }
        }

        Ok(SchemaRegistry {
            collections: self.collections,
            index: self.index,
        })
    }
}

/// Reject member names that would render twice in one declaration.
fn check_members(definition: &CollectionDefinition) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    if !definition.has_explicit_primary_key() {
        seen.insert(definition.primary_key());
    }

    let names = definition
        .fields
        .iter()
        .map(|f| f.name.as_str())
        .chain(definition.relationships.iter().map(|r| r.field_name()));

    for name in names {
        if !seen.insert(name) {
            return Err(SchemaError::DuplicateField {
                collection: definition.name.clone(),
                field: name.to_string(),
            });
        }
    }

    Ok(())
}

/// Frozen registry of all collections, read-only during generation.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    collections: Vec<RegisteredCollection>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Get a collection by name.
    pub fn get(&self, name: &str) -> Option<&CollectionDefinition> {
        self.index
            .get(name)
            .map(|&i| &self.collections[i].definition)
    }

    /// Whether a collection is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Name of the module that declared a collection.
    pub fn owner_of(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&i| self.collections[i].owner.as_str())
    }

    /// All collections, in registration order.
    pub fn collections(&self) -> impl Iterator<Item = &CollectionDefinition> {
        self.collections.iter().map(|c| &c.definition)
    }

    /// Number of registered collections.
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
