//! Storage handle construction.
//!
//! A [`Storage`] aggregates every registered [`SchemaModule`] into one frozen
//! [`SchemaRegistry`]. Only an in-memory backend exists; it is meant for
//! introspecting schemas, not for persisting records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::module::SchemaModule;
use crate::registry::{RegistryBuilder, SchemaRegistry};

/// Storage backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Schema-only backend without persistence.
    #[default]
    Memory,
}

/// Options accepted by [`create_storage`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: Backend,
}

impl StorageConfig {
    /// Configuration for the in-memory backend.
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory,
        }
    }
}

/// Owns the registry while modules are being registered.
#[derive(Debug)]
pub struct StorageBuilder {
    config: StorageConfig,
    registry: RegistryBuilder,
    modules: Vec<SchemaModule>,
    names: HashSet<String>,
}

impl StorageBuilder {
    /// Start building a storage handle.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            registry: RegistryBuilder::new(),
            modules: Vec::new(),
            names: HashSet::new(),
        }
    }

    /// Register a module and all of its collections.
    pub fn register_module(&mut self, module: SchemaModule) -> SchemaResult<()> {
        if !self.names.insert(module.name().to_string()) {
            return Err(SchemaError::DuplicateModuleName {
                name: module.name().to_string(),
            });
        }

        for collection in module.collections() {
            self.registry
                .register_collection(module.name(), collection.clone())?;
        }

        tracing::debug!(
            module = module.name(),
            collections = module.collections().len(),
            "registered module"
        );

        self.modules.push(module);
        Ok(())
    }

    /// Freeze the registry and produce the storage handle.
    pub fn finish(self) -> SchemaResult<Storage> {
        let registry = self.registry.build()?;

        Ok(Storage {
            backend: self.config.backend,
            modules: self.modules,
            registry,
        })
    }
}

/// Storage handle exposing modules and the shared registry.
#[derive(Debug, Clone)]
pub struct Storage {
    backend: Backend,
    modules: Vec<SchemaModule>,
    registry: SchemaRegistry,
}

impl Storage {
    /// Backend this handle was created with.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Modules keyed by canonical name, in registration order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &SchemaModule)> {
        self.modules.iter().map(|m| (m.name(), m))
    }

    /// Look up a module by canonical name.
    pub fn module(&self, name: &str) -> Option<&SchemaModule> {
        self.modules.iter().find(|m| m.name() == name)
    }

    /// Registry of every collection across all modules.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }
}

/// Create a storage handle holding `modules`.
///
/// Fails on the first duplicate module name, duplicate collection or
/// dangling reference.
pub fn create_storage(
    config: StorageConfig,
    modules: impl IntoIterator<Item = SchemaModule>,
) -> SchemaResult<Storage> {
    let mut builder = StorageBuilder::new(config);
    for module in modules {
        builder.register_module(module)?;
    }
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CollectionDefinition, Relationship};

    fn team_module() -> SchemaModule {
        SchemaModule::new("TeamModule").with_collection(CollectionDefinition::new("team"))
    }

    fn user_module() -> SchemaModule {
        SchemaModule::new("UserModule").with_collection(
            CollectionDefinition::new("user").with_relationship(Relationship::child_of("team")),
        )
    }

    #[test]
    fn test_create_storage() {
        let storage =
            create_storage(StorageConfig::memory(), vec![user_module(), team_module()]).unwrap();

        assert_eq!(storage.backend(), Backend::Memory);
        let names: Vec<_> = storage.modules().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["UserModule", "TeamModule"]);
        assert_eq!(storage.registry().len(), 2);
        assert_eq!(storage.registry().owner_of("user"), Some("UserModule"));
        assert!(storage.module("TeamModule").is_some());
    }

    #[test]
    fn test_forward_references_resolve_at_finish() {
        let mut builder = StorageBuilder::new(StorageConfig::default());
        builder.register_module(user_module()).unwrap();
        builder.register_module(team_module()).unwrap();

        assert!(builder.finish().is_ok());
    }

    #[test]
    fn test_duplicate_module_name() {
        let err = create_storage(StorageConfig::memory(), vec![team_module(), team_module()])
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateModuleName {
                name: "TeamModule".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_collection_across_modules() {
        let other = SchemaModule::new("OtherModule").with_collection(CollectionDefinition::new("team"));

        let err = create_storage(StorageConfig::memory(), vec![team_module(), other]).unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateCollection { .. }));
    }

    #[test]
    fn test_empty_module_is_kept() {
        let storage =
            create_storage(StorageConfig::memory(), vec![SchemaModule::new("EmptyModule")])
                .unwrap();

        assert!(storage.registry().is_empty());
        assert_eq!(storage.modules().count(), 1);
    }

    #[test]
    fn test_backend_from_toml() {
        let config: StorageConfig = toml::from_str("backend = \"memory\"").unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert!(toml::from_str::<StorageConfig>("backend = \"sqlite\"").is_err());
    }
}
