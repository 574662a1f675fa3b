//! # schemagen
//!
//! Schema registry and TypeScript declaration rendering for collection-based
//! storage modules.
//!
//! A [`SchemaModule`] groups named collections. Modules are aggregated into a
//! [`Storage`] handle whose frozen [`SchemaRegistry`] indexes every
//! collection across all modules, so that declarations rendered for one
//! module can reference collections declared by another.
//!
//! ## Quick Start
//!
//! ```rust
//! use schemagen::{
//!     create_storage, generate_declarations, CollectionDefinition, FieldDefinition,
//!     FieldType, Relationship, RenderOptions, SchemaModule, StorageConfig,
//! };
//!
//! let team = SchemaModule::new("TeamModule").with_collection(
//!     CollectionDefinition::new("team")
//!         .with_field(FieldDefinition::new("name", FieldType::String)),
//! );
//! let user = SchemaModule::new("UserModule").with_collection(
//!     CollectionDefinition::new("user")
//!         .with_field(FieldDefinition::new("displayName", FieldType::String))
//!         .with_relationship(Relationship::child_of("team")),
//! );
//!
//! let storage = create_storage(StorageConfig::memory(), vec![team, user]).unwrap();
//!
//! let options = RenderOptions::new(["user"]).with_import_path(|name| format!("./{name}.ts"));
//! let declarations = generate_declarations(storage.registry(), &options).unwrap();
//!
//! assert!(declarations.contains("import type { Team } from './team.ts';"));
//! assert!(declarations.contains("export interface User<Pk = number | string> {"));
//! ```
//!
//! ## Registry Invariants
//!
//! | Rule | Error |
//! |------|-------|
//! | Collection names are unique across all modules | [`SchemaError::DuplicateCollection`] |
//! | Module names are unique | [`SchemaError::DuplicateModuleName`] |
//! | Collection type names are unique across all modules | [`SchemaError::DuplicateTypeName`] |
//! | Fields, relationship fields and the implicit `id` never share a name | [`SchemaError::DuplicateField`] |
//! | Relationship targets exist | [`SchemaError::UnknownCollection`] |
//! | Indices name existing members | [`SchemaError::UnknownIndexField`] |

pub mod error;
pub mod module;
pub mod registry;
pub mod render;
pub mod schema;
pub mod storage;

pub use error::{SchemaError, SchemaResult};
pub use module::SchemaModule;
pub use registry::{RegistryBuilder, SchemaRegistry};
pub use render::{generate_declarations, AutoPkType, RenderOptions};
pub use schema::{
    type_name_for, CollectionDefinition, FieldDefinition, FieldType, Relationship,
    RelationshipKind,
};
pub use storage::{create_storage, Backend, Storage, StorageBuilder, StorageConfig};
