//! Collection schema definitions.
//!
//! A collection is a named record type: a list of typed fields, the
//! relationships it holds to other collections and the indices declared on it.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

/// Name of the primary key field when a collection does not declare one.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Storage type of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    String,
    Text,
    Json,
    Datetime,
    Timestamp,
    Boolean,
    Int,
    Float,
    Binary,
    /// Automatically assigned primary key.
    AutoPk,
}

/// A named, typed field of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field name as stored.
    pub name: String,

    /// Storage type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field may be absent.
    #[serde(default)]
    pub optional: bool,

    /// Free-form description, rendered as a doc comment.
    #[serde(default)]
    pub description: Option<String>,
}

impl FieldDefinition {
    /// Create a required field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional: false,
            description: None,
        }
    }

    /// Mark the field as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// How a collection points at another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// Many records of this collection belong to one target record.
    ChildOf,
    /// At most one record of this collection belongs to one target record.
    SingleChildOf,
}

/// A reference from one collection to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(rename = "type")]
    pub kind: RelationshipKind,

    /// Target collection name.
    pub collection: String,

    /// Field name holding the reference; defaults to the target name.
    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub optional: bool,
}

impl Relationship {
    /// Create a `child_of` relationship to `collection`.
    pub fn child_of(collection: impl Into<String>) -> Self {
        Self {
            kind: RelationshipKind::ChildOf,
            collection: collection.into(),
            alias: None,
            optional: false,
        }
    }

    /// Create a `single_child_of` relationship to `collection`.
    pub fn single_child_of(collection: impl Into<String>) -> Self {
        Self {
            kind: RelationshipKind::SingleChildOf,
            ..Self::child_of(collection)
        }
    }

    /// Store the reference under a different field name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Mark the reference as optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Name of the field that holds the reference.
    pub fn field_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.collection)
    }
}

/// Full schema of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionDefinition {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldDefinition>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,

    /// Names of indexed fields.
    #[serde(default)]
    pub indices: Vec<String>,
}

impl CollectionDefinition {
    /// Create an empty collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            relationships: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a field.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a relationship.
    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Add an index on a field.
    pub fn with_index(mut self, field: impl Into<String>) -> Self {
        self.indices.push(field.into());
        self
    }

    /// Name of the primary key field.
    pub fn primary_key(&self) -> &str {
        self.fields
            .iter()
            .find(|f| f.field_type == FieldType::AutoPk)
            .map_or(DEFAULT_PRIMARY_KEY, |f| f.name.as_str())
    }

    /// Whether a field is explicitly typed `auto-pk`.
    pub fn has_explicit_primary_key(&self) -> bool {
        self.fields.iter().any(|f| f.field_type == FieldType::AutoPk)
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` is a field, a relationship field or the primary key.
    pub fn has_member(&self, name: &str) -> bool {
        name == self.primary_key()
            || self.field(name).is_some()
            || self.relationships.iter().any(|r| r.field_name() == name)
    }

    /// Target collections of all relationships, in declaration order.
    pub fn referenced_collections(&self) -> impl Iterator<Item = &str> {
        self.relationships.iter().map(|r| r.collection.as_str())
    }

    /// TypeScript type name of this collection.
    pub fn type_name(&self) -> String {
        type_name_for(&self.name)
    }
}

/// PascalCase type name for a collection name (`user_profile` -> `UserProfile`).
pub fn type_name_for(collection: &str) -> String {
    collection.to_case(Case::Pascal)
}
