//! Error types for schema registration and rendering.

use thiserror::Error;

/// Result type alias for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while aggregating modules into a registry or rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Two modules declared the same collection.
    #[error(
        "Collection '{collection}' declared by module '{module}' is already registered by module '{existing_module}'"
    )]
    DuplicateCollection {
        collection: String,
        module: String,
        existing_module: String,
    },

    /// Two modules share one canonical name.
    #[error("Module name '{name}' is registered more than once")]
    DuplicateModuleName { name: String },

    /// Two collections map to the same TypeScript type name.
    #[error(
        "Collection '{collection}' has type name '{type_name}', already used by collection '{existing_collection}'"
    )]
    DuplicateTypeName {
        type_name: String,
        collection: String,
        existing_collection: String,
    },

    /// A collection declares the same member twice, counting fields,
    /// relationship fields and the implicit primary key.
    #[error("Collection '{collection}' declares member '{field}' more than once")]
    DuplicateField { collection: String, field: String },

    /// A relationship names a collection nobody declared.
    #[error("Collection '{referenced_by}' references unknown collection '{collection}'")]
    UnknownCollection {
        collection: String,
        referenced_by: String,
    },

    /// A render request names a collection that is not registered.
    #[error("Collection '{collection}' is not registered")]
    NotRegistered { collection: String },

    /// An index names a field the collection does not have.
    #[error("Index on collection '{collection}' references unknown field '{field}'")]
    UnknownIndexField { collection: String, field: String },
}

impl SchemaError {
    /// Create a duplicate collection error.
    pub fn duplicate_collection(
        collection: impl Into<String>,
        module: impl Into<String>,
        existing_module: impl Into<String>,
    ) -> Self {
        Self::DuplicateCollection {
            collection: collection.into(),
            module: module.into(),
            existing_module: existing_module.into(),
        }
    }

    /// Create an unknown collection error.
    pub fn unknown_collection(
        collection: impl Into<String>,
        referenced_by: impl Into<String>,
    ) -> Self {
        Self::UnknownCollection {
            collection: collection.into(),
            referenced_by: referenced_by.into(),
        }
    }
}
