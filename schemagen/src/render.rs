//! TypeScript declaration rendering.
//!
//! Turns a set of collections from a [`SchemaRegistry`] into `export
//! interface` declarations. References to collections outside the rendered
//! set become `import type` statements; where they are imported from is
//! decided by the caller through [`RenderOptions::with_import_path`].
//!
//! # Type Mappings
//!
//! | Field type | TypeScript |
//! |------------|------------|
//! | `string`, `text` | `string` |
//! | `json` | `any` |
//! | `datetime` | `Date` |
//! | `timestamp`, `int`, `float` | `number` |
//! | `boolean` | `boolean` |
//! | `binary` | `Uint8Array` |
//! | `auto-pk` | primary key type |
//! | relationship | `Target<Pk>['<target pk>']` |

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, SchemaResult};
use crate::registry::SchemaRegistry;
use crate::schema::{CollectionDefinition, FieldType};

const INDENT: &str = "    ";

/// How primary keys are typed in generated declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoPkType {
    /// Leave the key type to the consumer through a `Pk` type parameter.
    #[default]
    Generic,
    Number,
    String,
}

impl AutoPkType {
    fn key_type(self) -> &'static str {
        match self {
            AutoPkType::Generic => "Pk",
            AutoPkType::Number => "number",
            AutoPkType::String => "string",
        }
    }

    fn type_parameters(self) -> &'static str {
        match self {
            AutoPkType::Generic => "<Pk = number | string>",
            AutoPkType::Number | AutoPkType::String => "",
        }
    }

    fn type_arguments(self) -> &'static str {
        match self {
            AutoPkType::Generic => "<Pk>",
            AutoPkType::Number | AutoPkType::String => "",
        }
    }
}

/// Callback mapping a collection name to the path it is imported from.
pub type ImportPathFn<'a> = Box<dyn Fn(&str) -> String + 'a>;

/// Options for [`generate_declarations`].
pub struct RenderOptions<'a> {
    /// Primary key typing policy.
    pub auto_pk_type: AutoPkType,

    /// Collections to render, in output order.
    pub collections: Vec<String>,

    /// Import path for a referenced collection outside `collections`.
    pub generate_import_path: ImportPathFn<'a>,

    /// Whether descriptions become doc comments.
    pub generate_docs: bool,
}

impl<'a> RenderOptions<'a> {
    /// Render the given collections with default settings.
    pub fn new<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            auto_pk_type: AutoPkType::default(),
            collections: collections.into_iter().map(Into::into).collect(),
            generate_import_path: Box::new(|name: &str| format!("./{name}")),
            generate_docs: true,
        }
    }

    /// Set the primary key typing policy.
    pub fn with_auto_pk_type(mut self, auto_pk_type: AutoPkType) -> Self {
        self.auto_pk_type = auto_pk_type;
        self
    }

    /// Set the import path callback.
    pub fn with_import_path(mut self, f: impl Fn(&str) -> String + 'a) -> Self {
        self.generate_import_path = Box::new(f);
        self
    }

    /// Set whether to emit doc comments.
    pub fn with_docs(mut self, generate: bool) -> Self {
        self.generate_docs = generate;
        self
    }
}

/// Render declarations for `options.collections`.
///
/// Returns an empty string when no collections are requested.
pub fn generate_declarations(
    registry: &SchemaRegistry,
    options: &RenderOptions<'_>,
) -> SchemaResult<String> {
    let local: HashSet<&str> = options.collections.iter().map(String::as_str).collect();
    let mut imports = BTreeMap::new();
    let mut declarations = Vec::with_capacity(options.collections.len());

    for name in &options.collections {
        let collection = registry
            .get(name)
            .ok_or_else(|| SchemaError::NotRegistered {
                collection: name.clone(),
            })?;
        declarations.push(render_collection(
            collection,
            registry,
            options,
            &local,
            &mut imports,
        )?);
    }

    let mut output = String::new();
    for (type_name, path) in &imports {
        output.push_str(&format!("import type {{ {type_name} }} from '{path}';\n"));
    }
    if !imports.is_empty() {
        output.push('\n');
    }
    output.push_str(&declarations.join("\n"));

    Ok(output)
}

fn render_collection(
    collection: &CollectionDefinition,
    registry: &SchemaRegistry,
    options: &RenderOptions<'_>,
    local: &HashSet<&str>,
    imports: &mut BTreeMap<String, String>,
) -> SchemaResult<String> {
    let pk = options.auto_pk_type;
    let mut out = String::new();

    if options.generate_docs {
        if let Some(description) = &collection.description {
            push_block_doc(&mut out, "", description);
        }
    }

    out.push_str(&format!(
        "export interface {}{} {{\n",
        collection.type_name(),
        pk.type_parameters()
    ));

    if !collection.has_explicit_primary_key() {
        out.push_str(&format!(
            "{INDENT}{}: {};\n",
            property_name(collection.primary_key()),
            pk.key_type()
        ));
    }

    for field in &collection.fields {
        if options.generate_docs {
            if let Some(description) = &field.description {
                if description.contains('\n') {
                    push_block_doc(&mut out, INDENT, description);
                } else {
                    out.push_str(&format!("{INDENT}/** {} */\n", escape_doc(description)));
                }
            }
        }
        out.push_str(&format!(
            "{INDENT}{}{}: {};\n",
            property_name(&field.name),
            optional_marker(field.optional),
            field_type(field.field_type, pk)
        ));
    }

    for relationship in &collection.relationships {
        let target = registry.get(&relationship.collection).ok_or_else(|| {
            SchemaError::unknown_collection(&relationship.collection, &collection.name)
        })?;
        let target_type = target.type_name();

        if !local.contains(target.name.as_str()) {
            let path = (options.generate_import_path)(&target.name);
            imports.insert(target_type.clone(), path);
        }

        out.push_str(&format!(
            "{INDENT}{}{}: {}{}['{}'];\n",
            property_name(relationship.field_name()),
            optional_marker(relationship.optional),
            target_type,
            pk.type_arguments(),
            target.primary_key()
        ));
    }

    out.push_str("}\n");
    Ok(out)
}

fn push_block_doc(out: &mut String, indent: &str, text: &str) {
    out.push_str(&format!("{indent}/**\n"));
    for line in text.lines() {
        out.push_str(&format!("{indent} * {}\n", escape_doc(line)));
    }
    out.push_str(&format!("{indent} */\n"));
}

/// Keep free text from terminating the surrounding comment.
fn escape_doc(text: &str) -> String {
    text.replace("*/", "*\\/")
}

fn field_type(field_type: FieldType, pk: AutoPkType) -> &'static str {
    match field_type {
        FieldType::String | FieldType::Text => "string",
        FieldType::Json => "any",
        FieldType::Datetime => "Date",
        FieldType::Timestamp | FieldType::Int | FieldType::Float => "number",
        FieldType::Boolean => "boolean",
        FieldType::Binary => "Uint8Array",
        FieldType::AutoPk => pk.key_type(),
    }
}

fn optional_marker(optional: bool) -> &'static str {
    if optional {
        "?"
    } else {
        ""
    }
}

/// Quote property names that are not plain identifiers.
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if is_identifier {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}
