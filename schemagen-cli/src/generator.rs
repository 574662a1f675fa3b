//! Per-module declaration generator.
//!
//! Renders the collections of one module into a self-contained TypeScript
//! file. Imports of collections owned by other modules point at
//! `./<kebab-case collection name>.<ext>`, so the import surface follows
//! collection identity rather than the module file layout.

use crate::config::{GenerationConfig, OutputConfig};
use crate::error::CliResult;
use crate::identity::ModuleInfo;
use convert_case::{Case, Casing};
use schemagen::{generate_declarations, RenderOptions, SchemaModule, SchemaRegistry};

const HEADER: &str = "// Auto-generated by schemagen\n// Do not edit manually\n";

/// Rendered output of one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Canonical name of the module.
    pub module_name: String,

    /// File name inside the output directory.
    pub file_name: String,

    /// Complete file content.
    pub content: String,

    /// Number of type declarations in `content`.
    pub declarations: usize,
}

/// Import path for a collection's declaration.
pub fn import_path_for(collection: &str, extension: &str) -> String {
    format!("./{}.{}", collection.to_case(Case::Kebab), extension)
}

/// Output file name for a module.
pub fn output_file_name(info: &ModuleInfo, extension: &str) -> String {
    format!("{}.{}", info.base_name_without_ext, extension)
}

/// Generates declaration files for single modules.
#[derive(Debug, Clone)]
pub struct ModuleGenerator {
    generation: GenerationConfig,
    extension: String,
    generate_docs: bool,
}

impl ModuleGenerator {
    /// Create a new generator.
    pub fn new(generation: GenerationConfig, output: &OutputConfig) -> Self {
        Self {
            generation,
            extension: output.extension.clone(),
            generate_docs: output.generate_docs,
        }
    }

    /// Render `module` against the shared `registry`.
    pub fn generate(
        &self,
        module: &SchemaModule,
        info: &ModuleInfo,
        registry: &SchemaRegistry,
    ) -> CliResult<GeneratedOutput> {
        let collections: Vec<String> = module.collection_names().map(String::from).collect();

        tracing::debug!(
            module = module.name(),
            collections = collections.len(),
            "generating module"
        );

        let extension = self.extension.as_str();
        let options = RenderOptions::new(collections)
            .with_auto_pk_type(self.generation.auto_pk_type)
            .with_docs(self.generate_docs)
            .with_import_path(move |collection| import_path_for(collection, extension));

        let declarations = generate_declarations(registry, &options)?;

        let mut content = String::from(HEADER);
        if !declarations.is_empty() {
            content.push('\n');
            content.push_str(&declarations);
        }

        Ok(GeneratedOutput {
            module_name: module.name().to_string(),
            file_name: output_file_name(info, &self.extension),
            content,
            declarations: options.collections.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagen::{
        create_storage, CollectionDefinition, FieldDefinition, FieldType, Relationship,
        StorageConfig,
    };
    use std::path::PathBuf;

    fn info(base: &str) -> ModuleInfo {
        ModuleInfo {
            path: PathBuf::from(format!("modules/{base}.toml")),
            base_name_without_ext: base.to_string(),
            is_single_file: true,
        }
    }

    fn generator() -> ModuleGenerator {
        ModuleGenerator::new(GenerationConfig::default(), &OutputConfig::default())
    }

    #[test]
    fn test_import_path_for() {
        assert_eq!(import_path_for("team", "ts"), "./team.ts");
        assert_eq!(import_path_for("userProfile", "ts"), "./user-profile.ts");
        assert_eq!(import_path_for("user_profile", "ts"), "./user-profile.ts");
        assert_eq!(import_path_for("UserProfile", "d.ts"), "./user-profile.d.ts");
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name(&info("foo-bar"), "ts"), "foo-bar.ts");
    }

    #[test]
    fn test_generate_with_cross_module_reference() {
        let storage = create_storage(
            StorageConfig::memory(),
            vec![
                SchemaModule::new("ProfileModule").with_collection(
                    CollectionDefinition::new("userProfile")
                        .with_field(FieldDefinition::new("bio", FieldType::Text))
                        .with_relationship(Relationship::single_child_of("account")),
                ),
                SchemaModule::new("AccountModule")
                    .with_collection(CollectionDefinition::new("account")),
            ],
        )
        .unwrap();
        let module = storage.module("ProfileModule").unwrap();

        let output = generator()
            .generate(module, &info("profiles"), storage.registry())
            .unwrap();

        assert_eq!(output.module_name, "ProfileModule");
        assert_eq!(output.file_name, "profiles.ts");
        assert_eq!(output.declarations, 1);
        assert!(output.content.starts_with(HEADER));
        assert!(output
            .content
            .contains("import type { Account } from './account.ts';"));
        assert!(output
            .content
            .contains("export interface UserProfile<Pk = number | string> {"));
    }

    #[test]
    fn test_generate_empty_module() {
        let storage =
            create_storage(StorageConfig::memory(), vec![SchemaModule::new("EmptyModule")])
                .unwrap();
        let module = storage.module("EmptyModule").unwrap();

        let output = generator()
            .generate(module, &info("empty"), storage.registry())
            .unwrap();

        assert_eq!(output.declarations, 0);
        assert_eq!(output.content, HEADER);
        assert!(!output.content.contains("export"));
    }

    #[test]
    fn test_generate_is_repeatable() {
        let storage = create_storage(
            StorageConfig::memory(),
            vec![SchemaModule::new("TeamModule").with_collection(
                CollectionDefinition::new("team")
                    .with_field(FieldDefinition::new("name", FieldType::String)),
            )],
        )
        .unwrap();
        let module = storage.module("TeamModule").unwrap();

        let first = generator()
            .generate(module, &info("team"), storage.registry())
            .unwrap();
        let second = generator()
            .generate(module, &info("team"), storage.registry())
            .unwrap();

        assert_eq!(first, second);
    }
}
