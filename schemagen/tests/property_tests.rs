//! Property-based tests for schemagen.
//!
//! Properties tested:
//! - Collections whose names differ only in casing style cannot share a type name
//! - Member names of a collection are accepted exactly when they are unique
//! - Description text never terminates a generated doc comment

use proptest::prelude::*;
use std::collections::HashSet;

use schemagen::{
    generate_declarations, type_name_for, CollectionDefinition, FieldDefinition, FieldType,
    RegistryBuilder, RenderOptions, SchemaError,
};

// =============================================================================
// Generators for property tests
// =============================================================================

/// Generate the words of a multi-word collection name.
fn arb_words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{2,6}", 2..4)
}

fn snake_case(words: &[String]) -> String {
    words.join("_")
}

fn camel_case(words: &[String]) -> String {
    let mut name = words[0].clone();
    for word in &words[1..] {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}

/// Generate field names from a small pool so collisions are common.
fn arb_field_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop::sample::select(vec!["id", "name", "email", "team", "title"]),
        0..5,
    )
    .prop_map(|names| names.into_iter().map(String::from).collect())
}

/// Generate free text that likes to contain comment delimiters.
fn arb_description() -> impl Strategy<Value = String> {
    "([a-z ]{0,6}(\\*/|/\\*|\\*|/|\n)?){0,6}"
}

// =============================================================================
// Registry uniqueness
// =============================================================================

proptest! {
    /// snake_case and camelCase spellings of one name collide on the type name.
    #[test]
    fn prop_casing_variants_share_type_name(words in arb_words()) {
        let snake = snake_case(&words);
        let camel = camel_case(&words);
        prop_assert_eq!(type_name_for(&snake), type_name_for(&camel));

        let mut builder = RegistryBuilder::new();
        builder
            .register_collection("SnakeModule", CollectionDefinition::new(snake.clone()))
            .unwrap();
        let result = builder.register_collection("CamelModule", CollectionDefinition::new(camel));

        let is_duplicate_type = matches!(
            result,
            Err(SchemaError::DuplicateTypeName { ref existing_collection, .. })
                if *existing_collection == snake
        );
        prop_assert!(is_duplicate_type);
    }

    /// A collection registers exactly when no field repeats a name or takes
    /// the implicit primary key.
    #[test]
    fn prop_member_names_are_unique(names in arb_field_names()) {
        let collection = names.iter().fold(CollectionDefinition::new("record"), |c, name| {
            c.with_field(FieldDefinition::new(name.clone(), FieldType::String))
        });

        let mut seen = HashSet::from(["id"]);
        let expected_ok = names.iter().all(|name| seen.insert(name.as_str()));

        let result = RegistryBuilder::new().register_collection("RecordModule", collection);

        prop_assert_eq!(result.is_ok(), expected_ok);
        if let Err(err) = result {
            let is_duplicate_field = matches!(err, SchemaError::DuplicateField { .. });
            prop_assert!(is_duplicate_field);
        }
    }
}

// =============================================================================
// Doc comments
// =============================================================================

proptest! {
    /// Each doc comment is closed exactly once, whatever its text.
    #[test]
    fn prop_descriptions_stay_inside_comments(
        collection_doc in arb_description(),
        field_doc in arb_description(),
    ) {
        let mut builder = RegistryBuilder::new();
        builder
            .register_collection(
                "NoteModule",
                CollectionDefinition::new("note")
                    .with_description(collection_doc)
                    .with_field(
                        FieldDefinition::new("body", FieldType::Text).with_description(field_doc),
                    ),
            )
            .unwrap();
        let registry = builder.build().unwrap();

        let output = generate_declarations(&registry, &RenderOptions::new(["note"])).unwrap();

        prop_assert_eq!(output.matches("*/").count(), 2);
        prop_assert_eq!(output.matches("export interface Note").count(), 1);
    }
}
