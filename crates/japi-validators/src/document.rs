//! Top-level document envelope validation
//!
//! Enforces the envelope invariants (`data`/`errors` mutual
//! exclusivity, `included` only alongside `data`, at least one of
//! `data`/`errors`/`meta`) and fans out to the resource and error
//! validators per element, with document-relative context prefixes
//! (`data[i]`, `included[i] (type:id)`).
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::jsonapi_object::validate_jsonapi_object;
use crate::members::DOCUMENT_MEMBERS;
use crate::resource::{
    validate_link_value, validate_meta_member, validate_resource_collection,
    validate_resource_object, ResourceOptions,
};
use crate::result::{json_type_name, Context, ValidationResult};
use serde_json::Value;

/// Validate a complete JSON:API document envelope
pub fn validate_document(document: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();
    let root = Context::root();

    let map = match document {
        Value::Object(map) => map,
        other => {
            result.error(
                "document: object type",
                format!(
                    "A JSON:API document must be an object, got {}",
                    json_type_name(other)
                ),
                &root,
            );
            return result;
        }
    };

    let has_data = map.contains_key("data");
    let has_errors = map.contains_key("errors");
    let has_meta = map.contains_key("meta");

    if has_data && has_errors {
        result.error(
            "document: data errors exclusive",
            "`data` and `errors` must not coexist in the same document",
            &root,
        );
    }
    if !has_data && !has_errors && !has_meta {
        result.error(
            "document: top-level members",
            "Document must contain at least one of `data`, `errors`, `meta`",
            &root,
        );
    }
    if map.contains_key("included") && !has_data {
        result.error(
            "document: included without data",
            "`included` is only allowed alongside `data`",
            &root,
        );
    }

    if let Some(data) = map.get("data") {
        validate_data_member(data, &mut result);
    }
    if let Some(errors) = map.get("errors") {
        result.merge(crate::error_object::validate_errors_member(errors));
    }
    if let Some(included) = map.get("included") {
        validate_included_member(included, &mut result);
    }
    if let Some(links) = map.get("links") {
        validate_document_links(links, &mut result);
    }
    if let Some(jsonapi) = map.get("jsonapi") {
        result.merge(validate_jsonapi_object(jsonapi));
    }
    if let Some(meta) = map.get("meta") {
        validate_meta_member(meta, &Context::new("meta"), &mut result);
    }

    for key in map.keys() {
        if !DOCUMENT_MEMBERS.contains(&key.as_str()) {
            result.warning(
                "document: unknown member",
                format!("Document contains unknown top-level member '{key}'"),
                &root,
            );
        }
    }

    if result.is_valid() {
        result.detail("document: envelope", "Document envelope is well-formed", &root);
    }
    result
}

fn validate_data_member(data: &Value, result: &mut ValidationResult) {
    let context = Context::new("data");
    match data {
        // `data: null` is a legal empty to-one primary datum
        Value::Null => {
            result.detail("document: data", "Primary data is null", &context);
        }
        Value::Object(_) => {
            result.merge(validate_resource_object(
                data,
                &ResourceOptions::default(),
                &context,
            ));
        }
        Value::Array(resources) => {
            result.merge(validate_resource_collection(
                resources,
                &ResourceOptions::default(),
                &context,
            ));
        }
        other => {
            result.error(
                "document: data type",
                format!(
                    "`data` must be null, a resource object or an array of resource objects, \
                     got {}",
                    json_type_name(other)
                ),
                &context,
            );
        }
    }
}

fn validate_included_member(included: &Value, result: &mut ValidationResult) {
    let context = Context::new("included");
    let resources = match included {
        Value::Array(resources) => resources,
        other => {
            result.error(
                "document: included type",
                format!("`included` must be an array, got {}", json_type_name(other)),
                &context,
            );
            return;
        }
    };

    for (index, resource) in resources.iter().enumerate() {
        // Annotate the path with (type:id) when available so findings
        // stay readable in large compound documents
        let element_context = match resource_tag(resource) {
            Some(tag) => context.index(index).annotated(&tag),
            None => context.index(index),
        };
        result.merge(validate_resource_object(
            resource,
            &ResourceOptions::default(),
            &element_context,
        ));
    }
}

fn resource_tag(resource: &Value) -> Option<String> {
    let map = resource.as_object()?;
    let type_name = map.get("type")?.as_str()?;
    let id = map.get("id")?.as_str()?;
    Some(format!("{type_name}:{id}"))
}

fn validate_document_links(links: &Value, result: &mut ValidationResult) {
    let context = Context::new("links");
    let map = match links {
        Value::Object(map) => map,
        other => {
            result.error(
                "document: links object",
                format!("`links` must be an object, got {}", json_type_name(other)),
                &context,
            );
            return;
        }
    };

    if map.is_empty() {
        result.warning(
            "document: links empty",
            "Top-level `links` is present but empty",
            &context,
        );
        return;
    }

    for (name, value) in map {
        result.merge(validate_link_value(name, value, &context.child(name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_tests(result: &ValidationResult) -> Vec<&str> {
        result.errors().iter().map(|f| f.test.as_str()).collect()
    }

    #[test]
    fn test_single_resource_document() {
        let document = json!({
            "data": {"type": "articles", "id": "1", "attributes": {"title": "Rust"}},
            "links": {"self": "https://example.com/articles/1"}
        });
        let result = validate_document(&document);
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn test_data_and_errors_are_exclusive() {
        let document = json!({
            "data": null,
            "errors": [{"title": "boom"}]
        });
        let result = validate_document(&document);
        assert!(error_tests(&result).contains(&"document: data errors exclusive"));
    }

    #[test]
    fn test_meta_only_document_is_valid() {
        let result = validate_document(&json!({"meta": {"copyright": "2025"}}));
        assert!(result.is_valid());
    }

    #[test]
    fn test_empty_document_fails() {
        let result = validate_document(&json!({}));
        assert!(error_tests(&result).contains(&"document: top-level members"));
    }

    #[test]
    fn test_included_requires_data() {
        let document = json!({
            "meta": {"count": 0},
            "included": [{"type": "people", "id": "9"}]
        });
        let result = validate_document(&document);
        assert!(error_tests(&result).contains(&"document: included without data"));
    }

    #[test]
    fn test_included_contexts_carry_type_and_id() {
        let document = json!({
            "data": {"type": "articles", "id": "1"},
            "included": [{"type": "people", "id": "9", "attributes": {"Bad": 1}}]
        });
        let result = validate_document(&document);
        assert!(!result.is_valid());
        let context = result.errors()[0].context.as_deref().unwrap();
        assert!(context.starts_with("included[0] (people:9)"), "{context}");
    }

    #[test]
    fn test_data_must_be_null_resource_or_array() {
        let result = validate_document(&json!({"data": "articles"}));
        assert!(error_tests(&result).contains(&"document: data type"));
    }

    #[test]
    fn test_null_data_is_valid() {
        let result = validate_document(&json!({"data": null}));
        assert!(result.is_valid());
    }

    #[test]
    fn test_error_document() {
        let document = json!({
            "errors": [{"status": "404", "title": "Not Found"}]
        });
        let result = validate_document(&document);
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn test_unknown_top_level_member_warns() {
        let document = json!({"data": null, "extensions": {}});
        let result = validate_document(&document);
        assert!(result.is_valid());
        assert!(result
            .warnings()
            .iter()
            .any(|f| f.test == "document: unknown member"));
    }

    #[test]
    fn test_collection_document_with_relationships() {
        let document = json!({
            "data": [
                {
                    "type": "articles",
                    "id": "1",
                    "relationships": {
                        "author": {"data": {"type": "people", "id": "9"}}
                    }
                }
            ],
            "included": [{"type": "people", "id": "9"}]
        });
        let result = validate_document(&document);
        assert!(result.is_valid(), "{:?}", result.errors());
    }
}
