//! Sparse fieldset semantics (`fields[type]=a,b,c`)
//!
//! Extracts sparse fieldsets from the flattened query-parameter map
//! (handling both literal and percent-encoded bracket forms), checks
//! the raw syntax of the parameters themselves, and enforces the
//! fieldset against every primary and included resource in a document.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::result::{json_type_name, Context, ValidationResult};
use percent_encoding::percent_decode_str;
use serde_json::Value;
use std::collections::BTreeMap;

/// Punctuation JSON:API disallows in field names
const DISALLOWED_FIELD_CHARS: &[char] = &[
    '[', ']', '{', '}', '(', ')', '<', '>', '@', ',', ';', ':', '\\', '"', '/', '?', '=',
];

/// Extract `fields[type]=a,b,c` parameters into a type -> fields map.
///
/// Keys arrive as sent on the wire, so both `fields[articles]` and the
/// percent-encoded `fields%5Barticles%5D` form are recognized.
pub fn parse_sparse_fieldsets(
    params: &BTreeMap<String, String>,
) -> BTreeMap<String, Vec<String>> {
    let mut fieldsets = BTreeMap::new();
    for (key, value) in params {
        if let Some(resource_type) = fieldset_type_of(key) {
            let fields: Vec<String> = value
                .split(',')
                .map(|field| field.trim().to_string())
                .filter(|field| !field.is_empty())
                .collect();
            fieldsets.insert(resource_type, fields);
        }
    }
    fieldsets
}

/// The resource type a query key addresses, when the key is a
/// `fields[...]` parameter (in either bracket form)
fn fieldset_type_of(key: &str) -> Option<String> {
    let decoded = percent_decode_str(key).decode_utf8_lossy();
    let inner = decoded.strip_prefix("fields[")?.strip_suffix(']')?;
    Some(inner.to_string())
}

/// Validate the raw syntax of `fields[...]` query parameters,
/// independent of any response document
pub fn validate_fieldset_syntax(params: &BTreeMap<String, String>) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (key, value) in params {
        let decoded = percent_decode_str(key).decode_utf8_lossy();
        // Only `fields` itself and `fields[...]` address fieldsets;
        // unrelated keys like `fieldset` pass through untouched
        if decoded != "fields" && !decoded.starts_with("fields[") {
            continue;
        }
        let context = Context::new(decoded.as_ref());

        let Some(resource_type) = fieldset_type_of(key) else {
            result.error(
                "fieldset: parameter form",
                format!("'{decoded}' is not of the form fields[type]"),
                &context,
            );
            continue;
        };

        if resource_type.is_empty() {
            result.error(
                "fieldset: type",
                "Fieldset parameter must name a non-empty resource type",
                &context,
            );
        }

        let fields: Vec<&str> = value
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect();
        if fields.is_empty() {
            result.error(
                "fieldset: fields empty",
                format!("Fieldset for '{resource_type}' must list at least one field"),
                &context,
            );
            continue;
        }

        for field in fields {
            if field.contains(DISALLOWED_FIELD_CHARS) {
                result.error(
                    "fieldset: field characters",
                    format!("Field name '{field}' contains disallowed punctuation"),
                    &context,
                );
            }
        }
    }

    if result.is_valid() {
        result.detail(
            "fieldset: syntax",
            "Sparse fieldset parameters are well-formed",
            &Context::root(),
        );
    }
    result
}

/// Enforce a sparse fieldset against one resource object.
///
/// `id` and `type` are always permitted regardless of the fieldset, as
/// are `links`, `meta` and `relationships`. Attributes outside the
/// requested set are errors; requested fields absent from the resource
/// are warnings only (the server may legitimately have no value).
pub fn validate_resource_fieldset(
    resource: &Value,
    fieldsets: &BTreeMap<String, Vec<String>>,
    context: &Context,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(map) = resource.as_object() else {
        result.detail(
            "fieldset: skipped",
            format!(
                "Fieldset check skipped for non-object resource ({})",
                json_type_name(resource)
            ),
            context,
        );
        return result;
    };
    let Some(resource_type) = map.get("type").and_then(Value::as_str) else {
        return result;
    };
    let Some(requested) = fieldsets.get(resource_type) else {
        result.detail(
            "fieldset: unrestricted",
            format!("No fieldset requested for type '{resource_type}'"),
            context,
        );
        return result;
    };

    let attributes = map
        .get("attributes")
        .and_then(Value::as_object);
    let relationships = map
        .get("relationships")
        .and_then(Value::as_object);

    if let Some(attributes) = attributes {
        for key in attributes.keys() {
            if !requested.iter().any(|field| field == key) {
                result.error(
                    "fieldset: unrequested attribute",
                    format!(
                        "Attribute '{key}' was returned but not requested by \
                         fields[{resource_type}]"
                    ),
                    &context.child("attributes").child(key),
                );
            }
        }
    }

    for field in requested {
        let in_attributes = attributes.is_some_and(|a| a.contains_key(field));
        let in_relationships = relationships.is_some_and(|r| r.contains_key(field));
        if !in_attributes && !in_relationships {
            result.warning(
                "fieldset: missing field",
                format!(
                    "Requested field '{field}' is absent from this '{resource_type}' resource"
                ),
                context,
            );
        }
    }

    result
}

/// Apply the sparse-fieldset check to every primary and included
/// resource of a document
pub fn validate_sparse_fieldsets(
    document: &Value,
    params: &BTreeMap<String, String>,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    let fieldsets = parse_sparse_fieldsets(params);

    if fieldsets.is_empty() {
        result.detail(
            "fieldset: none",
            "No sparse fieldsets were requested",
            &Context::root(),
        );
        return result;
    }

    let Some(map) = document.as_object() else {
        return result;
    };

    match map.get("data") {
        Some(Value::Object(_)) => {
            let data = &map["data"];
            result.merge(validate_resource_fieldset(data, &fieldsets, &Context::new("data")));
        }
        Some(Value::Array(resources)) => {
            let base = Context::new("data");
            for (index, resource) in resources.iter().enumerate() {
                result.merge(validate_resource_fieldset(resource, &fieldsets, &base.index(index)));
            }
        }
        _ => {}
    }

    if let Some(Value::Array(included)) = map.get("included") {
        let base = Context::new("included");
        for (index, resource) in included.iter().enumerate() {
            result.merge(validate_resource_fieldset(resource, &fieldsets, &base.index(index)));
        }
    }

    result
}
