//! Resource object, resource identifier, relationship and link grammar
//!
//! This module validates the resource half of the JSON:API grammar:
//! resource objects (`type`/`id`/`attributes`/`relationships`/
//! `links`/`meta`), resource identifiers, relationship objects and
//! link values. The document validator delegates here per element of
//! `data` and `included`.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::member_name::{is_valid_member_format, validate_member_name_str};
use crate::members::{
    LINK_OBJECT_MEMBERS, RELATIONSHIP_LINKS, RELATIONSHIP_MEMBERS, RESOURCE_IDENTIFIER_MEMBERS,
    RESOURCE_MEMBERS,
};
use crate::result::{json_type_name, Context, ValidationResult};
use crate::url_format::url_validation_error;
use serde_json::{Map, Value};

/// Options controlling resource-object validation
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceOptions {
    /// Client-generated resources may omit `id`; a missing `id` then
    /// downgrades from an error to a warning
    pub allow_missing_id: bool,
}

/// Lightweight shape predicate used by other validators to decide
/// whether a value is worth treating as a resource object at all
pub fn is_resource_object_shape(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            matches!(map.get("type"), Some(Value::String(_)))
                && map.get("id").is_none_or(|id| id.is_string())
        }
        _ => false,
    }
}

/// Validate a single resource object.
///
/// Validation continues past individual failures wherever the
/// structure allows: an invalid `type` does not prevent `id` or
/// `attributes` from being checked.
pub fn validate_resource_object(
    resource: &Value,
    options: &ResourceOptions,
    context: &Context,
) -> ValidationResult {
    let mut result = ValidationResult::new();

    let map = match resource {
        Value::Object(map) => map,
        other => {
            result.error(
                "resource: object type",
                format!("Resource must be an object, got {}", json_type_name(other)),
                context,
            );
            return result;
        }
    };

    validate_type_member(map, context, &mut result);
    validate_id_member(map, options, context, &mut result);

    if let Some(attributes) = map.get("attributes") {
        validate_attributes_member(attributes, context, &mut result);
    }
    if let Some(relationships) = map.get("relationships") {
        validate_relationships_member(relationships, context, &mut result);
    }
    if let Some(links) = map.get("links") {
        validate_resource_links_member(links, context, &mut result);
    }
    if let Some(meta) = map.get("meta") {
        validate_meta_member(meta, &context.child("meta"), &mut result);
    }

    // Clients may still process documents carrying unknown members, so
    // these are advisory only
    for key in map.keys() {
        if !RESOURCE_MEMBERS.contains(&key.as_str()) {
            result.warning(
                "resource: unknown member",
                format!("Resource object contains unknown member '{key}'"),
                context,
            );
        }
    }

    if result.is_valid() {
        result.detail("resource: structure", "Resource object is well-formed", context);
    }
    result
}

/// Validate every element of a resource collection with
/// index-qualified contexts (`data[0]`, `data[1]`, ...)
pub fn validate_resource_collection(
    resources: &[Value],
    options: &ResourceOptions,
    context: &Context,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    for (index, resource) in resources.iter().enumerate() {
        result.merge(validate_resource_object(
            resource,
            options,
            &context.index(index),
        ));
    }
    result
}

fn validate_type_member(map: &Map<String, Value>, context: &Context, result: &mut ValidationResult) {
    let type_context = context.child("type");
    match map.get("type") {
        None => {
            result.error(
                "resource: type presence",
                "Resource object must have a `type` member",
                context,
            );
        }
        Some(Value::String(type_name)) => {
            if type_name.is_empty() {
                result.error(
                    "resource: type format",
                    "Resource `type` must be a non-empty string",
                    &type_context,
                );
            } else if !is_valid_member_format(type_name) {
                result.error(
                    "resource: type format",
                    format!("Resource type '{type_name}' is not a valid member name"),
                    &type_context,
                );
            } else {
                if !type_name.ends_with('s') {
                    result.warning(
                        "resource: type plural",
                        format!("Resource type '{type_name}' is recommended to be plural"),
                        &type_context,
                    );
                }
                result.detail(
                    "resource: type format",
                    format!("Resource type '{type_name}' is well-formed"),
                    &type_context,
                );
            }
        }
        Some(other) => {
            result.error(
                "resource: type string",
                format!("Resource `type` must be a string, got {}", json_type_name(other)),
                &type_context,
            );
        }
    }
}

fn validate_id_member(
    map: &Map<String, Value>,
    options: &ResourceOptions,
    context: &Context,
    result: &mut ValidationResult,
) {
    match map.get("id") {
        None => {
            if options.allow_missing_id {
                result.warning(
                    "resource: id presence",
                    "Resource object has no `id`; acceptable only for client-generated resources",
                    context,
                );
            } else {
                result.error(
                    "resource: id presence",
                    "Resource object must have an `id` member",
                    context,
                );
            }
        }
        Some(Value::String(_)) => {
            result.detail("resource: id presence", "Resource `id` is present", context);
        }
        Some(other) => {
            result.error(
                "resource: id string",
                format!("Resource `id` must be a string, got {}", json_type_name(other)),
                &context.child("id"),
            );
        }
    }
}

fn validate_attributes_member(
    attributes: &Value,
    context: &Context,
    result: &mut ValidationResult,
) {
    let attributes_context = context.child("attributes");
    let map = match attributes {
        Value::Object(map) => map,
        other => {
            result.error(
                "resource: attributes object",
                format!("`attributes` must be an object, got {}", json_type_name(other)),
                &attributes_context,
            );
            return;
        }
    };

    if map.is_empty() {
        result.warning(
            "resource: attributes empty",
            "`attributes` is present but empty",
            &attributes_context,
        );
        return;
    }

    for (key, value) in map {
        if key == "type" || key == "id" {
            result.error(
                "resource: attributes reserved",
                format!("`attributes` must not contain a '{key}' member"),
                &attributes_context,
            );
            continue;
        }
        result.merge(validate_member_name_str(key, &attributes_context.child(key)));

        // A common authoring mistake is placing relationship objects
        // under `attributes`
        if let Value::Object(value_map) = value {
            if RELATIONSHIP_MEMBERS
                .iter()
                .any(|member| value_map.contains_key(*member))
            {
                result.error(
                    "resource: attribute relationship shape",
                    format!(
                        "Attribute '{key}' looks like a relationship object \
                         (contains data/links/meta); relationships belong under `relationships`"
                    ),
                    &attributes_context.child(key),
                );
            }
        }
    }
}

fn validate_relationships_member(
    relationships: &Value,
    context: &Context,
    result: &mut ValidationResult,
) {
    let relationships_context = context.child("relationships");
    let map = match relationships {
        Value::Object(map) => map,
        other => {
            result.error(
                "resource: relationships object",
                format!("`relationships` must be an object, got {}", json_type_name(other)),
                &relationships_context,
            );
            return;
        }
    };

    if map.is_empty() {
        result.warning(
            "resource: relationships empty",
            "`relationships` is present but empty",
            &relationships_context,
        );
        return;
    }

    for (name, relationship) in map {
        let relationship_context = relationships_context.child(name);
        result.merge(validate_member_name_str(name, &relationship_context));
        result.merge(validate_relationship_object(relationship, &relationship_context));
    }
}

/// Validate one relationship object: it must be an object carrying at
/// least one of `data`, `links`, `meta`
pub fn validate_relationship_object(relationship: &Value, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();

    let map = match relationship {
        Value::Object(map) => map,
        other => {
            result.error(
                "relationship: object type",
                format!(
                    "Relationship must be an object, got {}",
                    json_type_name(other)
                ),
                context,
            );
            return result;
        }
    };

    if !RELATIONSHIP_MEMBERS
        .iter()
        .any(|member| map.contains_key(*member))
    {
        result.error(
            "relationship: members",
            "Relationship object must contain at least one of `data`, `links`, `meta`",
            context,
        );
    }

    if let Some(data) = map.get("data") {
        validate_relationship_data(data, &context.child("data"), &mut result);
    }
    if let Some(links) = map.get("links") {
        validate_relationship_links(links, &context.child("links"), &mut result);
    }
    if let Some(meta) = map.get("meta") {
        validate_meta_member(meta, &context.child("meta"), &mut result);
    }

    for key in map.keys() {
        if !RELATIONSHIP_MEMBERS.contains(&key.as_str()) {
            result.warning(
                "relationship: unknown member",
                format!("Relationship object contains unknown member '{key}'"),
                context,
            );
        }
    }

    result
}

fn validate_relationship_data(data: &Value, context: &Context, result: &mut ValidationResult) {
    match data {
        // Null linkage means an empty to-one relationship
        Value::Null => {
            result.detail(
                "relationship: data",
                "Empty to-one relationship (`data` is null)",
                context,
            );
        }
        Value::Object(_) => {
            result.merge(validate_resource_identifier(data, context));
        }
        Value::Array(identifiers) => {
            for (index, identifier) in identifiers.iter().enumerate() {
                result.merge(validate_resource_identifier(identifier, &context.index(index)));
            }
        }
        other => {
            result.error(
                "relationship: data",
                format!(
                    "Relationship `data` must be null, a resource identifier or an array \
                     of resource identifiers, got {}",
                    json_type_name(other)
                ),
                context,
            );
        }
    }
}

fn validate_relationship_links(links: &Value, context: &Context, result: &mut ValidationResult) {
    let map = match links {
        Value::Object(map) => map,
        other => {
            result.error(
                "relationship: links object",
                format!(
                    "Relationship `links` must be an object, got {}",
                    json_type_name(other)
                ),
                context,
            );
            return;
        }
    };

    if map.is_empty() {
        result.warning(
            "relationship: links empty",
            "Relationship `links` is present but empty",
            context,
        );
        return;
    }

    if !RELATIONSHIP_LINKS
        .iter()
        .any(|link| map.contains_key(*link))
    {
        result.error(
            "relationship: links members",
            "Relationship `links` must contain at least one of `self`, `related` \
             or a pagination link",
            context,
        );
    }

    for (name, value) in map {
        if !RELATIONSHIP_LINKS.contains(&name.as_str()) {
            result.warning(
                "relationship: links unknown",
                format!("Relationship `links` contains unknown link '{name}'"),
                context,
            );
        }
        result.merge(validate_link_value(name, value, &context.child(name)));
    }
}

/// Validate a resource identifier (`{type, id}`, optional `meta`)
pub fn validate_resource_identifier(identifier: &Value, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();

    let map = match identifier {
        Value::Object(map) => map,
        other => {
            result.error(
                "resource-identifier: object type",
                format!(
                    "Resource identifier must be an object, got {}",
                    json_type_name(other)
                ),
                context,
            );
            return result;
        }
    };

    match map.get("type") {
        None => {
            result.error(
                "resource-identifier: type",
                "Resource identifier must have a `type` member",
                context,
            );
        }
        Some(Value::String(type_name)) => {
            if type_name.is_empty() || !is_valid_member_format(type_name) {
                result.error(
                    "resource-identifier: type",
                    format!("Resource identifier type '{type_name}' is not a valid member name"),
                    &context.child("type"),
                );
            }
        }
        Some(other) => {
            result.error(
                "resource-identifier: type",
                format!(
                    "Resource identifier `type` must be a string, got {}",
                    json_type_name(other)
                ),
                &context.child("type"),
            );
        }
    }

    match map.get("id") {
        None => {
            result.error(
                "resource-identifier: id",
                "Resource identifier must have an `id` member",
                context,
            );
        }
        Some(Value::String(_)) => {}
        Some(other) => {
            result.error(
                "resource-identifier: id",
                format!(
                    "Resource identifier `id` must be a string, got {}",
                    json_type_name(other)
                ),
                &context.child("id"),
            );
        }
    }

    if let Some(meta) = map.get("meta") {
        validate_meta_member(meta, &context.child("meta"), &mut result);
    }

    for key in map.keys() {
        if !RESOURCE_IDENTIFIER_MEMBERS.contains(&key.as_str()) {
            result.warning(
                "resource-identifier: unknown member",
                format!("Resource identifier contains unknown member '{key}'"),
                context,
            );
        }
    }

    result
}

fn validate_resource_links_member(links: &Value, context: &Context, result: &mut ValidationResult) {
    let links_context = context.child("links");
    let map = match links {
        Value::Object(map) => map,
        other => {
            result.error(
                "resource: links object",
                format!("`links` must be an object, got {}", json_type_name(other)),
                &links_context,
            );
            return;
        }
    };

    if map.is_empty() {
        result.warning(
            "resource: links empty",
            "`links` is present but empty",
            &links_context,
        );
        return;
    }

    for (name, value) in map {
        // Custom link names are allowed but still follow the
        // member-name grammar
        if name != "self" && name != "related" && !RELATIONSHIP_LINKS.contains(&name.as_str()) {
            result.merge(validate_member_name_str(name, &links_context.child(name)));
        }
        result.merge(validate_link_value(name, value, &links_context.child(name)));
    }
}

/// Validate a link value: a URL string, `null`, or a `{href, meta?}`
/// link object
pub fn validate_link_value(name: &str, value: &Value, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();

    match value {
        // Pagination links use null to mean "no such page"
        Value::Null => {
            result.detail(
                "link: value",
                format!("Link '{name}' is null"),
                context,
            );
        }
        Value::String(_) => {
            if let Some(reason) = url_validation_error(value) {
                result.error(
                    "link: url",
                    format!("Link '{name}' is not a valid URL: {reason}"),
                    context,
                );
            }
        }
        Value::Object(map) => {
            match map.get("href") {
                None => {
                    result.error(
                        "link: href",
                        format!("Link object '{name}' must have an `href` member"),
                        context,
                    );
                }
                Some(href) => {
                    if let Some(reason) = url_validation_error(href) {
                        result.error(
                            "link: url",
                            format!("Link '{name}' href is not a valid URL: {reason}"),
                            &context.child("href"),
                        );
                    }
                }
            }
            if let Some(meta) = map.get("meta") {
                validate_meta_member(meta, &context.child("meta"), &mut result);
            }
            for key in map.keys() {
                if !LINK_OBJECT_MEMBERS.contains(&key.as_str()) {
                    result.warning(
                        "link: unknown member",
                        format!("Link object '{name}' contains unknown member '{key}'"),
                        context,
                    );
                }
            }
        }
        other => {
            result.error(
                "link: value",
                format!(
                    "Link '{name}' must be a URL string, a link object or null, got {}",
                    json_type_name(other)
                ),
                context,
            );
        }
    }

    result
}

/// Validate a `meta` member: an object whose keys follow the
/// member-name grammar
pub(crate) fn validate_meta_member(meta: &Value, context: &Context, result: &mut ValidationResult) {
    let map = match meta {
        Value::Object(map) => map,
        other => {
            result.error(
                "meta: object type",
                format!("`meta` must be an object, got {}", json_type_name(other)),
                context,
            );
            return;
        }
    };

    for key in map.keys() {
        result.merge(validate_member_name_str(key, &context.child(key)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_tests(result: &ValidationResult) -> Vec<&str> {
        result.errors().iter().map(|f| f.test.as_str()).collect()
    }

    fn warning_tests(result: &ValidationResult) -> Vec<&str> {
        result.warnings().iter().map(|f| f.test.as_str()).collect()
    }

    #[test]
    fn test_minimal_resource_is_valid() {
        let resource = json!({"type": "articles", "id": "1"});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::new("data"));
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_non_object_inputs_rejected_outright() {
        for input in [json!(null), json!([]), json!("articles"), json!(3)] {
            let result =
                validate_resource_object(&input, &ResourceOptions::default(), &Context::root());
            assert_eq!(error_tests(&result), vec!["resource: object type"]);
        }
    }

    #[test]
    fn test_type_failures_do_not_stop_id_validation() {
        let resource = json!({"type": 12});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(error_tests(&result).contains(&"resource: type string"));
        assert!(error_tests(&result).contains(&"resource: id presence"));
    }

    #[test]
    fn test_type_format() {
        let resource = json!({"type": "Articles!", "id": "1"});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(error_tests(&result).contains(&"resource: type format"));
    }

    #[test]
    fn test_missing_id_downgrades_with_allow_missing_id() {
        let resource = json!({"type": "articles"});
        let options = ResourceOptions {
            allow_missing_id: true,
        };
        let result = validate_resource_object(&resource, &options, &Context::root());
        assert!(result.is_valid());
        assert!(warning_tests(&result).contains(&"resource: id presence"));
    }

    #[test]
    fn test_attributes_must_not_contain_type_or_id() {
        let resource = json!({
            "type": "articles",
            "id": "1",
            "attributes": {"type": "x", "title": "y"}
        });
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(error_tests(&result).contains(&"resource: attributes reserved"));
    }

    #[test]
    fn test_relationship_shaped_attribute_flagged() {
        let resource = json!({
            "type": "articles",
            "id": "1",
            "attributes": {
                "author": {"data": {"type": "people", "id": "9"}}
            }
        });
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::new("data"));
        assert!(error_tests(&result).contains(&"resource: attribute relationship shape"));
        let finding = result
            .errors()
            .iter()
            .find(|f| f.test == "resource: attribute relationship shape")
            .unwrap();
        assert_eq!(finding.context.as_deref(), Some("data.attributes.author"));
    }

    #[test]
    fn test_empty_relationships_is_a_warning_not_an_error() {
        let resource = json!({"type": "articles", "id": "1", "relationships": {}});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(result.is_valid());
        assert!(warning_tests(&result).contains(&"resource: relationships empty"));
    }

    #[test]
    fn test_empty_links_is_a_warning_not_an_error() {
        let resource = json!({"type": "articles", "id": "1", "links": {}});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(result.is_valid());
        assert!(warning_tests(&result).contains(&"resource: links empty"));
    }

    #[test]
    fn test_empty_relationship_object_fails() {
        let result = validate_relationship_object(&json!({}), &Context::root());
        assert!(!result.is_valid());
        assert!(result.errors()[0]
            .message
            .contains("must contain at least one of"));
    }

    #[test]
    fn test_relationship_data_variants() {
        assert!(validate_relationship_object(&json!({"data": null}), &Context::root()).is_valid());
        assert!(validate_relationship_object(
            &json!({"data": {"type": "people", "id": "9"}}),
            &Context::root()
        )
        .is_valid());
        assert!(validate_relationship_object(
            &json!({"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]}),
            &Context::root()
        )
        .is_valid());

        let result =
            validate_relationship_object(&json!({"data": "people/9"}), &Context::root());
        assert!(error_tests(&result).contains(&"relationship: data"));
    }

    #[test]
    fn test_relationship_identifier_array_contexts_are_indexed() {
        let result = validate_relationship_object(
            &json!({"data": [{"type": "tags", "id": "1"}, {"type": "tags"}]}),
            &Context::new("data[0].relationships.tags"),
        );
        assert!(!result.is_valid());
        assert_eq!(
            result.errors()[0].context.as_deref(),
            Some("data[0].relationships.tags.data[1]")
        );
    }

    #[test]
    fn test_relationship_links_need_a_known_link() {
        let result = validate_relationship_object(
            &json!({"links": {"docs": "https://example.com"}}),
            &Context::root(),
        );
        assert!(error_tests(&result).contains(&"relationship: links members"));
    }

    #[test]
    fn test_link_object_grammar() {
        let ok = validate_link_value(
            "self",
            &json!({"href": "https://example.com/articles/1", "meta": {"count": 10}}),
            &Context::root(),
        );
        assert!(ok.is_valid());

        let missing_href = validate_link_value("self", &json!({"meta": {}}), &Context::root());
        assert!(error_tests(&missing_href).contains(&"link: href"));

        let bad_url = validate_link_value("self", &json!("not a url"), &Context::root());
        assert!(error_tests(&bad_url).contains(&"link: url"));

        let null_link = validate_link_value("prev", &json!(null), &Context::root());
        assert!(null_link.is_valid());
    }

    #[test]
    fn test_resource_identifier_requires_type_and_id() {
        let result = validate_resource_identifier(&json!({}), &Context::root());
        assert_eq!(
            error_tests(&result),
            vec!["resource-identifier: type", "resource-identifier: id"]
        );
    }

    #[test]
    fn test_unknown_members_warn() {
        let resource = json!({"type": "articles", "id": "1", "version": 3});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(result.is_valid());
        assert!(warning_tests(&result).contains(&"resource: unknown member"));
    }

    #[test]
    fn test_collection_contexts() {
        let resources = vec![
            json!({"type": "articles", "id": "1"}),
            json!({"type": "articles"}),
        ];
        let result = validate_resource_collection(
            &resources,
            &ResourceOptions::default(),
            &Context::new("data"),
        );
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].context.as_deref(), Some("data[1]"));
    }

    #[test]
    fn test_shape_predicate() {
        assert!(is_resource_object_shape(&json!({"type": "articles", "id": "1"})));
        assert!(is_resource_object_shape(&json!({"type": "articles"})));
        assert!(!is_resource_object_shape(&json!({"id": "1"})));
        assert!(!is_resource_object_shape(&json!({"type": 4})));
        assert!(!is_resource_object_shape(&json!({"type": "articles", "id": 1})));
        assert!(!is_resource_object_shape(&json!([])));
    }

    #[test]
    fn test_meta_keys_follow_member_grammar() {
        let resource = json!({"type": "articles", "id": "1", "meta": {"Bad_Key": 1}});
        let result =
            validate_resource_object(&resource, &ResourceOptions::default(), &Context::root());
        assert!(error_tests(&result).contains(&"member-name: format"));
    }

    #[test]
    fn test_idempotent() {
        let resource = json!({"type": "articles", "attributes": {"a--b": 1}});
        let options = ResourceOptions::default();
        let first = validate_resource_object(&resource, &options, &Context::new("data"));
        let second = validate_resource_object(&resource, &options, &Context::new("data"));
        assert_eq!(first, second);
    }
}
