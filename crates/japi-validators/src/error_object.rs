//! Error object grammar and RFC 6901 JSON Pointers
//!
//! Validates the top-level `errors` member: a non-empty array of
//! error objects, each restricted to the exact allowed-member set
//! (`id`, `links`, `status`, `code`, `title`, `detail`, `source`,
//! `meta`). The `status` and JSON Pointer grammars are specification
//! constants and are preserved bit-for-bit.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::member_name::validate_member_name_str;
use crate::members::{ERROR_MEMBERS, ERROR_SOURCE_MEMBERS};
use crate::resource::{validate_link_value, validate_meta_member};
use crate::result::{json_type_name, Context, ValidationResult};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static STATUS_RE: OnceLock<Regex> = OnceLock::new();

fn status_re() -> &'static Regex {
    STATUS_RE.get_or_init(|| Regex::new(r"^\d{3}$").expect("status pattern compiles"))
}

/// Validate the top-level `errors` member: a non-empty array of error
/// objects
pub fn validate_errors_member(errors: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();
    let context = Context::new("errors");

    let items = match errors {
        Value::Array(items) => items,
        other => {
            result.error(
                "errors: array type",
                format!("`errors` must be an array, got {}", json_type_name(other)),
                &context,
            );
            return result;
        }
    };

    if items.is_empty() {
        result.error(
            "errors: non-empty",
            "`errors` must be a non-empty array",
            &context,
        );
        return result;
    }

    for (index, item) in items.iter().enumerate() {
        result.merge(validate_error_object(item, &context.index(index)));
    }
    result
}

/// Validate a single error object against the exact allowed-member set
pub fn validate_error_object(error: &Value, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();

    let map = match error {
        Value::Object(map) => map,
        other => {
            result.error(
                "error: object type",
                format!("Error must be an object, got {}", json_type_name(other)),
                context,
            );
            return result;
        }
    };

    for key in map.keys() {
        if !ERROR_MEMBERS.contains(&key.as_str()) {
            result.error(
                "error: unknown member",
                format!("Error object contains disallowed member '{key}'"),
                context,
            );
        }
    }

    for member in ["id", "code", "title", "detail"] {
        if let Some(value) = map.get(member) {
            if !value.is_string() {
                result.error(
                    "error: member string",
                    format!(
                        "Error `{member}` must be a string, got {}",
                        json_type_name(value)
                    ),
                    &context.child(member),
                );
            }
        }
    }

    if let Some(status) = map.get("status") {
        validate_status_member(status, &context.child("status"), &mut result);
    }
    if let Some(links) = map.get("links") {
        validate_error_links(links, &context.child("links"), &mut result);
    }
    if let Some(source) = map.get("source") {
        validate_error_source(source, &context.child("source"), &mut result);
    }
    if let Some(meta) = map.get("meta") {
        validate_meta_member(meta, &context.child("meta"), &mut result);
    }

    if result.is_valid() {
        result.detail("error: structure", "Error object is well-formed", context);
    }
    result
}

fn validate_status_member(status: &Value, context: &Context, result: &mut ValidationResult) {
    match status {
        Value::String(s) => {
            if !status_re().is_match(s) {
                result.error(
                    "error: status format",
                    format!("Error `status` must be a three-digit string, got '{s}'"),
                    context,
                );
            }
        }
        other => {
            // HTTP status codes are strings in error objects, even
            // though they are numbers on the wire
            result.error(
                "error: status string",
                format!(
                    "Error `status` must be a string, got {}",
                    json_type_name(other)
                ),
                context,
            );
        }
    }
}

fn validate_error_links(links: &Value, context: &Context, result: &mut ValidationResult) {
    let map = match links {
        Value::Object(map) => map,
        other => {
            result.error(
                "error: links object",
                format!(
                    "Error `links` must be an object, got {}",
                    json_type_name(other)
                ),
                context,
            );
            return;
        }
    };

    if map.is_empty() {
        result.warning("error: links empty", "Error `links` is present but empty", context);
        return;
    }

    for (name, value) in map {
        if name != "about" {
            result.merge(validate_member_name_str(name, &context.child(name)));
        }
        result.merge(validate_link_value(name, value, &context.child(name)));
    }
}

fn validate_error_source(source: &Value, context: &Context, result: &mut ValidationResult) {
    let map = match source {
        Value::Object(map) => map,
        other => {
            result.error(
                "error-source: object type",
                format!(
                    "Error `source` must be an object, got {}",
                    json_type_name(other)
                ),
                context,
            );
            return;
        }
    };

    if !ERROR_SOURCE_MEMBERS
        .iter()
        .any(|member| map.contains_key(*member))
    {
        result.error(
            "error-source: members",
            "Error `source` must contain at least one of `pointer`, `parameter`",
            context,
        );
    }

    if let Some(pointer) = map.get("pointer") {
        let pointer_context = context.child("pointer");
        match pointer {
            Value::String(s) => {
                result.merge(validate_json_pointer(s, &pointer_context));
            }
            other => {
                result.error(
                    "json-pointer: string",
                    format!(
                        "`source.pointer` must be a string, got {}",
                        json_type_name(other)
                    ),
                    &pointer_context,
                );
            }
        }
    }

    if let Some(parameter) = map.get("parameter") {
        if !parameter.is_string() {
            result.error(
                "error-source: parameter",
                format!(
                    "`source.parameter` must be a string, got {}",
                    json_type_name(parameter)
                ),
                &context.child("parameter"),
            );
        }
    }

    for key in map.keys() {
        if !ERROR_SOURCE_MEMBERS.contains(&key.as_str()) {
            result.warning(
                "error-source: unknown member",
                format!("Error `source` contains unknown member '{key}'"),
                context,
            );
        }
    }
}

/// Validate an RFC 6901 JSON Pointer: empty or starting with `/`, with
/// every `~` followed by `0` or `1`
pub fn validate_json_pointer(pointer: &str, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();

    if pointer.is_empty() {
        // The empty string references the whole document
        result.detail(
            "json-pointer: format",
            "Empty JSON Pointer references the whole document",
            context,
        );
        return result;
    }

    if !pointer.starts_with('/') {
        result.error(
            "json-pointer: leading slash",
            format!("JSON Pointer '{pointer}' must start with '/' or be empty"),
            context,
        );
        return result;
    }

    let bytes = pointer.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte == b'~' {
            match bytes.get(i + 1) {
                Some(b'0') | Some(b'1') => {}
                _ => {
                    result.error(
                        "json-pointer: escape",
                        format!(
                            "JSON Pointer '{pointer}' contains an invalid escape; \
                             '~' must be followed by '0' or '1'"
                        ),
                        context,
                    );
                    return result;
                }
            }
        }
    }

    result.detail(
        "json-pointer: format",
        format!("JSON Pointer '{pointer}' is well-formed"),
        context,
    );
    result
}
