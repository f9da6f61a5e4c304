//! The top-level `jsonapi` object
//!
//! Validates `version` (must be `"1.0"` or `"1.1"`), `meta`, `ext`
//! (extension-name to string|object map) and `profile` (URL or array
//! of URLs). Unrecognized members are treated as extensions and
//! reported as warnings rather than errors.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::member_name::is_valid_member_format;
use crate::members::JSONAPI_OBJECT_MEMBERS;
use crate::resource::validate_meta_member;
use crate::result::{json_type_name, Context, ValidationResult};
use crate::url_format::is_valid_url;
use serde_json::Value;

const KNOWN_VERSIONS: &[&str] = &["1.0", "1.1"];

/// Validate the top-level `jsonapi` object
pub fn validate_jsonapi_object(jsonapi: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();
    let context = Context::new("jsonapi");

    let map = match jsonapi {
        Value::Object(map) => map,
        other => {
            result.error(
                "jsonapi: object type",
                format!(
                    "`jsonapi` must be an object, got {}",
                    json_type_name(other)
                ),
                &context,
            );
            return result;
        }
    };

    if let Some(version) = map.get("version") {
        let version_context = context.child("version");
        match version {
            Value::String(v) if KNOWN_VERSIONS.contains(&v.as_str()) => {
                result.detail(
                    "jsonapi: version",
                    format!("JSON:API version '{v}'"),
                    &version_context,
                );
            }
            Value::String(v) => {
                result.error(
                    "jsonapi: version",
                    format!("`jsonapi.version` must be \"1.0\" or \"1.1\", got '{v}'"),
                    &version_context,
                );
            }
            other => {
                result.error(
                    "jsonapi: version",
                    format!(
                        "`jsonapi.version` must be a string, got {}",
                        json_type_name(other)
                    ),
                    &version_context,
                );
            }
        }
    }

    if let Some(ext) = map.get("ext") {
        validate_ext_member(ext, &context.child("ext"), &mut result);
    }
    if let Some(profile) = map.get("profile") {
        validate_profile_member(profile, &context.child("profile"), &mut result);
    }
    if let Some(meta) = map.get("meta") {
        validate_meta_member(meta, &context.child("meta"), &mut result);
    }

    for key in map.keys() {
        if !JSONAPI_OBJECT_MEMBERS.contains(&key.as_str()) {
            result.warning(
                "jsonapi: unknown member",
                format!("`jsonapi` member '{key}' is not recognized; treating it as an extension"),
                &context,
            );
        }
    }

    result
}

fn validate_ext_member(ext: &Value, context: &Context, result: &mut ValidationResult) {
    let map = match ext {
        Value::Object(map) => map,
        other => {
            result.error(
                "jsonapi: ext object",
                format!(
                    "`jsonapi.ext` must be an object mapping extension names, got {}",
                    json_type_name(other)
                ),
                context,
            );
            return;
        }
    };

    for (name, value) in map {
        if !is_extension_name(name) {
            result.error(
                "jsonapi: ext name",
                format!(
                    "Extension name '{name}' must be a URL, a reverse-domain token \
                     or a member name"
                ),
                context,
            );
        }
        match value {
            Value::String(_) | Value::Object(_) => {}
            other => {
                result.error(
                    "jsonapi: ext value",
                    format!(
                        "Extension '{name}' must map to a string or object, got {}",
                        json_type_name(other)
                    ),
                    &context.child(name),
                );
            }
        }
    }
}

fn validate_profile_member(profile: &Value, context: &Context, result: &mut ValidationResult) {
    match profile {
        Value::String(url) => {
            if !is_valid_url(url) {
                result.error(
                    "jsonapi: profile",
                    format!("`jsonapi.profile` '{url}' is not a valid URL"),
                    context,
                );
            }
        }
        Value::Array(urls) => {
            for (index, url) in urls.iter().enumerate() {
                match url {
                    Value::String(u) if is_valid_url(u) => {}
                    Value::String(u) => {
                        result.error(
                            "jsonapi: profile",
                            format!("Profile entry '{u}' is not a valid URL"),
                            &context.index(index),
                        );
                    }
                    other => {
                        result.error(
                            "jsonapi: profile",
                            format!(
                                "Profile entries must be URL strings, got {}",
                                json_type_name(other)
                            ),
                            &context.index(index),
                        );
                    }
                }
            }
        }
        other => {
            result.error(
                "jsonapi: profile",
                format!(
                    "`jsonapi.profile` must be a URL or an array of URLs, got {}",
                    json_type_name(other)
                ),
                context,
            );
        }
    }
}

/// Extension names may be URLs, reverse-domain tokens
/// (`com.example.extension`) or plain member names
fn is_extension_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    if name.contains("://") && is_valid_url(name) {
        return true;
    }
    if is_reverse_domain_token(name) {
        return true;
    }
    is_valid_member_format(name)
}

fn is_reverse_domain_token(name: &str) -> bool {
    let segments: Vec<&str> = name.split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|segment| {
            !segment.is_empty()
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                && segment.starts_with(|c: char| c.is_ascii_alphanumeric())
        })
}
