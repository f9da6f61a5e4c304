//! Content negotiation: Content-Type and Accept header grammar
//!
//! The JSON:API media type is `application/vnd.api+json`, optionally
//! parameterized by `ext` and `profile` (each a quoted,
//! space-separated list of URIs). Any other media type parameter is
//! unrecognized: it warns rather than fails, matching how clients are
//! expected to behave.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::result::{Context, ValidationResult};
use crate::url_format::is_valid_url;
use std::collections::BTreeMap;

/// The JSON:API media type
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Media-type parameters JSON:API defines
const KNOWN_PARAMETERS: &[&str] = &["ext", "profile"];

/// Validate a response `Content-Type` header value
pub fn validate_content_type_header(value: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let context = Context::new("headers").child("content-type");
    validate_media_type(value, "content-type", &context, &mut result);
    result
}

/// Validate a request `Accept` header value; at least one media range
/// must be the JSON:API media type
pub fn validate_accept_header(value: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let context = Context::new("headers").child("accept");

    let ranges: Vec<&str> = value.split(',').map(str::trim).filter(|r| !r.is_empty()).collect();
    let jsonapi_ranges: Vec<&str> = ranges
        .iter()
        .copied()
        .filter(|range| media_type_of(range).eq_ignore_ascii_case(JSONAPI_MEDIA_TYPE))
        .collect();

    if jsonapi_ranges.is_empty() {
        result.error(
            "accept: media type",
            format!("Accept header '{value}' does not include {JSONAPI_MEDIA_TYPE}"),
            &context,
        );
        return result;
    }

    for range in jsonapi_ranges {
        validate_media_type(range, "accept", &context, &mut result);
    }
    result
}

/// Validate both negotiation headers of an exchange. Header names are
/// matched case-insensitively since servers differ in casing.
pub fn validate_content_negotiation(headers: &BTreeMap<String, String>) -> ValidationResult {
    let mut result = ValidationResult::new();

    match header_value(headers, "content-type") {
        Some(content_type) => {
            result.merge(validate_content_type_header(content_type));
        }
        None => {
            result.error(
                "content-type: presence",
                format!("Response carries no Content-Type header; {JSONAPI_MEDIA_TYPE} expected"),
                &Context::new("headers"),
            );
        }
    }

    match header_value(headers, "accept") {
        Some(accept) => {
            result.merge(validate_accept_header(accept));
        }
        None => {
            result.detail(
                "accept: presence",
                "No Accept header was sent with the request",
                &Context::new("headers"),
            );
        }
    }

    result
}

fn header_value<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

fn media_type_of(value: &str) -> &str {
    value.split(';').next().unwrap_or("").trim()
}

fn validate_media_type(
    value: &str,
    header: &str,
    context: &Context,
    result: &mut ValidationResult,
) {
    let mut parts = value.split(';');
    let media_type = parts.next().unwrap_or("").trim();

    if !media_type.eq_ignore_ascii_case(JSONAPI_MEDIA_TYPE) {
        result.error(
            &format!("{header}: media type"),
            format!("Media type must be {JSONAPI_MEDIA_TYPE}, got '{media_type}'"),
            context,
        );
        return;
    }
    result.detail(
        &format!("{header}: media type"),
        format!("Media type is {JSONAPI_MEDIA_TYPE}"),
        context,
    );

    for parameter in parts {
        let parameter = parameter.trim();
        if parameter.is_empty() {
            continue;
        }
        let (name, raw_value) = match parameter.split_once('=') {
            Some((name, raw_value)) => (name.trim(), raw_value.trim()),
            None => {
                result.error(
                    &format!("{header}: parameter form"),
                    format!("Media type parameter '{parameter}' is not of the form name=value"),
                    context,
                );
                continue;
            }
        };

        if !KNOWN_PARAMETERS.contains(&name) {
            result.warning(
                &format!("{header}: unknown parameter"),
                format!("Media type parameter '{name}' is not defined by JSON:API"),
                context,
            );
            continue;
        }

        // ext/profile carry a quoted, space-separated URI list; each
        // entry must be a valid URL
        let unquoted = raw_value.trim_matches('"');
        let uris: Vec<&str> = unquoted.split_whitespace().collect();
        if uris.is_empty() {
            result.error(
                &format!("{header}: {name} parameter"),
                format!("Media type parameter '{name}' must list at least one URI"),
                context,
            );
            continue;
        }
        for uri in uris {
            if !is_valid_absolute_uri(uri) {
                result.error(
                    &format!("{header}: {name} parameter"),
                    format!("Media type parameter '{name}' value '{uri}' is not a valid URI"),
                    context,
                );
            }
        }
    }
}

/// Extension/profile URIs must be absolute, not relative references
fn is_valid_absolute_uri(value: &str) -> bool {
    is_valid_url(value) && value.contains(':')
}
