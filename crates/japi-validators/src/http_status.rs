//! HTTP status / method / body coherence
//!
//! A status code is validated against the shape of the response body
//! and the request method: success responses must not carry an
//! `errors` member, 204 must carry no body at all, and failure
//! responses are expected (advisory only) to explain themselves with
//! an `errors` array.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::result::{Context, ValidationResult};
use serde_json::Value;

/// Validate the coherence of status code, request method and body shape
pub fn validate_http_status(status: u16, method: &str, body: Option<&Value>) -> ValidationResult {
    let mut result = ValidationResult::new();
    let context = Context::new("status");

    if !(100..=599).contains(&status) {
        result.error(
            "http-status: range",
            format!("HTTP status {status} is outside the valid 100-599 range"),
            &context,
        );
        return result;
    }

    let method = method.to_ascii_uppercase();
    let has_errors = body
        .and_then(Value::as_object)
        .is_some_and(|map| map.contains_key("errors"));
    let has_data = body
        .and_then(Value::as_object)
        .is_some_and(|map| map.contains_key("data"));

    match status {
        100..=199 => {
            result.detail(
                "http-status: informational",
                format!("Status {status} is informational; no body checks apply"),
                &context,
            );
        }
        200..=299 => {
            if has_errors {
                result.error(
                    "http-status: success with errors",
                    format!("Status {status} indicates success but the body carries `errors`"),
                    &context,
                );
            }
            if status == 204 && body.is_some_and(|b| !b.is_null()) {
                result.error(
                    "http-status: no content body",
                    "Status 204 must not carry a response body",
                    &context,
                );
            }
            if status == 201 && method == "POST" && !has_data {
                result.warning(
                    "http-status: created data",
                    "Status 201 after POST should return the created resource in `data`",
                    &context,
                );
            }
            if status == 200 && method == "GET" && body.is_none() {
                result.warning(
                    "http-status: empty body",
                    "Status 200 for GET should carry a response body",
                    &context,
                );
            }
            if status == 201 && method == "GET" {
                result.warning(
                    "http-status: method coherence",
                    "Status 201 (created) is not expected for a GET request",
                    &context,
                );
            }
        }
        300..=399 => {
            result.detail(
                "http-status: redirect",
                format!("Status {status} is a redirect; document checks apply to the final response"),
                &context,
            );
        }
        400..=499 => {
            if !has_errors {
                result.warning(
                    "http-status: client error body",
                    format!("Status {status} should explain the failure with an `errors` array"),
                    &context,
                );
            }
        }
        _ => {
            // A 5xx without errors is sloppy but servers in distress
            // may not produce JSON:API bodies; advisory only
            if !has_errors {
                result.warning(
                    "http-status: server error body",
                    format!("Status {status} response lacks an `errors` array"),
                    &context,
                );
            }
        }
    }

    if result.is_valid() {
        result.detail(
            "http-status: coherence",
            format!("Status {status} is coherent with method {method}"),
            &context,
        );
    }
    result
}
