//! Pagination link and meta correctness
//!
//! Given a collection response, the original request URL and the
//! request's query parameters, checks that the pagination links the
//! server returned are present, well-formed, preserve non-page query
//! parameters, respect page boundaries, and stay consistent with the
//! requested page number/size. Non-collection responses are skipped
//! entirely.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::members::PAGINATION_LINKS;
use crate::result::{Context, ValidationResult};
use crate::url_format::url_validation_error;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Keys that select cursor-based pagination
const CURSOR_PARAMS: &[&str] = &["cursor", "before", "after"];

/// Meta members that convey a collection total
const TOTAL_COUNT_FIELDS: &[&str] = &["totalResources", "total", "totalCount", "count"];

/// Validate the pagination facet of one exchange
pub fn validate_pagination(
    document: &Value,
    original_url: &str,
    request_params: &BTreeMap<String, String>,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    let root = Context::root();

    let Some(data) = document.get("data").and_then(Value::as_array) else {
        result.detail(
            "pagination: skipped",
            "Response is not a collection; pagination checks do not apply",
            &root,
        );
        return result;
    };

    let page_params = page_params_of(request_params);
    let links = document.get("links").and_then(Value::as_object);
    let links_context = Context::new("links");

    // (a) presence: page params were sent, so the server should have
    // answered with pagination links
    let has_pagination_links = links.is_some_and(|map| {
        PAGINATION_LINKS
            .iter()
            .any(|name| matches!(map.get(*name), Some(v) if !v.is_null()))
    });
    if !page_params.is_empty() && !has_pagination_links {
        result.warning(
            "pagination: links presence",
            "Request used page[...] parameters but the response has no pagination links",
            &links_context,
        );
    }

    // (b) each pagination link (and self) must be a valid URL from the
    // same base as the request
    if let Some(links) = links {
        for name in ["first", "last", "prev", "next", "self"] {
            let Some(value) = links.get(name) else { continue };
            if value.is_null() {
                continue;
            }
            let link_context = links_context.child(name);
            let Some(url) = link_url_string(value) else {
                if let Some(reason) = url_validation_error(value) {
                    result.error(
                        "pagination: link url",
                        format!("Pagination link '{name}' is invalid: {reason}"),
                        &link_context,
                    );
                }
                continue;
            };
            if let Some(reason) = url_validation_error(&Value::String(url.to_string())) {
                result.error(
                    "pagination: link url",
                    format!("Pagination link '{name}' is invalid: {reason}"),
                    &link_context,
                );
                continue;
            }
            check_same_base(name, url, original_url, &link_context, &mut result);
        }

        // (c) non-page query parameters must survive into every
        // pagination link
        check_parameter_preservation(links, original_url, request_params, &mut result);

        // (d) boundary rules
        check_boundaries(data, links, &page_params, &links_context, &mut result);

        // (e) links.self page params should echo the request
        check_self_page_params(links, original_url, &page_params, &mut result);

        // (g) cursor pagination expects cursors echoed in prev/next
        check_cursor_echo(links, original_url, &page_params, &links_context, &mut result);
    }

    // (e) item count vs requested size, meta.page consistency
    check_consistency(document, data, &page_params, &mut result);

    // (f) meta completeness
    check_total_count(document, &mut result);

    if result.is_valid() {
        result.detail(
            "pagination: checks",
            format!("Pagination checks ran over {} collection items", data.len()),
            &root,
        );
    }
    result
}

/// Inner names of `page[...]` request parameters (`number`, `size`,
/// `cursor`, ...), percent-decoded
fn page_params_of(request_params: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut page_params = BTreeMap::new();
    for (key, value) in request_params {
        let decoded = percent_decode_str(key).decode_utf8_lossy();
        if let Some(inner) = decoded
            .strip_prefix("page[")
            .and_then(|rest| rest.strip_suffix(']'))
        {
            page_params.insert(inner.to_string(), value.clone());
        }
    }
    page_params
}

fn link_url_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(url) => Some(url),
        Value::Object(map) => map.get("href").and_then(Value::as_str),
        _ => None,
    }
}

/// Resolve a link against the original request URL so relative links
/// can be compared too
fn resolve_link(link: &str, original_url: &str) -> Option<Url> {
    if let Ok(url) = Url::parse(link) {
        return Some(url);
    }
    Url::parse(original_url).ok()?.join(link).ok()
}

fn check_same_base(
    name: &str,
    link: &str,
    original_url: &str,
    context: &Context,
    result: &mut ValidationResult,
) {
    let (Some(link_url), Ok(original)) = (resolve_link(link, original_url), Url::parse(original_url))
    else {
        return;
    };
    let same_origin = link_url.scheme() == original.scheme()
        && link_url.host_str() == original.host_str()
        && link_url.port_or_known_default() == original.port_or_known_default();
    if !same_origin || link_url.path() != original.path() {
        result.warning(
            "pagination: link base",
            format!(
                "Pagination link '{name}' ({link}) does not share the request's base URL \
                 ({original_url})"
            ),
            context,
        );
    }
}

fn query_map(url: &Url) -> BTreeMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn check_parameter_preservation(
    links: &Map<String, Value>,
    original_url: &str,
    request_params: &BTreeMap<String, String>,
    result: &mut ValidationResult,
) {
    // Everything the client sent apart from page[...] must come back
    // byte-for-byte in each pagination link
    let preserved: Vec<(String, &String)> = request_params
        .iter()
        .filter_map(|(key, value)| {
            let decoded = percent_decode_str(key).decode_utf8_lossy().into_owned();
            if decoded.starts_with("page[") {
                None
            } else {
                Some((decoded, value))
            }
        })
        .collect();
    if preserved.is_empty() {
        return;
    }

    for name in PAGINATION_LINKS {
        let Some(link) = links.get(*name).and_then(link_url_string) else {
            continue;
        };
        let Some(url) = resolve_link(link, original_url) else {
            continue;
        };
        let link_params = query_map(&url);
        let context = Context::new("links").child(name);

        for (key, value) in &preserved {
            match link_params.get(key) {
                None => {
                    result.error(
                        "pagination: parameter preserved",
                        format!("Pagination link '{name}' dropped the query parameter '{key}'"),
                        &context,
                    );
                }
                Some(link_value) if link_value != *value => {
                    result.warning(
                        "pagination: parameter changed",
                        format!(
                            "Pagination link '{name}' changed '{key}' from '{value}' \
                             to '{link_value}'"
                        ),
                        &context,
                    );
                }
                Some(_) => {}
            }
        }
    }
}

fn check_boundaries(
    data: &[Value],
    links: &Map<String, Value>,
    page_params: &BTreeMap<String, String>,
    links_context: &Context,
    result: &mut ValidationResult,
) {
    let has_link = |name: &str| matches!(links.get(name), Some(v) if !v.is_null());

    if page_params.get("number").map(String::as_str) == Some("1") && has_link("prev") {
        result.warning(
            "pagination: first page prev",
            "The first page should not have a `prev` link",
            &links_context.child("prev"),
        );
    }

    if let Some(size) = page_params.get("size").and_then(|s| s.parse::<usize>().ok()) {
        if data.len() < size && has_link("next") {
            result.warning(
                "pagination: short page next",
                format!(
                    "Response holds {} items, fewer than the requested page size {size}; \
                     a short page should not have a `next` link",
                    data.len()
                ),
                &links_context.child("next"),
            );
        }
    }

    if (has_link("prev") || has_link("next")) && (!has_link("first") || !has_link("last")) {
        result.warning(
            "pagination: first last presence",
            "`prev`/`next` links are present but `first`/`last` are not",
            links_context,
        );
    }
}

fn check_self_page_params(
    links: &Map<String, Value>,
    original_url: &str,
    page_params: &BTreeMap<String, String>,
    result: &mut ValidationResult,
) {
    if page_params.is_empty() {
        return;
    }
    let Some(self_url) = links
        .get("self")
        .and_then(link_url_string)
        .and_then(|link| resolve_link(link, original_url))
    else {
        return;
    };
    let self_params = query_map(&self_url);
    let context = Context::new("links").child("self");

    for (name, value) in page_params {
        let key = format!("page[{name}]");
        if self_params.get(&key) != Some(value) {
            result.warning(
                "pagination: self page params",
                format!(
                    "`links.self` does not reflect the requested {key}={value}"
                ),
                &context,
            );
        }
    }
}

fn check_consistency(
    document: &Value,
    data: &[Value],
    page_params: &BTreeMap<String, String>,
    result: &mut ValidationResult,
) {
    if let Some(size) = page_params.get("size").and_then(|s| s.parse::<usize>().ok()) {
        if data.len() > size {
            result.error(
                "pagination: page size exceeded",
                format!(
                    "Response holds {} items but page[size]={size} was requested",
                    data.len()
                ),
                &Context::new("data"),
            );
        }
    }

    let Some(meta_page) = document
        .get("meta")
        .and_then(|meta| meta.get("page"))
        .and_then(Value::as_object)
    else {
        return;
    };
    let meta_context = Context::new("meta").child("page");

    for (request_name, meta_name) in [("number", "number"), ("size", "size")] {
        let (Some(requested), Some(reported)) =
            (page_params.get(request_name), meta_page.get(meta_name))
        else {
            continue;
        };
        let reported = match reported {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => continue,
        };
        if &reported != requested {
            result.error(
                "pagination: meta mismatch",
                format!(
                    "meta.page.{meta_name} is {reported} but page[{request_name}]={requested} \
                     was requested"
                ),
                &meta_context.child(meta_name),
            );
        }
    }
}

fn check_total_count(document: &Value, result: &mut ValidationResult) {
    let meta = document.get("meta").and_then(Value::as_object);
    let meta_page = meta
        .and_then(|m| m.get("page"))
        .and_then(Value::as_object);

    let has_total = meta.is_some_and(|m| {
        TOTAL_COUNT_FIELDS.iter().any(|field| m.contains_key(*field))
    }) || meta_page.is_some_and(|m| {
        TOTAL_COUNT_FIELDS.iter().any(|field| m.contains_key(*field))
    });

    if !has_total {
        result.warning(
            "pagination: total count",
            "No total-count field (totalResources/total/totalCount/count) in meta",
            &Context::new("meta"),
        );
    }
}

fn check_cursor_echo(
    links: &Map<String, Value>,
    original_url: &str,
    page_params: &BTreeMap<String, String>,
    links_context: &Context,
    result: &mut ValidationResult,
) {
    let uses_cursors = page_params
        .keys()
        .any(|name| CURSOR_PARAMS.iter().any(|cursor| name.contains(cursor)));
    if !uses_cursors {
        return;
    }

    for name in ["prev", "next"] {
        let Some(link) = links.get(name).and_then(link_url_string) else {
            continue;
        };
        let Some(url) = resolve_link(link, original_url) else {
            continue;
        };
        let echoes_cursor = query_map(&url).keys().any(|key| {
            key.strip_prefix("page[")
                .and_then(|rest| rest.strip_suffix(']'))
                .is_some_and(|inner| CURSOR_PARAMS.iter().any(|cursor| inner.contains(cursor)))
        });
        if !echoes_cursor {
            result.warning(
                "pagination: cursor echo",
                format!(
                    "Cursor pagination was requested but link '{name}' carries no \
                     page cursor parameter"
                ),
                &links_context.child(name),
            );
        }
    }
}
