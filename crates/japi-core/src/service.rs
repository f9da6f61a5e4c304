//! Validation orchestrator
//!
//! [`ValidationService`] runs the whole validator family over one HTTP
//! exchange and merges their results in a fixed order, so a given
//! exchange always produces the same finding sequence. Terminal
//! failures (network, non-JSON body) never surface as conformance
//! findings; they become [`RunOutcome::Failed`].
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::client::ApiClient;
use crate::exchange::{HttpExchange, RequestConfig};
use japi_validators::{
    validate_content_negotiation, validate_document, validate_fieldset_syntax,
    validate_http_status, validate_pagination, validate_sparse_fieldsets, validate_url_structure,
    Context, ValidationResult,
};
use serde::{Deserialize, Serialize};

/// Outcome of one validation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The exchange was captured and every applicable validator ran
    Completed(ValidationResult),
    /// The run stopped before validation could happen
    Failed { message: String },
}

impl RunOutcome {
    /// The merged result, when the run completed
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            RunOutcome::Completed(result) => Some(result),
            RunOutcome::Failed { .. } => None,
        }
    }
}

/// Drives the validator family over exchanges fetched by an [`ApiClient`]
pub struct ValidationService<C> {
    client: C,
}

impl<C: ApiClient> ValidationService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Fetch the configured exchange and validate it
    pub async fn run_validation(&self, config: &RequestConfig) -> RunOutcome {
        tracing::info!(url = %config.url, method = %config.method, "starting validation run");
        match self.client.fetch(config).await {
            Ok(exchange) => {
                let result = validate_exchange(&exchange);
                tracing::info!(
                    valid = result.is_valid(),
                    errors = result.errors().len(),
                    warnings = result.warnings().len(),
                    "validation run completed"
                );
                RunOutcome::Completed(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "validation run failed before validation");
                RunOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

/// Validate one captured exchange.
///
/// Pure and deterministic. Results merge in a fixed order: document
/// (resource and `jsonapi` checks run inside it), query, pagination,
/// URL structure, content negotiation, HTTP status. Body-dependent
/// validators are skipped when the response carried no JSON body; the
/// request-side checks always run.
pub fn validate_exchange(exchange: &HttpExchange) -> ValidationResult {
    let mut merged = ValidationResult::new();

    match &exchange.body {
        Some(body) => {
            merged.merge(validate_document(body));
            merged.merge(validate_fieldset_syntax(&exchange.request_params));
            merged.merge(validate_sparse_fieldsets(body, &exchange.request_params));
            merged.merge(validate_pagination(body, &exchange.url, &exchange.request_params));
        }
        None => {
            merged.detail(
                "document: skipped",
                "Response carried no body; document checks do not apply",
                &Context::root(),
            );
        }
    }

    merged.merge(validate_url_structure(&exchange.url));

    // A bodyless response without a Content-Type header is fine (204);
    // negotiation only applies once either is present
    if exchange.body.is_some() || exchange.header("content-type").is_some() {
        merged.merge(validate_content_negotiation(&exchange.headers));
    } else {
        merged.detail(
            "content-negotiation: skipped",
            "No body and no Content-Type header; negotiation checks do not apply",
            &Context::new("headers"),
        );
    }

    merged.merge(validate_http_status(
        exchange.status,
        &exchange.method,
        exchange.body.as_ref(),
    ));

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn exchange(status: u16, body: Option<serde_json::Value>) -> HttpExchange {
        HttpExchange {
            status,
            method: "GET".to_string(),
            url: "https://example.com/articles".to_string(),
            request_params: BTreeMap::new(),
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "application/vnd.api+json".to_string(),
            )]),
            body,
        }
    }

    #[test]
    fn test_clean_exchange_validates() {
        let body = json!({
            "data": [{"type": "articles", "id": "1", "attributes": {"title": "t"}}]
        });
        let result = validate_exchange(&exchange(200, Some(body)));
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn test_bodyless_204_skips_document_and_negotiation() {
        let mut ex = exchange(204, None);
        ex.method = "DELETE".to_string();
        ex.headers.clear();
        let result = validate_exchange(&ex);
        assert!(result.is_valid(), "{:?}", result.errors());

        let detail_tests: Vec<&str> =
            result.details().iter().map(|f| f.test.as_str()).collect();
        assert!(detail_tests.contains(&"document: skipped"));
        assert!(detail_tests.contains(&"content-negotiation: skipped"));
    }

    #[test]
    fn test_finding_order_is_stable() {
        let body = json!({
            "data": [{"type": "articles", "id": "1", "attributes": {"title": "t"}}],
            "errors": []
        });
        let mut ex = exchange(200, Some(body));
        ex.request_params.insert("fields[articles]".to_string(), "missing".to_string());

        let first = validate_exchange(&ex);
        let second = validate_exchange(&ex);
        assert_eq!(first, second);

        // Document findings come before query findings, which come
        // before status findings
        let tests: Vec<&str> = first
            .errors()
            .iter()
            .chain(first.warnings())
            .map(|f| f.test.as_str())
            .collect();
        let document_pos = tests
            .iter()
            .position(|t| t.starts_with("document:"))
            .expect("document finding");
        let fieldset_pos = tests
            .iter()
            .position(|t| t.starts_with("fieldset:"))
            .expect("fieldset finding");
        let status_pos = tests
            .iter()
            .position(|t| t.starts_with("http-status:"))
            .expect("status finding");
        assert!(document_pos < fieldset_pos && fieldset_pos < status_pos);
    }

    #[test]
    fn test_run_outcome_serializes_with_status_tag() {
        let outcome = RunOutcome::Failed {
            message: "connection refused".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["message"], "connection refused");
    }
}
