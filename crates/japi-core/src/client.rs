//! HTTP client abstraction and the reqwest-backed implementation
//!
//! The orchestrator talks to an [`ApiClient`] so tests can feed it
//! canned exchanges. [`HttpApiClient`] is the real thing: it performs
//! exactly one request per call (a conformance probe must observe the
//! server's first answer, so there is no retry layer) and captures the
//! response into an [`HttpExchange`].
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::error::{Error, Result};
use crate::exchange::{HttpExchange, RequestConfig};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client as ReqwestClient, Method};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// The JSON:API media type requested by default
pub const JSONAPI_MEDIA_TYPE: &str = "application/vnd.api+json";

/// Source of HTTP exchanges for the validation service
pub trait ApiClient {
    /// Perform the configured request and capture the exchange
    fn fetch(
        &self,
        config: &RequestConfig,
    ) -> impl Future<Output = Result<HttpExchange>> + Send;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpApiClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Whether to validate TLS certificates
    pub validate_tls: bool,
}

impl Default for HttpApiClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            validate_tls: true,
        }
    }
}

/// reqwest-backed [`ApiClient`]
pub struct HttpApiClient {
    client: ReqwestClient,
}

impl HttpApiClient {
    /// Create a new HTTP client
    pub fn new(config: HttpApiClientConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.validate_tls)
            .build()
            .map_err(|e| Error::Http {
                message: format!("Failed to create HTTP client: {e}"),
                status_code: None,
                source: Some(anyhow::anyhow!(e)),
            })?;
        Ok(Self { client })
    }

    /// Create with default configuration
    pub fn with_default_config() -> Result<Self> {
        Self::new(HttpApiClientConfig::default())
    }

    fn build_url(config: &RequestConfig) -> Result<Url> {
        let mut url = Url::parse(&config.url).map_err(|e| {
            Error::configuration(format!("Request URL '{}' is invalid: {e}", config.url))
        })?;
        if !config.query_params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &config.query_params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn build_headers(config: &RequestConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                Error::configuration(format!("Header name '{name}' is invalid: {e}"))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                Error::configuration(format!("Header value for '{name}' is invalid: {e}"))
            })?;
            headers.insert(name, value);
        }
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static(JSONAPI_MEDIA_TYPE));
        }
        Ok(headers)
    }
}

impl ApiClient for HttpApiClient {
    async fn fetch(&self, config: &RequestConfig) -> Result<HttpExchange> {
        let method = Method::from_bytes(config.method.as_bytes()).map_err(|e| {
            Error::configuration(format!("Method '{}' is invalid: {e}", config.method))
        })?;
        let url = Self::build_url(config)?;
        let request_headers = Self::build_headers(config)?;

        tracing::debug!(url = %url, method = %method, "sending request");

        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .headers(request_headers.clone());
        if let Some(body) = &config.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| Error::Http {
            message: format!("Request to {url} failed: {e}"),
            status_code: e.status().map(|s| s.as_u16()),
            source: Some(anyhow::anyhow!(e)),
        })?;

        let status = response.status().as_u16();
        let response_headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let text = response.text().await.map_err(|e| Error::Http {
            message: format!("Failed to read response body: {e}"),
            status_code: Some(status),
            source: Some(anyhow::anyhow!(e)),
        })?;

        let body = parse_body(&text)?;

        tracing::debug!(status, has_body = body.is_some(), "captured exchange");

        Ok(HttpExchange {
            status,
            method: config.method.to_ascii_uppercase(),
            url: url.to_string(),
            request_params: config.query_params.clone(),
            headers: merge_exchange_headers(&request_headers, response_headers),
            body,
        })
    }
}

/// Combine both sides of the exchange into one header map.
///
/// The content-negotiation checks need the request's `Accept` header
/// and the response's `Content-Type` in the same map. Response headers
/// win on collision; request headers (`Accept` included) fill the rest.
fn merge_exchange_headers(
    request: &HeaderMap,
    mut headers: BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    for (name, value) in request {
        let Ok(value) = value.to_str() else { continue };
        let already_present = headers
            .keys()
            .any(|existing| existing.eq_ignore_ascii_case(name.as_str()));
        if !already_present {
            headers.insert(name.as_str().to_string(), value.to_string());
        }
    }
    headers
}

/// Parse a response body; empty or whitespace-only bodies become `None`
fn parse_body(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(|e| Error::Json {
            message: format!("Response body is not valid JSON: {e}"),
            source: Some(e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_parses_to_none() {
        assert!(parse_body("").unwrap().is_none());
        assert!(parse_body("  \n").unwrap().is_none());
    }

    #[test]
    fn test_non_json_body_is_a_terminal_error() {
        let err = parse_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_build_url_appends_params() {
        let config = RequestConfig::get("https://example.com/articles")
            .with_param("page[number]", "2")
            .with_param("page[size]", "10");
        let url = HttpApiClient::build_url(&config).unwrap();
        let query = url.query().unwrap();
        assert!(query.contains("page%5Bnumber%5D=2"));
        assert!(query.contains("page%5Bsize%5D=10"));
    }

    #[test]
    fn test_default_accept_header() {
        let config = RequestConfig::get("https://example.com/articles");
        let headers = HttpApiClient::build_headers(&config).unwrap();
        assert_eq!(headers.get(ACCEPT).unwrap(), JSONAPI_MEDIA_TYPE);

        let config = config.with_header("Accept", "application/json");
        let headers = HttpApiClient::build_headers(&config).unwrap();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_url_is_a_configuration_error() {
        let config = RequestConfig::get("not a url");
        assert!(matches!(
            HttpApiClient::build_url(&config),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn test_exchange_headers_carry_the_request_accept() {
        let config = RequestConfig::get("https://example.com/articles");
        let request_headers = HttpApiClient::build_headers(&config).unwrap();
        let response_headers = BTreeMap::from([(
            "content-type".to_string(),
            "application/vnd.api+json".to_string(),
        )]);

        let merged = merge_exchange_headers(&request_headers, response_headers);
        assert_eq!(merged.get("accept").map(String::as_str), Some(JSONAPI_MEDIA_TYPE));
        assert_eq!(
            merged.get("content-type").map(String::as_str),
            Some("application/vnd.api+json")
        );

        // The merged map is what the negotiation checks consume; a bad
        // request Accept must now be reachable through it
        let bad_accept = RequestConfig::get("https://example.com/articles")
            .with_header("Accept", "application/json");
        let request_headers = HttpApiClient::build_headers(&bad_accept).unwrap();
        let merged = merge_exchange_headers(
            &request_headers,
            BTreeMap::from([(
                "content-type".to_string(),
                "application/vnd.api+json".to_string(),
            )]),
        );
        let result = japi_validators::validate_content_negotiation(&merged);
        assert!(result
            .errors()
            .iter()
            .any(|f| f.test == "accept: media type"));
    }

    #[test]
    fn test_response_headers_win_on_collision() {
        let config = RequestConfig::get("https://example.com/articles")
            .with_header("X-Trace-Side", "request");
        let request_headers = HttpApiClient::build_headers(&config).unwrap();
        let response_headers = BTreeMap::from([(
            "x-trace-side".to_string(),
            "response".to_string(),
        )]);

        let merged = merge_exchange_headers(&request_headers, response_headers);
        assert_eq!(merged.get("x-trace-side").map(String::as_str), Some("response"));
        assert!(!merged.keys().any(|k| k == "X-Trace-Side"));
    }
}
