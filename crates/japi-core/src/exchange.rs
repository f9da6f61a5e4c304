//! Request configuration and the captured HTTP exchange
//!
//! A [`RequestConfig`] describes the request to perform; an
//! [`HttpExchange`] is the frozen record of one request/response pair,
//! which is all the validators ever see. The exchange is plain data so
//! it can be captured once and validated any number of times.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Description of the HTTP request to perform against the API under test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Absolute request URL, without the query parameters listed below
    pub url: String,
    /// HTTP method; uppercase by convention
    #[serde(default = "default_method")]
    pub method: String,
    /// Request headers; an `Accept: application/vnd.api+json` header is
    /// added when none is given
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Query parameters appended to the URL, also handed to the
    /// pagination and fieldset checks as the requested parameters
    #[serde(default)]
    pub query_params: BTreeMap<String, String>,
    /// Optional JSON request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RequestConfig {
    /// A plain GET of the given URL
    pub fn get<U: Into<String>>(url: U) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            body: None,
        }
    }

    /// Set the HTTP method
    pub fn with_method<M: Into<String>>(mut self, method: M) -> Self {
        self.method = method.into().to_ascii_uppercase();
        self
    }

    /// Add a request header
    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn with_param<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Set the JSON request body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// One captured request/response pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpExchange {
    /// HTTP status code of the response
    pub status: u16,
    /// Uppercased method the request was made with
    pub method: String,
    /// The full URL the request was sent to, query string included
    pub url: String,
    /// Query parameters the request asked for, as sent
    pub request_params: BTreeMap<String, String>,
    /// Response headers; names as received
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON response body, `None` for an empty body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpExchange {
    /// Look up a response header case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
