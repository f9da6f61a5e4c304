//! Error types for the japi core library
//!
//! Terminal failures only: anything that stops a validation run before
//! a [`ValidationResult`](japi_validators::ValidationResult) can be
//! produced. Conformance findings are never errors at this level.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use thiserror::Error;

/// Main error type for japi operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network failures while fetching the exchange
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The response body could not be parsed as JSON
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request configuration errors (bad URL, bad method, bad headers)
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Report rendering failures
    #[error("Report error: {message}")]
    Report {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    /// Build an HTTP error without an underlying source
    pub fn http<M: Into<String>>(message: M, status_code: Option<u16>) -> Self {
        Error::Http {
            message: message.into(),
            status_code,
            source: None,
        }
    }

    /// Build a configuration error without an underlying source
    pub fn configuration<M: Into<String>>(message: M) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;
