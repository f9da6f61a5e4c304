//! Core validation engine for japi
//!
//! Takes a [`RequestConfig`], performs the exchange through an
//! [`ApiClient`], runs the full JSON:API conformance validator family
//! from `japi-validators` over it in a fixed order, and renders the
//! merged result as a [`Report`].
//!
//! ```no_run
//! use japi_core::{HttpApiClient, ReportFormat, RequestConfig, ValidationReporter, ValidationService};
//!
//! # async fn run() -> japi_core::Result<()> {
//! let client = HttpApiClient::with_default_config()?;
//! let service = ValidationService::new(client);
//! let config = RequestConfig::get("https://example.com/articles")
//!     .with_param("page[size]", "10");
//!
//! let outcome = service.run_validation(&config).await;
//! let report = ValidationReporter::build(&outcome, &config.url);
//! println!("{}", ValidationReporter::render(&report, ReportFormat::Markdown)?);
//! # Ok(())
//! # }
//! ```
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

pub mod client;
pub mod error;
pub mod exchange;
pub mod reporter;
pub mod service;

pub use client::{ApiClient, HttpApiClient, HttpApiClientConfig, JSONAPI_MEDIA_TYPE};
pub use error::{Error, Result};
pub use exchange::{HttpExchange, RequestConfig};
pub use reporter::{
    categorize, Category, ClassifiedFinding, Report, ReportFormat, ReportStatus, ReportSummary,
    Severity, ValidationReporter,
};
pub use service::{validate_exchange, RunOutcome, ValidationService};

// Validation primitives, re-exported for downstream consumers
pub use japi_validators::{Context, Finding, ValidationResult};
