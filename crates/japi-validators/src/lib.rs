//! JSON:API v1.1 conformance validators
//!
//! This crate provides the pure validation layer of japi: a family of
//! independent validators that each check one facet of a JSON:API
//! response (document envelope, resource objects, error objects,
//! pagination, sparse fieldsets, content negotiation, HTTP status,
//! URL structure, and the `jsonapi` object).
//!
//! Every validator is a synchronous, side-effect-free function over
//! `serde_json::Value` inputs. Malformed input never raises an error:
//! each illegal shape is converted into a [`Finding`] inside a
//! [`ValidationResult`] and validation continues as far as
//! structurally possible. Results compose through the associative
//! [`ValidationResult::merge`].
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

pub mod document;
pub mod error_object;
pub mod http_status;
pub mod jsonapi_object;
pub mod member_name;
pub mod members;
pub mod negotiation;
pub mod pagination;
pub mod query;
pub mod resource;
pub mod result;
pub mod url_format;
pub mod url_structure;

// Re-export the types every validator signature is built from
pub use result::{Context, Finding, ValidationResult};

pub use document::validate_document;
pub use error_object::{validate_error_object, validate_errors_member, validate_json_pointer};
pub use http_status::validate_http_status;
pub use jsonapi_object::validate_jsonapi_object;
pub use member_name::{is_valid_member_format, validate_member_name, validate_member_name_str};
pub use negotiation::{
    validate_accept_header, validate_content_negotiation, validate_content_type_header,
};
pub use pagination::validate_pagination;
pub use query::{
    parse_sparse_fieldsets, validate_fieldset_syntax, validate_resource_fieldset,
    validate_sparse_fieldsets,
};
pub use resource::{
    is_resource_object_shape, validate_link_value, validate_relationship_object,
    validate_resource_collection, validate_resource_identifier, validate_resource_object,
    ResourceOptions,
};
pub use url_format::{is_valid_url, url_validation_error};
pub use url_structure::validate_url_structure;
