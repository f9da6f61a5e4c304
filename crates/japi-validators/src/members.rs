//! Allowed-member sets for each JSON:API object kind
//!
//! The JSON:API grammar enumerates exactly which members each object
//! kind may carry. Each set is defined once here and shared between
//! unknown-member detection and the tests, so the rule and its test
//! stay in lockstep.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

/// Members a top-level document may carry
pub const DOCUMENT_MEMBERS: &[&str] = &["data", "errors", "meta", "jsonapi", "links", "included"];

/// Members a resource object may carry
pub const RESOURCE_MEMBERS: &[&str] = &["type", "id", "attributes", "relationships", "links", "meta"];

/// Members a resource identifier may carry
pub const RESOURCE_IDENTIFIER_MEMBERS: &[&str] = &["type", "id", "meta"];

/// Members a relationship object may carry; it must contain at least
/// one of `data`, `links`, `meta`
pub const RELATIONSHIP_MEMBERS: &[&str] = &["data", "links", "meta"];

/// Links legal inside a relationship object's `links` member
pub const RELATIONSHIP_LINKS: &[&str] = &["self", "related", "first", "last", "prev", "next"];

/// Members a link object (`{href, meta?}`) may carry
pub const LINK_OBJECT_MEMBERS: &[&str] = &["href", "meta"];

/// Members an error object may carry
pub const ERROR_MEMBERS: &[&str] = &[
    "id", "links", "status", "code", "title", "detail", "source", "meta",
];

/// Members an error `source` object may carry; it must contain at
/// least one of `pointer`, `parameter`
pub const ERROR_SOURCE_MEMBERS: &[&str] = &["pointer", "parameter"];

/// Members the top-level `jsonapi` object may carry
pub const JSONAPI_OBJECT_MEMBERS: &[&str] = &["version", "ext", "profile", "meta"];

/// Pagination link names
pub const PAGINATION_LINKS: &[&str] = &["first", "last", "prev", "next"];

/// Names reserved by the JSON:API grammar; not usable as
/// attribute/relationship/meta keys
pub const RESERVED_MEMBER_NAMES: &[&str] = &[
    "type",
    "id",
    "attributes",
    "relationships",
    "links",
    "meta",
    "data",
    "errors",
    "included",
    "jsonapi",
];
