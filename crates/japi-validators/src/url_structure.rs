//! Request-URL path taxonomy
//!
//! JSON:API URLs follow a small taxonomy: `/articles` (collection),
//! `/articles/1` (individual resource), `/articles/1/author` (related
//! resource) and `/articles/1/relationships/author` (relationship).
//! Each path segment is validated against the member-name grammar
//! (type and relationship names) or ID-character rules.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::member_name::is_valid_member_format;
use crate::result::{Context, ValidationResult};
use std::sync::OnceLock;
use url::Url;

static PATH_BASE: OnceLock<Url> = OnceLock::new();

fn path_base() -> &'static Url {
    PATH_BASE.get_or_init(|| Url::parse("http://jsonapi.invalid/").expect("static base URL parses"))
}

/// Validate the structure of a request URL's path
pub fn validate_url_structure(url: &str) -> ValidationResult {
    let mut result = ValidationResult::new();
    let context = Context::new("url");

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(url::ParseError::RelativeUrlWithoutBase) => match path_base().join(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                result.error(
                    "url-structure: parse",
                    format!("Request URL '{url}' cannot be parsed: {e}"),
                    &context,
                );
                return result;
            }
        },
        Err(e) => {
            result.error(
                "url-structure: parse",
                format!("Request URL '{url}' cannot be parsed: {e}"),
                &context,
            );
            return result;
        }
    };

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if segments.is_empty() {
        result.detail(
            "url-structure: taxonomy",
            "URL addresses the API root; no resource path to classify",
            &context,
        );
        return result;
    }

    match segments.as_slice() {
        [collection] => {
            validate_type_segment(collection, &context, &mut result);
            result.detail(
                "url-structure: taxonomy",
                format!("URL addresses the '{collection}' collection"),
                &context,
            );
        }
        [collection, id] => {
            validate_type_segment(collection, &context, &mut result);
            validate_id_segment(id, &context, &mut result);
            result.detail(
                "url-structure: taxonomy",
                format!("URL addresses the individual resource {collection}/{id}"),
                &context,
            );
        }
        [collection, id, "relationships"] => {
            validate_type_segment(collection, &context, &mut result);
            validate_id_segment(id, &context, &mut result);
            result.error(
                "url-structure: relationships",
                "A `relationships` path segment must be followed by a relationship name",
                &context,
            );
        }
        [collection, id, related] => {
            validate_type_segment(collection, &context, &mut result);
            validate_id_segment(id, &context, &mut result);
            validate_name_segment(related, "related-resource name", &context, &mut result);
            result.detail(
                "url-structure: taxonomy",
                format!("URL addresses the related resource '{related}' of {collection}/{id}"),
                &context,
            );
        }
        [collection, id, "relationships", relationship] => {
            validate_type_segment(collection, &context, &mut result);
            validate_id_segment(id, &context, &mut result);
            validate_name_segment(relationship, "relationship name", &context, &mut result);
            result.detail(
                "url-structure: taxonomy",
                format!(
                    "URL addresses the '{relationship}' relationship of {collection}/{id}"
                ),
                &context,
            );
        }
        _ => {
            result.warning(
                "url-structure: taxonomy",
                format!(
                    "Path '{}' does not match the JSON:API collection/resource/related/\
                     relationship taxonomy",
                    parsed.path()
                ),
                &context,
            );
        }
    }

    result
}

fn validate_type_segment(segment: &str, context: &Context, result: &mut ValidationResult) {
    if !is_valid_member_format(segment) {
        result.error(
            "url-structure: type segment",
            format!("Path segment '{segment}' is not a valid resource type name"),
            context,
        );
    }
}

fn validate_name_segment(
    segment: &str,
    description: &str,
    context: &Context,
    result: &mut ValidationResult,
) {
    if !is_valid_member_format(segment) {
        result.error(
            "url-structure: name segment",
            format!("Path segment '{segment}' is not a valid {description}"),
            context,
        );
    }
}

fn validate_id_segment(segment: &str, context: &Context, result: &mut ValidationResult) {
    let acceptable = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '%'));
    if !acceptable {
        result.error(
            "url-structure: id segment",
            format!("Path segment '{segment}' contains characters not allowed in resource IDs"),
            context,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_tests(result: &ValidationResult) -> Vec<&str> {
        result.errors().iter().map(|f| f.test.as_str()).collect()
    }

    fn taxonomy_of(result: &ValidationResult) -> String {
        result
            .details()
            .iter()
            .find(|f| f.test == "url-structure: taxonomy")
            .map(|f| f.message.clone())
            .unwrap_or_default()
    }

    #[test]
    fn test_collection_url() {
        let result = validate_url_structure("https://example.com/articles");
        assert!(result.is_valid());
        assert!(taxonomy_of(&result).contains("collection"));
    }

    #[test]
    fn test_individual_resource_url() {
        let result = validate_url_structure("https://example.com/articles/1");
        assert!(result.is_valid());
        assert!(taxonomy_of(&result).contains("individual resource"));
    }

    #[test]
    fn test_related_resource_url() {
        let result = validate_url_structure("https://example.com/articles/1/author");
        assert!(result.is_valid());
        assert!(taxonomy_of(&result).contains("related resource"));
    }

    #[test]
    fn test_relationship_url() {
        let result =
            validate_url_structure("https://example.com/articles/1/relationships/author");
        assert!(result.is_valid());
        assert!(taxonomy_of(&result).contains("relationship"));
    }

    #[test]
    fn test_bare_relationships_segment_fails() {
        let result = validate_url_structure("https://example.com/articles/1/relationships");
        assert!(error_tests(&result).contains(&"url-structure: relationships"));
    }

    #[test]
    fn test_invalid_type_segment() {
        let result = validate_url_structure("https://example.com/Articles");
        assert!(error_tests(&result).contains(&"url-structure: type segment"));
    }

    #[test]
    fn test_query_does_not_affect_taxonomy() {
        let result =
            validate_url_structure("https://example.com/articles?page[number]=2&sort=-created");
        assert!(result.is_valid());
        assert!(taxonomy_of(&result).contains("collection"));
    }

    #[test]
    fn test_relative_url_accepted() {
        let result = validate_url_structure("/articles/1");
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn test_deep_path_warns() {
        let result = validate_url_structure("https://example.com/api/v2/articles/1/author");
        assert!(result.is_valid());
        assert!(result
            .warnings()
            .iter()
            .any(|f| f.test == "url-structure: taxonomy"));
    }
}
