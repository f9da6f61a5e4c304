//! URL well-formedness checks
//!
//! Link values throughout a JSON:API document (resource links, error
//! `about` links, pagination links, `profile`/`ext` parameters) must
//! be syntactically valid URL references. Absolute URLs,
//! scheme-relative references and relative references are all
//! accepted; relative references are resolved against a fixed base
//! purely to reuse the parser.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::result::json_type_name;
use serde_json::Value;
use std::sync::OnceLock;
use url::Url;

static RESOLUTION_BASE: OnceLock<Url> = OnceLock::new();

fn resolution_base() -> &'static Url {
    RESOLUTION_BASE
        .get_or_init(|| Url::parse("http://jsonapi.invalid/").expect("static base URL parses"))
}

/// True when `value` is a well-formed absolute or relative URL reference
pub fn is_valid_url(value: &str) -> bool {
    classify(value).is_none()
}

/// Human-readable reason a value is not a usable URL, or `None` when
/// it is. Non-string inputs are classified too, so callers can pass a
/// raw JSON value straight through.
pub fn url_validation_error(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => classify(s),
        other => Some(format!(
            "URL must be a string, got {}",
            json_type_name(other)
        )),
    }
}

fn classify(value: &str) -> Option<String> {
    if value.is_empty() {
        return Some("URL must not be an empty string".to_string());
    }
    if value.chars().any(char::is_whitespace) {
        return Some("URL must not contain whitespace".to_string());
    }

    match Url::parse(value) {
        Ok(_) => None,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            // Relative and scheme-relative references are legal link
            // values; resolve against a throwaway base to parse them
            match resolution_base().join(value) {
                Ok(_) => None,
                Err(e) => Some(format!("Invalid relative URL reference: {e}")),
            }
        }
        Err(e) => Some(format!("Invalid URL: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absolute_urls() {
        assert!(is_valid_url("https://example.com/articles?page[number]=2"));
        assert!(is_valid_url("http://localhost:8080/api"));
        assert!(is_valid_url("urn:isbn:9780135957059"));
    }

    #[test]
    fn test_relative_references() {
        assert!(is_valid_url("/articles/1"));
        assert!(is_valid_url("articles/1/relationships/author"));
        assert!(is_valid_url("//cdn.example.com/image.png"));
        assert!(is_valid_url("?page=2"));
    }

    #[test]
    fn test_rejections() {
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("http://exa mple.com"));
        assert!(!is_valid_url("has whitespace"));
    }

    #[test]
    fn test_error_reasons() {
        assert!(url_validation_error(&json!("https://example.com")).is_none());
        assert_eq!(
            url_validation_error(&json!("")).as_deref(),
            Some("URL must not be an empty string")
        );
        assert_eq!(
            url_validation_error(&json!(17)).as_deref(),
            Some("URL must be a string, got number")
        );
        assert!(url_validation_error(&json!("a b")).unwrap().contains("whitespace"));
    }
}
