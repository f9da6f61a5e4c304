//! Member-name grammar checks
//!
//! JSON:API v1.1 restricts every object key in a document to a
//! lowercase member-name grammar. The regex and the forbidden
//! separator pairs below are specification constants and must be
//! preserved bit-for-bit.
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::members::RESERVED_MEMBER_NAMES;
use crate::result::{json_type_name, Context, ValidationResult};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static MEMBER_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn member_name_re() -> &'static Regex {
    MEMBER_NAME_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9_-]*[a-z0-9])?$").expect("member-name pattern compiles")
    })
}

/// Separator sequences never legal inside a member name
const FORBIDDEN_SEPARATOR_PAIRS: &[&str] = &["--", "__", "-_", "_-"];

/// Validate a member name used as an attribute/relationship/meta key.
///
/// Failure rules apply in a fixed precedence and the first failing rule
/// short-circuits the rest: not a string, empty, format (regex
/// mismatch), consecutive separators, reserved name. Pure and
/// idempotent.
pub fn validate_member_name(name: &Value, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();

    let name = match name {
        Value::String(s) => s,
        other => {
            result.error(
                "member-name: type",
                format!("Member name must be a string, got {}", json_type_name(other)),
                context,
            );
            return result;
        }
    };

    validate_name_rules(name, context, &mut result);
    result
}

/// Validate a member name already known to be a string
pub fn validate_member_name_str(name: &str, context: &Context) -> ValidationResult {
    let mut result = ValidationResult::new();
    validate_name_rules(name, context, &mut result);
    result
}

/// Lightweight predicate for `type` values and other places where the
/// character grammar applies but the reserved-name rule does not
pub fn is_valid_member_format(name: &str) -> bool {
    member_name_re().is_match(name)
        && !FORBIDDEN_SEPARATOR_PAIRS
            .iter()
            .any(|pair| name.contains(pair))
}

fn validate_name_rules(name: &str, context: &Context, result: &mut ValidationResult) {
    if name.is_empty() {
        result.error("member-name: empty", "Member name must not be empty", context);
        return;
    }

    if !member_name_re().is_match(name) {
        result.error(
            "member-name: format",
            format!(
                "Member name '{name}' must start and end with a lowercase letter or digit \
                 and contain only a-z, 0-9, '-' and '_'"
            ),
            context,
        );
        return;
    }

    if let Some(pair) = FORBIDDEN_SEPARATOR_PAIRS
        .iter()
        .find(|pair| name.contains(*pair))
    {
        result.error(
            "member-name: separators",
            format!("Member name '{name}' must not contain the separator sequence '{pair}'"),
            context,
        );
        return;
    }

    if RESERVED_MEMBER_NAMES.contains(&name) {
        result.error(
            "member-name: reserved",
            format!("Member name '{name}' is reserved by the JSON:API specification"),
            context,
        );
        return;
    }

    result.detail(
        "member-name: format",
        format!("Member name '{name}' is well-formed"),
        context,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors_of(result: &ValidationResult) -> Vec<&str> {
        result.errors().iter().map(|f| f.test.as_str()).collect()
    }

    #[test]
    fn test_valid_names() {
        for name in ["title", "created-at", "created_at", "a", "a1", "1a", "x-y_z"] {
            let result = validate_member_name_str(name, &Context::root());
            assert!(result.is_valid(), "{name} should be valid");
            assert_eq!(result.details().len(), 1);
        }
    }

    #[test]
    fn test_not_a_string_short_circuits() {
        let result = validate_member_name(&json!(42), &Context::root());
        assert_eq!(errors_of(&result), vec!["member-name: type"]);
    }

    #[test]
    fn test_empty_name() {
        let result = validate_member_name(&json!(""), &Context::root());
        assert_eq!(errors_of(&result), vec!["member-name: empty"]);
    }

    #[test]
    fn test_format_violations() {
        for name in ["Title", "-leading", "trailing-", "_x", "x_", "has space", "emoji✓"] {
            let result = validate_member_name_str(name, &Context::root());
            assert_eq!(errors_of(&result), vec!["member-name: format"], "{name}");
        }
    }

    #[test]
    fn test_consecutive_separators() {
        for name in ["a--b", "a__b", "a-_b", "a_-b"] {
            let result = validate_member_name_str(name, &Context::root());
            assert_eq!(errors_of(&result), vec!["member-name: separators"], "{name}");
        }
    }

    #[test]
    fn test_reserved_names() {
        for name in ["type", "id", "data", "links", "meta", "jsonapi"] {
            let result = validate_member_name_str(name, &Context::root());
            assert_eq!(errors_of(&result), vec!["member-name: reserved"], "{name}");
        }
    }

    #[test]
    fn test_precedence_format_before_reserved() {
        // A name that both fails the format rule and would be reserved
        // if lowercased reports only the format failure
        let result = validate_member_name_str("Type", &Context::root());
        assert_eq!(errors_of(&result), vec!["member-name: format"]);
    }

    #[test]
    fn test_format_predicate_skips_reserved_rule() {
        assert!(is_valid_member_format("type"));
        assert!(is_valid_member_format("articles"));
        assert!(!is_valid_member_format("Articles"));
        assert!(!is_valid_member_format("a--b"));
        assert!(!is_valid_member_format(""));
    }

    #[test]
    fn test_idempotent() {
        let name = json!("a--b");
        let first = validate_member_name(&name, &Context::new("meta"));
        let second = validate_member_name(&name, &Context::new("meta"));
        assert_eq!(first, second);
    }
}
