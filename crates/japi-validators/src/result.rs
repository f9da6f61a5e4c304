//! Validation result accumulator and document path contexts
//!
//! Copyright (c) 2025 Japi Team
//! Licensed under the MIT OR Apache-2.0 license

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single validation finding: one rule applied at one document location.
///
/// `test` is a stable, human-readable rule name; `message` explains the
/// outcome; `context` is a dotted/bracketed path into the document
/// (e.g. `data[2].relationships.author.data`) when the finding applies
/// to a specific location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub test: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Finding {
    pub fn new<T, M>(test: T, message: M, context: Option<String>) -> Self
    where
        T: Into<String>,
        M: Into<String>,
    {
        Self {
            test: test.into(),
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "[{}] {} (at {})", self.test, self.message, context),
            None => write!(f, "[{}] {}", self.test, self.message),
        }
    }
}

/// The universal return value of every validator.
///
/// Invariant: `valid` is false exactly when `errors` is non-empty.
/// The invariant is maintained by construction: the only mutators are
/// [`error`](Self::error), [`warning`](Self::warning),
/// [`detail`](Self::detail) and [`merge`](Self::merge). `details`
/// records passing and informational checks and never drives pass/fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    details: Vec<Finding>,
}

impl ValidationResult {
    /// Create an empty, passing result
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Record a blocking error; marks the result invalid
    pub fn error<M: Into<String>>(&mut self, test: &str, message: M, context: &Context) {
        self.valid = false;
        self.errors
            .push(Finding::new(test, message, context.as_option()));
    }

    /// Record a non-blocking warning
    pub fn warning<M: Into<String>>(&mut self, test: &str, message: M, context: &Context) {
        self.warnings
            .push(Finding::new(test, message, context.as_option()));
    }

    /// Record an informational detail (passing checks included)
    pub fn detail<M: Into<String>>(&mut self, test: &str, message: M, context: &Context) {
        self.details
            .push(Finding::new(test, message, context.as_option()));
    }

    /// Merge another result into this one.
    ///
    /// Associative: error/warning/detail sequences are concatenated in
    /// order and `valid` is the conjunction of both sides.
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid = self.valid && other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.details.extend(other.details);
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn details(&self) -> &[Finding] {
        &self.details
    }

    /// True when nothing at all was recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.details.is_empty()
    }
}

/// A dotted/bracketed path into the document under validation.
///
/// The root context renders as the empty path; findings recorded
/// against it carry no `context` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    path: String,
}

impl Context {
    /// The document root
    pub fn root() -> Self {
        Self { path: String::new() }
    }

    /// A context starting at a named location, e.g. `data`
    pub fn new<P: Into<String>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Descend into a named member: `data` -> `data.attributes`
    pub fn child(&self, segment: &str) -> Self {
        if self.path.is_empty() {
            Self {
                path: segment.to_string(),
            }
        } else {
            Self {
                path: format!("{}.{}", self.path, segment),
            }
        }
    }

    /// Descend into an array element: `data` -> `data[3]`
    pub fn index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }

    /// Append a free-form annotation: `included[0]` -> `included[0] (articles:1)`
    pub fn annotated(&self, note: &str) -> Self {
        Self {
            path: format!("{} ({})", self.path, note),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn as_option(&self) -> Option<String> {
        if self.path.is_empty() {
            None
        } else {
            Some(self.path.clone())
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Name of a JSON value's type, for error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_child_and_index() {
        let context = Context::new("data").index(2).child("relationships").child("author");
        assert_eq!(context.path(), "data[2].relationships.author");
    }

    #[test]
    fn test_root_context_is_absent() {
        let context = Context::root();
        assert_eq!(context.as_option(), None);

        let mut result = ValidationResult::new();
        result.error("rule", "message", &context);
        assert_eq!(result.errors()[0].context, None);
    }

    #[test]
    fn test_valid_tracks_errors_only() {
        let mut result = ValidationResult::new();
        assert!(result.is_valid());

        result.warning("rule", "warned", &Context::root());
        result.detail("rule", "noted", &Context::root());
        assert!(result.is_valid());

        result.error("rule", "failed", &Context::root());
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_merge_is_associative() {
        let make = |tag: &str, fail: bool| {
            let mut r = ValidationResult::new();
            if fail {
                r.error(tag, "error", &Context::root());
            } else {
                r.detail(tag, "detail", &Context::root());
            }
            r
        };

        let mut left = make("a", false);
        left.merge(make("b", true));
        left.merge(make("c", false));

        let mut inner = make("b", true);
        inner.merge(make("c", false));
        let mut right = make("a", false);
        right.merge(inner);

        assert_eq!(left, right);
        assert!(!left.is_valid());
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
