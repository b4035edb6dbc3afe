//! Field-level validation failure shapes.
//!
//! These are the error types the validation resolver recognizes. Web
//! integrations are expected to convert their own validation output
//! (extractor rejections, validator crate reports) into one of these
//! shapes before wrapping it in a [`Caught`].
//!
//! [`Caught`]: crate::Caught

use serde_json::Value;
use thiserror::Error;

/// A single failing field.
#[derive(Debug, Clone)]
pub struct FieldError {
    /// Dotted path of the failing field, e.g. `address.city`.
    pub field: String,
    /// Constraint code, e.g. `NotEmpty`.
    pub code: String,
    /// Positional arguments for message interpolation.
    pub arguments: Vec<Value>,
    /// Rendered message, or a `{code}` template reference for a custom
    /// message code.
    pub default_message: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            arguments: Vec::new(),
            default_message: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }
}

/// A request handler argument failed validation.
#[derive(Debug, Error)]
#[error("validation failed for argument {parameter:?} with {} field error(s)", .errors.len())]
pub struct InvalidArgument {
    /// Name of the handler argument that failed validation.
    pub parameter: String,
    pub errors: Vec<FieldError>,
}

/// Binding a request payload onto a target object failed.
#[derive(Debug, Error)]
#[error("binding onto {target:?} failed with {} field error(s)", .errors.len())]
pub struct BindingErrors {
    /// Name of the binding target.
    pub target: String,
    pub errors: Vec<FieldError>,
}

/// One or more declared constraints were violated.
#[derive(Debug, Error)]
#[error("{} constraint violation(s)", .violations.len())]
pub struct ConstraintViolations {
    pub violations: Vec<ConstraintViolation>,
}

/// A single violated constraint.
#[derive(Debug, Clone)]
pub struct ConstraintViolation {
    /// Raw message template, custom codes are wrapped in braces such as
    /// `{exception.invalid_email}`.
    pub message_template: String,
    /// Interpolated human-readable message.
    pub message: String,
    /// Path from the validated root to the failing element.
    pub path: Vec<PathNode>,
}

impl ConstraintViolation {
    pub fn new(
        message_template: impl Into<String>,
        message: impl Into<String>,
        path: Vec<PathNode>,
    ) -> Self {
        Self {
            message_template: message_template.into(),
            message: message.into(),
            path,
        }
    }
}

/// Kind of a node within a violation's property path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathNodeKind {
    Method,
    Parameter,
    Property,
    Object,
    Index,
}

/// A named node within a violation's property path.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub kind: PathNodeKind,
    pub name: String,
}

impl PathNode {
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            kind: PathNodeKind::Method,
            name: name.into(),
        }
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self {
            kind: PathNodeKind::Parameter,
            name: name.into(),
        }
    }

    pub fn property(name: impl Into<String>) -> Self {
        Self {
            kind: PathNodeKind::Property,
            name: name.into(),
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self {
            kind: PathNodeKind::Object,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_builder() {
        let error = FieldError::new("email", "NotEmpty")
            .with_arguments(vec![Value::from("email")])
            .with_default_message("must not be empty");

        assert_eq!(error.field, "email");
        assert_eq!(error.code, "NotEmpty");
        assert_eq!(error.default_message.as_deref(), Some("must not be empty"));
    }

    #[test]
    fn test_shapes_render_error_counts() {
        let invalid = InvalidArgument {
            parameter: "body".to_string(),
            errors: vec![FieldError::new("email", "NotEmpty")],
        };
        assert!(invalid.to_string().contains("1 field error(s)"));

        let violations = ConstraintViolations { violations: vec![] };
        assert!(violations.to_string().contains("0 constraint violation(s)"));
    }
}
