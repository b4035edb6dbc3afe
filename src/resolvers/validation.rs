use axum::http::StatusCode;

use crate::caught::Caught;
use crate::error::BoxError;
use crate::messages::Resolvable;
use crate::order::LOWEST_PRECEDENCE;
use crate::validation::{
    BindingErrors, ConstraintViolation, ConstraintViolations, FieldError, InvalidArgument,
    PathNodeKind,
};

use super::{ExceptionResolver, ResolvedException};

/// Resolves the field-level validation failure shapes to 422 responses.
///
/// Each failing field or constraint becomes one resolvable. A custom
/// message template (a default message wrapped in braces) replaces the
/// constraint code, with the braces stripped; the `source.pointer` is the
/// slash-joined field path.
pub struct ValidationExceptionResolver {
    order: i32,
}

impl ValidationExceptionResolver {
    pub fn new() -> Self {
        Self {
            order: LOWEST_PRECEDENCE - 2,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Default for ValidationExceptionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionResolver for ValidationExceptionResolver {
    fn name(&self) -> &'static str {
        "ValidationExceptionResolver"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn resolve(&self, caught: &Caught) -> Result<Option<ResolvedException>, BoxError> {
        if let Some(invalid) = caught.downcast_ref::<InvalidArgument>() {
            return Ok(Some(from_field_errors(&invalid.errors)));
        }

        if let Some(binding) = caught.downcast_ref::<BindingErrors>() {
            return Ok(Some(from_field_errors(&binding.errors)));
        }

        if let Some(violations) = caught.downcast_ref::<ConstraintViolations>() {
            let errors = violations.violations.iter().map(violation_to_resolvable).collect();
            return Ok(Some(ResolvedException::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                errors,
            )));
        }

        Ok(None)
    }
}

fn from_field_errors(errors: &[FieldError]) -> ResolvedException {
    let errors = errors.iter().map(field_error_to_resolvable).collect();
    ResolvedException::new(StatusCode::UNPROCESSABLE_ENTITY, errors)
}

fn field_error_to_resolvable(error: &FieldError) -> Resolvable {
    let pointer = error.field.replace('.', "/");

    // a custom message code is carried as a {wrapped} default message and
    // replaces the constraint code
    let (code, default_message) = match error.default_message.as_deref() {
        Some(template) if template.starts_with('{') => (normalize_template(template), None),
        other => (error.code.clone(), other.map(str::to_string)),
    };

    let mut resolvable = Resolvable::new(code)
        .with_arguments(error.arguments.clone())
        .with_source_entry("pointer", pointer);

    if let Some(message) = default_message {
        resolvable = resolvable.with_default_message(message);
    }

    resolvable
}

fn violation_to_resolvable(violation: &ConstraintViolation) -> Resolvable {
    let code = normalize_template(&violation.message_template);

    let pointer = violation
        .path
        .iter()
        .filter(|node| {
            matches!(
                node.kind,
                PathNodeKind::Parameter | PathNodeKind::Property | PathNodeKind::Object
            )
        })
        .filter(|node| !node.name.is_empty())
        .map(|node| node.name.as_str())
        .collect::<Vec<_>>()
        .join("/");

    Resolvable::new(code.clone())
        .with_argument(code)
        .with_default_message(violation.message.clone())
        .with_source_entry("pointer", pointer)
}

/// Message templates referencing a custom code are wrapped in braces,
/// strip them; anything else passes through unchanged.
fn normalize_template(template: &str) -> String {
    if template.starts_with('{') {
        template.replace(['{', '}'], "")
    } else {
        template.to_string()
    }
}
