//! Error message resolution layer.
//!
//! A [`Resolvable`] is the normalized shape a caught error is reduced to
//! before translation: a message code, positional arguments, an optional
//! source map and an optional default message. An [`ErrorMessageSource`]
//! turns a resolvable into a localized [`ErrorMessage`], and multiple
//! sources can be stacked with [`CompositeMessageSource`] so that
//! application catalogs override library defaults.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::response::ErrorMessage;

pub mod catalog;
mod composite;
mod source;

pub use catalog::{Locale, MessageBundle, MessageCatalog, format_message};
pub use composite::CompositeMessageSource;
pub use source::CatalogMessageSource;

/// Normalized error description awaiting translation.
///
/// The `code` is the lookup key used by an [`ErrorMessageSource`], the
/// `arguments` are consumed positionally during message interpolation and
/// the `source` map points at the offending request element, for example
/// `{"pointer": "address/city"}` or `{"parameter": "id"}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolvable {
    pub code: String,
    pub arguments: Vec<Value>,
    pub source: BTreeMap<String, Value>,
    pub default_message: Option<String>,
}

impl Resolvable {
    /// Create a resolvable for the given message code.
    ///
    /// The code must be non-empty and stable for a given cause.
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        debug_assert!(!code.is_empty(), "resolvable code must not be empty");

        Self {
            code,
            arguments: Vec::new(),
            source: BTreeMap::new(),
            default_message: None,
        }
    }

    /// Replace the positional interpolation arguments.
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Append a single positional interpolation argument.
    pub fn with_argument(mut self, argument: impl Into<Value>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Replace the source map.
    pub fn with_source(mut self, source: BTreeMap<String, Value>) -> Self {
        self.source = source;
        self
    }

    /// Add a single entry to the source map.
    pub fn with_source_entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.source.insert(key.into(), value.into());
        self
    }

    /// Set the message used when no catalog entry exists for the code.
    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }
}

/// Error returned when no translation exists for a message code and no
/// default message was supplied.
#[derive(Debug, Clone, Error)]
#[error("no message found for code {code:?} and locale {locale}")]
pub struct NoSuchMessageError {
    pub code: String,
    pub locale: Locale,
}

/// A lookup backend that translates a [`Resolvable`] into an [`ErrorMessage`].
///
/// Implementations resolve the title through the `"<code>.title"` key and the
/// detail through `"<code>.message"`, then `"<code>"`, then the resolvable's
/// default message. A missing title is not an error; a missing detail is.
pub trait ErrorMessageSource: Send + Sync {
    /// Translate the resolvable, or fail with [`NoSuchMessageError`] when no
    /// detail message can be produced.
    fn get(&self, resolvable: &Resolvable) -> Result<ErrorMessage, NoSuchMessageError>;

    /// Relative precedence of this source, lower values are consulted first.
    fn order(&self) -> i32 {
        crate::order::LOWEST_PRECEDENCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolvable_builder() {
        let resolvable = Resolvable::new("exception.invalid_email")
            .with_argument("email")
            .with_source_entry("pointer", "email")
            .with_default_message("Email address is not valid");

        assert_eq!(resolvable.code, "exception.invalid_email");
        assert_eq!(resolvable.arguments, vec![Value::from("email")]);
        assert_eq!(resolvable.source.get("pointer"), Some(&Value::from("email")));
        assert_eq!(
            resolvable.default_message.as_deref(),
            Some("Email address is not valid")
        );
    }

    #[test]
    fn test_resolvable_defaults_are_empty() {
        let resolvable = Resolvable::new("exception.error-message");

        assert!(resolvable.arguments.is_empty());
        assert!(resolvable.source.is_empty());
        assert!(resolvable.default_message.is_none());
    }
}
