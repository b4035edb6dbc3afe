//! The normalized caught error the resolution pipeline operates on.
//!
//! Rust has no reflective exception hierarchy, so everything a resolver
//! might want to know is captured explicitly when the error is wrapped:
//! its `TypeId` for exact-type lookups, its type name for diagnostics and,
//! when the error implements [`ResolvableError`], a ready-made
//! [`Resolvable`].

use std::any::TypeId;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use serde_json::Value;

use crate::error::BoxError;
use crate::messages::Resolvable;

/// Capability trait for errors that know their own message code.
///
/// Implementing this lets an error be wrapped with [`Caught::resolvable`],
/// which short-circuits the resolution pipeline with the error's own code,
/// arguments and source map.
pub trait ResolvableError: Error {
    /// Stable message code used for catalog lookups.
    fn code(&self) -> &str;

    /// Positional arguments consumed during message interpolation.
    fn arguments(&self) -> Vec<Value> {
        Vec::new()
    }

    /// Source map pointing at the offending request element.
    fn source_map(&self) -> BTreeMap<String, Value> {
        BTreeMap::new()
    }

    /// Message used when no catalog entry exists for the code.
    fn default_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// An error caught while handling a request, wrapped for resolution.
pub struct Caught {
    error: BoxError,
    type_id: TypeId,
    type_name: &'static str,
    resolvable: Option<Resolvable>,
}

impl Caught {
    /// Wrap a caught error.
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            error: Box::new(error),
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            resolvable: None,
        }
    }

    /// Wrap a caught error and extract its [`Resolvable`] through the
    /// [`ResolvableError`] capability.
    pub fn resolvable<E>(error: E) -> Self
    where
        E: ResolvableError + Send + Sync + 'static,
    {
        let mut resolvable = Resolvable::new(error.code())
            .with_arguments(error.arguments())
            .with_source(error.source_map());

        if let Some(message) = error.default_message() {
            resolvable = resolvable.with_default_message(message);
        }

        let mut caught = Self::new(error);
        caught.resolvable = Some(resolvable);
        caught
    }

    /// `TypeId` of the concrete error type, used for exact-type lookups.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified name of the concrete error type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the wrapped error is of type `T`.
    pub fn is<T: Error + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    pub fn downcast_ref<T: Error + 'static>(&self) -> Option<&T> {
        self.error.downcast_ref()
    }

    /// The resolvable captured at wrap time, if any.
    pub fn as_resolvable(&self) -> Option<&Resolvable> {
        self.resolvable.as_ref()
    }

    pub fn error(&self) -> &(dyn Error + 'static) {
        &*self.error
    }

    /// Render the full cause chain as a plain string, one cause per line.
    pub fn trace(&self) -> String {
        let mut trace = format!("{}: {}", self.type_name, self.error);
        let mut cause = self.error.source();

        while let Some(error) = cause {
            trace.push_str("\ncaused by: ");
            trace.push_str(&error.to_string());
            cause = error.source();
        }

        trace
    }
}

impl fmt::Display for Caught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl fmt::Debug for Caught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caught")
            .field("type_name", &self.type_name)
            .field("error", &self.error)
            .finish()
    }
}

/// Convenience error type carrying a stable message code.
///
/// Useful for application errors that should map straight to a catalog
/// entry without registering a mapping:
///
/// ```
/// use jsonapi_errors::{Caught, CodedError};
///
/// let caught = Caught::resolvable(CodedError::new(
///     "exception.quota_exceeded",
///     "The account quota has been exceeded",
/// ));
/// assert_eq!(caught.as_resolvable().unwrap().code, "exception.quota_exceeded");
/// ```
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CodedError {
    code: String,
    message: String,
    #[source]
    cause: Option<BoxError>,
}

impl CodedError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }
}

impl ResolvableError for CodedError {
    fn code(&self) -> &str {
        &self.code
    }

    fn default_message(&self) -> Option<String> {
        Some(self.message.clone())
    }
}
