//! Faults raised by the error handling pipeline itself.
//!
//! These are never turned into client responses. A [`JsonApiError`] means
//! the pipeline is misconfigured or a resolver is buggy, and the caller is
//! expected to emit a minimal hardcoded fallback response instead of
//! letting it escape unhandled.

use thiserror::Error;

use crate::messages::NoSuchMessageError;

pub type Result<T> = std::result::Result<T, JsonApiError>;

/// A type-erased error raised by a resolver implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum JsonApiError {
    /// A resolver implementation failed while inspecting a caught error.
    /// Declining resolvers return `None`, so this always indicates a bug or
    /// a misconfiguration, never bad request data.
    #[error("resolver {resolver} failed while handling {error_type}")]
    Resolver {
        resolver: &'static str,
        error_type: &'static str,
        #[source]
        source: BoxError,
    },

    /// No translation could be produced for a resolved error message.
    #[error("no error message could be translated for code {code:?} raised by {error_type}")]
    MessageLookup {
        code: String,
        error_type: &'static str,
        #[source]
        source: NoSuchMessageError,
    },

    /// The builder factory was asked to build an unusable configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}
