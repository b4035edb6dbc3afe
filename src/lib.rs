//! # jsonapi-errors
//!
//! Translate application errors into standardized JSON:API error responses.
//!
//! Any error raised while handling a request is wrapped in a [`Caught`] and
//! fed to a [`JsonApiErrorsBuilder`], which resolves it through an ordered
//! chain of resolvers into an HTTP status, response headers and a list of
//! message codes, then translates those codes into human-readable error
//! objects through a message catalog.
//!
//! ## Features
//!
//! - **Pluggable resolution**: an ordered [`ExceptionResolver`] chain where
//!   the first resolver that recognizes an error wins
//! - **Self-describing errors**: implement [`ResolvableError`] on a type and
//!   it carries its own message code, arguments and source map
//! - **Declarative mappings**: register codes and statuses for third-party
//!   error types without touching them
//! - **Localized catalogs**: message bundles with locale fallback and
//!   positional argument interpolation
//! - **Validation and transport errors** resolved out of the box
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonapi_errors::prelude::*;
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("user {0} not found")]
//! struct UserNotFound(u64);
//!
//! let bundle = MessageBundle::new()
//!     .with_message("exception.error-message", "An unexpected error occurred")
//!     .with_message("exception.user_not_found.title", "Not Found")
//!     .with_message("exception.user_not_found", "The requested user does not exist");
//!
//! let builder = JsonApiErrorsBuilderFactory::new()
//!     .with_bundle(bundle)
//!     .with_default_resolvers()
//!     .configure_mappings(|registry| {
//!         registry
//!             .register::<UserNotFound>()
//!             .code("exception.user_not_found")
//!             .status(StatusCode::NOT_FOUND);
//!     })
//!     .build()
//!     .unwrap();
//!
//! let response = builder.build(&Caught::new(UserNotFound(42))).unwrap();
//!
//! assert_eq!(response.status, StatusCode::NOT_FOUND);
//! assert_eq!(response.body.errors[0].code, "exception.user_not_found");
//! assert_eq!(response.body.errors[0].title.as_deref(), Some("Not Found"));
//! ```

pub mod builders;
pub mod caught;
pub mod config;
pub mod error;
pub mod logging;
pub mod mappings;
pub mod messages;
pub mod order;
pub mod request;
pub mod resolvers;
pub mod response;
pub mod validation;

// Re-export core types
pub use builders::{JsonApiErrorsBuilder, JsonApiErrorsBuilderFactory};
pub use caught::{Caught, CodedError, ResolvableError};
pub use error::{BoxError, JsonApiError, Result};
pub use messages::{ErrorMessageSource, Locale, MessageBundle, MessageCatalog, Resolvable};
pub use resolvers::{ExceptionResolver, ResolvedException};
pub use response::{ErrorMessage, ErrorResponse, JsonApiErrors};

// Re-export commonly used types from dependencies
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use jsonapi_errors::prelude::*;
/// ```
pub mod prelude {
    pub use crate::builders::{JsonApiErrorsBuilder, JsonApiErrorsBuilderFactory};
    pub use crate::caught::{Caught, CodedError, ResolvableError};
    pub use crate::config::JsonApiErrorProperties;
    pub use crate::error::{BoxError, JsonApiError, Result};
    pub use crate::logging::{ErrorLogger, NoopErrorLogger, TracingErrorLogger};
    pub use crate::mappings::{DeclaredStatuses, ErrorMappingRegistry};
    pub use crate::messages::{
        CatalogMessageSource, CompositeMessageSource, ErrorMessageSource, Locale, MessageBundle,
        MessageCatalog, Resolvable,
    };
    pub use crate::request::RequestError;
    pub use crate::resolvers::{
        DeclaredStatusResolver, ExceptionResolver, MappingExceptionResolver,
        ResolvableExceptionResolver, ResolvedException, ValidationExceptionResolver,
        WebExceptionResolver,
    };
    pub use crate::response::{ErrorMessage, ErrorResponse, JsonApiErrors};
    pub use crate::validation::{
        BindingErrors, ConstraintViolation, ConstraintViolations, FieldError, InvalidArgument,
        PathNode, PathNodeKind,
    };
    pub use axum::http::{HeaderMap, Method, StatusCode};
    pub use axum::response::IntoResponse;
    pub use std::sync::Arc;
}
