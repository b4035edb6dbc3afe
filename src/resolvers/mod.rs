//! Exception resolver strategies.
//!
//! A resolver inspects a [`Caught`] error and either declines by returning
//! `Ok(None)` or produces a [`ResolvedException`]. Resolvers carry an
//! explicit precedence, lower values are evaluated first; the most specific
//! resolvers run first and the framework-generic ones run last.
//!
//! A resolver must never use `Err` to signal "not applicable". Errors abort
//! the whole build for the current request and surface to the operator as a
//! [`JsonApiError::Resolver`] fault.
//!
//! [`JsonApiError::Resolver`]: crate::JsonApiError::Resolver

use axum::http::{HeaderMap, StatusCode};

use crate::caught::Caught;
use crate::error::BoxError;
use crate::messages::Resolvable;

mod mapping;
mod resolvable;
mod status;
mod validation;
mod web;

pub use mapping::MappingExceptionResolver;
pub use resolvable::ResolvableExceptionResolver;
pub use status::DeclaredStatusResolver;
pub use validation::ValidationExceptionResolver;
pub use web::WebExceptionResolver;

/// Everything the builder needs to construct an error response.
#[derive(Debug, Clone)]
pub struct ResolvedException {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub errors: Vec<Resolvable>,
}

impl ResolvedException {
    pub fn new(status: StatusCode, errors: Vec<Resolvable>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            errors,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Strategy that maps a caught error to a status and error set, or declines.
pub trait ExceptionResolver: Send + Sync {
    /// Name used in fault diagnostics.
    fn name(&self) -> &'static str;

    /// Relative precedence, lower values are evaluated first.
    fn order(&self) -> i32 {
        crate::order::LOWEST_PRECEDENCE
    }

    /// Inspect the caught error. `Ok(None)` declines.
    fn resolve(&self, caught: &Caught) -> Result<Option<ResolvedException>, BoxError>;
}
