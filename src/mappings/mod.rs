//! Declarative exception-to-error mappings.
//!
//! Both tables in this module are filled during the configuration phase and
//! frozen behind an `Arc` before the first request, so request handling
//! reads them without locking.

use std::any::TypeId;
use std::collections::HashMap;
use std::error::Error;

use axum::http::StatusCode;

/// How a single error type is converted into a JSON:API error.
///
/// Returned by [`ErrorMappingRegistry::register`] as a mutable record the
/// caller decorates:
///
/// ```
/// use jsonapi_errors::mappings::ErrorMappingRegistry;
/// use axum::http::StatusCode;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("user already exists")]
/// struct DuplicateUser;
///
/// let mut registry = ErrorMappingRegistry::new();
/// registry.register::<DuplicateUser>()
///     .code("exception.duplicate_user")
///     .status(StatusCode::CONFLICT);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorMappingRegistration {
    code: Option<String>,
    status: StatusCode,
}

impl ErrorMappingRegistration {
    fn new() -> Self {
        Self {
            code: None,
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Set the message code produced for the mapped error type.
    pub fn code(&mut self, code: impl Into<String>) -> &mut Self {
        self.code = Some(code.into());
        self
    }

    /// Set the HTTP status produced for the mapped error type.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn error_code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn http_status(&self) -> StatusCode {
        self.status
    }
}

/// Exact-type table of error-to-(code, status) mappings.
///
/// Lookups match the concrete error type only, there is no supertype or
/// trait matching. Every concrete error type that should be mapped must be
/// registered explicitly; this is a deliberate simplicity and performance
/// trade-off.
#[derive(Debug, Default)]
pub struct ErrorMappingRegistry {
    mappings: HashMap<TypeId, ErrorMappingRegistration>,
}

impl ErrorMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the registration for the given error type.
    ///
    /// Registering the same type twice returns the existing record for
    /// further mutation.
    pub fn register<E: Error + 'static>(&mut self) -> &mut ErrorMappingRegistration {
        self.mappings
            .entry(TypeId::of::<E>())
            .or_insert_with(ErrorMappingRegistration::new)
    }

    pub fn get(&self, type_id: TypeId) -> Option<&ErrorMappingRegistration> {
        self.mappings.get(&type_id)
    }

    pub fn get_for<E: Error + 'static>(&self) -> Option<&ErrorMappingRegistration> {
        self.get(TypeId::of::<E>())
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// A status and reason declared for an error type.
#[derive(Debug, Clone)]
pub struct DeclaredStatus {
    pub status: StatusCode,
    pub reason: String,
}

/// Explicit per-type response status metadata.
///
/// The queryable replacement for annotation scanning: error types declare
/// their response status and reason code here during configuration, and the
/// declared-status resolver reads the table at request time.
#[derive(Debug, Default)]
pub struct DeclaredStatuses {
    declarations: HashMap<TypeId, DeclaredStatus>,
}

impl DeclaredStatuses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the response status and reason code for an error type.
    pub fn declare<E: Error + 'static>(
        &mut self,
        status: StatusCode,
        reason: impl Into<String>,
    ) -> &mut Self {
        self.declarations.insert(
            TypeId::of::<E>(),
            DeclaredStatus {
                status,
                reason: reason.into(),
            },
        );
        self
    }

    pub fn get(&self, type_id: TypeId) -> Option<&DeclaredStatus> {
        self.declarations.get(&type_id)
    }

    pub fn get_for<E: Error + 'static>(&self) -> Option<&DeclaredStatus> {
        self.get(TypeId::of::<E>())
    }
}
