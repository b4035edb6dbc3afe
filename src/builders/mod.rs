//! Construction and execution of the error resolution pipeline.
//!
//! [`JsonApiErrorsBuilderFactory`] is the configuration surface: it collects
//! resolvers, message catalogs, mappings and declared statuses, then freezes
//! everything into an immutable [`JsonApiErrorsBuilder`] that concurrent
//! requests share without locking.

use std::error::Error;
use std::sync::Arc;

use axum::http::StatusCode;

use crate::caught::Caught;
use crate::config::JsonApiErrorProperties;
use crate::error::{JsonApiError, Result};
use crate::logging::{ErrorLogger, NoopErrorLogger};
use crate::mappings::{DeclaredStatuses, ErrorMappingRegistry};
use crate::messages::{
    CatalogMessageSource, CompositeMessageSource, ErrorMessageSource, Locale, MessageBundle,
    MessageCatalog, Resolvable,
};
use crate::resolvers::{
    DeclaredStatusResolver, ExceptionResolver, MappingExceptionResolver,
    ResolvableExceptionResolver, ResolvedException, ValidationExceptionResolver,
    WebExceptionResolver,
};
use crate::response::{ErrorResponse, JsonApiErrors};

/// The façade: turns a caught error into a complete error response.
pub struct JsonApiErrorsBuilder {
    logger: Arc<dyn ErrorLogger>,
    message_source: Arc<dyn ErrorMessageSource>,
    resolvers: Vec<Arc<dyn ExceptionResolver>>,
    default_error_code: String,
    include_stack_trace: bool,
}

impl JsonApiErrorsBuilder {
    /// Build the error response for a caught error.
    ///
    /// Logs the error, resolves it through the pipeline, translates every
    /// resolvable sorted by code for a deterministic payload, and optionally
    /// attaches the cause chain. Resolver and message-lookup faults
    /// propagate as [`JsonApiError`]; callers should answer those with a
    /// minimal hardcoded fallback response.
    pub fn build(&self, caught: &Caught) -> Result<ErrorResponse> {
        self.logger.log(caught);

        tracing::debug!(
            error_type = caught.type_name(),
            "building JSON API errors for a caught error"
        );

        let resolved = self.resolve(caught)?;

        let mut resolvables = resolved.errors;
        resolvables.sort_by(|a, b| a.code.cmp(&b.code));

        let mut errors = Vec::with_capacity(resolvables.len());
        for resolvable in &resolvables {
            let message =
                self.message_source
                    .get(resolvable)
                    .map_err(|source| JsonApiError::MessageLookup {
                        code: resolvable.code.clone(),
                        error_type: caught.type_name(),
                        source,
                    })?;
            errors.push(message);
        }

        let mut body = JsonApiErrors::new(errors);
        if self.include_stack_trace {
            body = body.with_stack_trace(caught.trace());
        }

        Ok(ErrorResponse {
            status: resolved.status,
            headers: resolved.headers,
            body,
        })
    }

    /// Run the resolver chain. Always succeeds for well-behaved resolvers:
    /// when every resolver declines, the configured default error code with
    /// an internal server error status is returned.
    pub fn resolve(&self, caught: &Caught) -> Result<ResolvedException> {
        for resolver in &self.resolvers {
            let resolved =
                resolver
                    .resolve(caught)
                    .map_err(|source| JsonApiError::Resolver {
                        resolver: resolver.name(),
                        error_type: caught.type_name(),
                        source,
                    })?;

            if let Some(resolved) = resolved {
                tracing::debug!(
                    resolver = resolver.name(),
                    status = %resolved.status,
                    "caught error resolved"
                );
                return Ok(resolved);
            }
        }

        tracing::debug!(
            error_type = caught.type_name(),
            code = %self.default_error_code,
            "no resolver matched, falling back to the default error code"
        );

        Ok(ResolvedException::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            vec![Resolvable::new(self.default_error_code.clone())],
        ))
    }
}

/// Configures and constructs a [`JsonApiErrorsBuilder`].
///
/// Message sources and resolvers are sorted by their precedence before the
/// builder is frozen; ties keep insertion order.
pub struct JsonApiErrorsBuilderFactory {
    registry: ErrorMappingRegistry,
    declared: DeclaredStatuses,
    resolvers: Vec<Arc<dyn ExceptionResolver>>,
    sources: Vec<Arc<dyn ErrorMessageSource>>,
    catalogs: Vec<Arc<dyn MessageCatalog>>,
    logger: Arc<dyn ErrorLogger>,
    default_error_code: String,
    locale: Locale,
    include_stack_trace: bool,
    use_default_resolvers: bool,
}

impl Default for JsonApiErrorsBuilderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonApiErrorsBuilderFactory {
    pub fn new() -> Self {
        Self {
            registry: ErrorMappingRegistry::new(),
            declared: DeclaredStatuses::new(),
            resolvers: Vec::new(),
            sources: Vec::new(),
            catalogs: Vec::new(),
            logger: Arc::new(NoopErrorLogger),
            default_error_code: "exception.error-message".to_string(),
            locale: Locale::default(),
            include_stack_trace: false,
            use_default_resolvers: false,
        }
    }

    /// Apply an externally bound configuration.
    pub fn with_properties(mut self, properties: &JsonApiErrorProperties) -> Self {
        self.include_stack_trace = properties.include_stack_trace;
        self.default_error_code = properties.default_error_code.clone();
        self.locale = Locale::new(properties.default_locale.clone());
        self
    }

    /// Whether responses should carry the caught error's cause chain.
    pub fn include_stack_trace(mut self, include: bool) -> Self {
        self.include_stack_trace = include;
        self
    }

    /// Message code used when no resolver claims a caught error.
    pub fn with_default_error_code(mut self, code: impl Into<String>) -> Self {
        self.default_error_code = code.into();
        self
    }

    /// Locale used for catalog lookups.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_error_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Add a pre-built message source.
    pub fn with_message_source(mut self, source: Arc<dyn ErrorMessageSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a message catalog, wrapped into a [`CatalogMessageSource`] with
    /// the factory's locale when the builder is constructed.
    pub fn with_catalog(mut self, catalog: Arc<dyn MessageCatalog>) -> Self {
        self.catalogs.push(catalog);
        self
    }

    /// Add an in-memory message bundle.
    pub fn with_bundle(self, bundle: MessageBundle) -> Self {
        self.with_catalog(Arc::new(bundle))
    }

    /// Add a custom exception resolver.
    pub fn with_exception_resolver(mut self, resolver: Arc<dyn ExceptionResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Wire the five built-in resolvers over the factory's registry and
    /// declared-status table.
    pub fn with_default_resolvers(mut self) -> Self {
        self.use_default_resolvers = true;
        self
    }

    /// Contribute error mappings. May be called repeatedly by independent
    /// contributors; all of them mutate the same registry.
    pub fn configure_mappings(mut self, configure: impl FnOnce(&mut ErrorMappingRegistry)) -> Self {
        configure(&mut self.registry);
        self
    }

    /// Declare the response status and reason code for an error type.
    pub fn declare_status<E: Error + 'static>(
        mut self,
        status: StatusCode,
        reason: impl Into<String>,
    ) -> Self {
        self.declared.declare::<E>(status, reason);
        self
    }

    /// Freeze the configuration into an immutable builder.
    ///
    /// Fails with [`JsonApiError::Configuration`] when no message source or
    /// no resolver is configured.
    pub fn build(self) -> Result<JsonApiErrorsBuilder> {
        let registry = Arc::new(self.registry);
        let declared = Arc::new(self.declared);

        let mut resolvers = self.resolvers;
        if self.use_default_resolvers {
            resolvers.push(Arc::new(ResolvableExceptionResolver::new(declared.clone())));
            resolvers.push(Arc::new(MappingExceptionResolver::new(registry.clone())));
            resolvers.push(Arc::new(DeclaredStatusResolver::new(declared.clone())));
            resolvers.push(Arc::new(ValidationExceptionResolver::new()));
            resolvers.push(Arc::new(WebExceptionResolver::new()));
        }

        if resolvers.is_empty() {
            return Err(JsonApiError::Configuration(
                "at least one exception resolver must be configured".to_string(),
            ));
        }

        let mut sources = self.sources;
        for catalog in self.catalogs {
            sources.push(Arc::new(CatalogMessageSource::new(
                catalog,
                self.locale.clone(),
            )));
        }

        if sources.is_empty() {
            return Err(JsonApiError::Configuration(
                "at least one error message source must be configured".to_string(),
            ));
        }

        resolvers.sort_by_key(|resolver| resolver.order());
        sources.sort_by_key(|source| source.order());

        let mut composite = CompositeMessageSource::new();
        for source in sources {
            composite.add_source(source);
        }

        Ok(JsonApiErrorsBuilder {
            logger: self.logger,
            message_source: Arc::new(composite),
            resolvers,
            default_error_code: self.default_error_code,
            include_stack_trace: self.include_stack_trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::header;
    use serde_json::Value;

    use super::*;
    use crate::error::BoxError;
    use crate::request::RequestError;
    use crate::validation::{BindingErrors, FieldError};

    #[derive(Debug, thiserror::Error)]
    #[error("conflicting write")]
    struct ConflictingWrite;

    #[derive(Debug, thiserror::Error)]
    #[error("completely unknown")]
    struct UnknownError;

    fn bundle() -> MessageBundle {
        MessageBundle::new()
            .with_message("exception.error-message", "An unexpected error occurred")
            .with_message("exception.x", "Conflicting write detected")
            .with_message("exception.missing_parameter", "Parameter {0} of type {1} is missing")
            .with_message("exception.method-not-supported.title", "Method Not Allowed")
            .with_message("exception.method-not-supported", "Use one of: {0}")
            .with_message("exception.invalid_email", "Email address is not valid")
            .with_message("NotEmpty", "Must not be empty")
    }

    fn builder() -> JsonApiErrorsBuilder {
        JsonApiErrorsBuilderFactory::new()
            .with_bundle(bundle())
            .with_default_resolvers()
            .configure_mappings(|registry| {
                registry
                    .register::<ConflictingWrite>()
                    .code("exception.x")
                    .status(StatusCode::CONFLICT);
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_registry_mapping_round_trip() {
        let response = builder().build(&Caught::new(ConflictingWrite)).unwrap();

        assert_eq!(response.status, StatusCode::CONFLICT);
        assert_eq!(response.body.errors.len(), 1);
        assert_eq!(response.body.errors[0].code, "exception.x");
        assert_eq!(
            response.body.errors[0].detail.as_deref(),
            Some("Conflicting write detected")
        );
    }

    #[test]
    fn test_unmatched_error_falls_back_to_default_code() {
        let response = builder().build(&Caught::new(UnknownError)).unwrap();

        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body.errors[0].code, "exception.error-message");
        assert_eq!(
            response.body.errors[0].detail.as_deref(),
            Some("An unexpected error occurred")
        );
    }

    #[test]
    fn test_missing_parameter_scenario() {
        let caught = Caught::new(RequestError::MissingParameter {
            name: "id".to_string(),
            expected: "Long".to_string(),
        });

        let response = builder().build(&caught).unwrap();
        let error = &response.body.errors[0];

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "exception.missing_parameter");
        assert_eq!(error.detail.as_deref(), Some("Parameter id of type Long is missing"));
        assert_eq!(
            error.source.as_ref().unwrap().get("parameter"),
            Some(&Value::from("id"))
        );
    }

    #[test]
    fn test_method_not_allowed_scenario() {
        use axum::http::Method;

        let caught = Caught::new(RequestError::MethodNotAllowed {
            method: Method::DELETE,
            supported: vec![Method::GET, Method::POST],
        });

        let response = builder().build(&caught).unwrap();

        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers.get(header::ALLOW).unwrap(), "GET, POST");

        let error = &response.body.errors[0];
        assert_eq!(error.code, "exception.method-not-supported");
        assert_eq!(error.title.as_deref(), Some("Method Not Allowed"));
        assert_eq!(error.detail.as_deref(), Some("Use one of: GET, POST"));
    }

    #[test]
    fn test_validation_errors_are_sorted_by_code() {
        let caught = Caught::new(BindingErrors {
            target: "user".to_string(),
            errors: vec![
                FieldError::new("name", "NotEmpty"),
                FieldError::new("email", "Email").with_default_message("{exception.invalid_email}"),
            ],
        });

        let response = builder().build(&caught).unwrap();

        assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.body.errors.len(), 2);
        // sorted lexicographically, NotEmpty before exception.invalid_email
        assert_eq!(response.body.errors[0].code, "NotEmpty");
        assert_eq!(response.body.errors[1].code, "exception.invalid_email");
        assert_eq!(
            response.body.errors[1].source.as_ref().unwrap().get("pointer"),
            Some(&Value::from("email"))
        );
    }

    #[test]
    fn test_stack_trace_is_attached_when_enabled() {
        let builder = JsonApiErrorsBuilderFactory::new()
            .with_bundle(bundle())
            .with_default_resolvers()
            .include_stack_trace(true)
            .build()
            .unwrap();

        let response = builder.build(&Caught::new(UnknownError)).unwrap();
        assert!(response.body.stack_trace.as_deref().unwrap().contains("completely unknown"));

        let without = self::builder().build(&Caught::new(UnknownError)).unwrap();
        assert!(without.body.stack_trace.is_none());
    }

    #[test]
    fn test_message_lookup_fault_propagates() {
        let builder = JsonApiErrorsBuilderFactory::new()
            .with_bundle(MessageBundle::new())
            .with_default_resolvers()
            .configure_mappings(|registry| {
                registry
                    .register::<ConflictingWrite>()
                    .code("exception.untranslated")
                    .status(StatusCode::CONFLICT);
            })
            .build()
            .unwrap();

        let error = builder.build(&Caught::new(ConflictingWrite)).unwrap_err();
        match error {
            JsonApiError::MessageLookup { code, error_type, .. } => {
                assert_eq!(code, "exception.untranslated");
                assert!(error_type.ends_with("ConflictingWrite"));
            }
            other => panic!("expected a message lookup fault, got {other:?}"),
        }
    }

    struct FaultyResolver;

    impl ExceptionResolver for FaultyResolver {
        fn name(&self) -> &'static str {
            "FaultyResolver"
        }

        fn order(&self) -> i32 {
            crate::order::HIGHEST_PRECEDENCE
        }

        fn resolve(&self, _caught: &Caught) -> std::result::Result<Option<ResolvedException>, BoxError> {
            Err("resolver bug".into())
        }
    }

    #[test]
    fn test_resolver_fault_aborts_the_build() {
        let builder = JsonApiErrorsBuilderFactory::new()
            .with_bundle(bundle())
            .with_default_resolvers()
            .with_exception_resolver(Arc::new(FaultyResolver))
            .build()
            .unwrap();

        let error = builder.build(&Caught::new(UnknownError)).unwrap_err();
        match error {
            JsonApiError::Resolver { resolver, .. } => assert_eq!(resolver, "FaultyResolver"),
            other => panic!("expected a resolver fault, got {other:?}"),
        }
    }

    #[test]
    fn test_declared_status_resolution() {
        let builder = JsonApiErrorsBuilderFactory::new()
            .with_bundle(bundle().with_message("exception.unknown_gone", "It is gone"))
            .with_default_resolvers()
            .declare_status::<UnknownError>(StatusCode::GONE, "exception.unknown_gone")
            .build()
            .unwrap();

        let response = builder.build(&Caught::new(UnknownError)).unwrap();
        assert_eq!(response.status, StatusCode::GONE);
        assert_eq!(response.body.errors[0].code, "exception.unknown_gone");
    }

    #[test]
    fn test_registry_mapping_wins_over_web_resolver() {
        // a mapped transport error resolves through the registry, which
        // runs at a higher precedence than the web resolver
        let builder = JsonApiErrorsBuilderFactory::new()
            .with_bundle(bundle().with_message("exception.custom_404", "Custom not found"))
            .with_default_resolvers()
            .configure_mappings(|registry| {
                registry
                    .register::<RequestError>()
                    .code("exception.custom_404")
                    .status(StatusCode::NOT_FOUND);
            })
            .build()
            .unwrap();

        let caught = Caught::new(RequestError::NoRouteFound {
            path: "/missing".to_string(),
        });
        let response = builder.build(&caught).unwrap();

        assert_eq!(response.body.errors[0].code, "exception.custom_404");
    }

    struct CountingLogger {
        calls: AtomicUsize,
    }

    impl ErrorLogger for CountingLogger {
        fn log(&self, _caught: &Caught) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_logger_is_invoked_once_per_build() {
        let logger = Arc::new(CountingLogger {
            calls: AtomicUsize::new(0),
        });

        let builder = JsonApiErrorsBuilderFactory::new()
            .with_bundle(bundle())
            .with_default_resolvers()
            .with_error_logger(logger.clone())
            .build()
            .unwrap();

        builder.build(&Caught::new(UnknownError)).unwrap();
        builder.build(&Caught::new(UnknownError)).unwrap();

        assert_eq!(logger.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_factory_rejects_empty_configuration() {
        let no_sources = JsonApiErrorsBuilderFactory::new().with_default_resolvers().build();
        assert!(matches!(no_sources, Err(JsonApiError::Configuration(_))));

        let no_resolvers = JsonApiErrorsBuilderFactory::new().with_bundle(bundle()).build();
        assert!(matches!(no_resolvers, Err(JsonApiError::Configuration(_))));
    }

    #[test]
    fn test_properties_are_applied() {
        let properties: JsonApiErrorProperties = serde_json::from_str(
            r#"{"include-stack-trace": true, "default-error-code": "exception.fallback"}"#,
        )
        .unwrap();

        let builder = JsonApiErrorsBuilderFactory::new()
            .with_properties(&properties)
            .with_bundle(MessageBundle::new().with_message("exception.fallback", "Fallback"))
            .with_default_resolvers()
            .build()
            .unwrap();

        let response = builder.build(&Caught::new(UnknownError)).unwrap();
        assert_eq!(response.body.errors[0].code, "exception.fallback");
        assert!(response.body.stack_trace.is_some());
    }

    #[test]
    fn test_application_catalog_overrides_library_defaults() {
        let defaults = MessageBundle::new()
            .with_message("exception.error-message", "Library default message");
        let overrides = MessageBundle::new()
            .with_message("exception.error-message", "Application override");

        let builder = JsonApiErrorsBuilderFactory::new()
            .with_message_source(Arc::new(
                CatalogMessageSource::new(Arc::new(defaults), Locale::default()).with_order(100),
            ))
            .with_message_source(Arc::new(
                CatalogMessageSource::new(Arc::new(overrides), Locale::default()).with_order(0),
            ))
            .with_default_resolvers()
            .build()
            .unwrap();

        let response = builder.build(&Caught::new(UnknownError)).unwrap();
        assert_eq!(
            response.body.errors[0].detail.as_deref(),
            Some("Application override")
        );
    }
}
