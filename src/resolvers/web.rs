use axum::http::{HeaderMap, HeaderValue, StatusCode, header};

use crate::caught::Caught;
use crate::error::BoxError;
use crate::messages::Resolvable;
use crate::order::LOWEST_PRECEDENCE;
use crate::request::RequestError;

use super::{ExceptionResolver, ResolvedException};

/// Resolves the fixed catalog of transport-level [`RequestError`]s.
///
/// The most framework-generic resolver, it runs last so that application
/// specific resolutions always win.
pub struct WebExceptionResolver {
    order: i32,
}

impl WebExceptionResolver {
    pub fn new() -> Self {
        Self {
            order: LOWEST_PRECEDENCE,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl Default for WebExceptionResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ExceptionResolver for WebExceptionResolver {
    fn name(&self) -> &'static str {
        "WebExceptionResolver"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn resolve(&self, caught: &Caught) -> Result<Option<ResolvedException>, BoxError> {
        let Some(error) = caught.downcast_ref::<RequestError>() else {
            return Ok(None);
        };

        let resolved = match error {
            RequestError::MethodNotAllowed { supported, .. } => {
                let allowed = comma_join(supported);
                ResolvedException::new(
                    StatusCode::METHOD_NOT_ALLOWED,
                    vec![
                        Resolvable::new("exception.method-not-supported")
                            .with_argument(allowed.clone()),
                    ],
                )
                .with_headers(single_header(header::ALLOW, &allowed))
            }

            RequestError::NotAcceptable { supported } => {
                let accepted = supported.join(", ");
                ResolvedException::new(
                    StatusCode::NOT_ACCEPTABLE,
                    vec![
                        Resolvable::new("exception.content-type-not-supported")
                            .with_argument(accepted.clone()),
                    ],
                )
                .with_headers(single_header(header::ACCEPT, &accepted))
            }

            RequestError::UnsupportedMediaType { supported, .. } => {
                let accepted = supported.join(", ");
                ResolvedException::new(
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    vec![
                        Resolvable::new("exception.content-type-not-supported")
                            .with_argument(accepted.clone()),
                    ],
                )
                .with_headers(single_header(header::ACCEPT, &accepted))
            }

            RequestError::MissingParameter { name, expected } => ResolvedException::new(
                StatusCode::BAD_REQUEST,
                vec![
                    Resolvable::new("exception.missing_parameter")
                        .with_argument(name.clone())
                        .with_argument(expected.clone())
                        .with_source_entry("parameter", name.clone()),
                ],
            ),

            RequestError::ParameterTypeMismatch { name, expected } => ResolvedException::new(
                StatusCode::BAD_REQUEST,
                vec![
                    Resolvable::new("exception.invalid_parameter")
                        .with_argument(name.clone())
                        .with_argument(expected.clone())
                        .with_source_entry("parameter", name.clone()),
                ],
            ),

            RequestError::MissingPart { name } => ResolvedException::new(
                StatusCode::BAD_REQUEST,
                vec![
                    Resolvable::new("exception.missing_file_parameter")
                        .with_argument(name.clone())
                        .with_source_entry("parameter", name.clone()),
                ],
            ),

            RequestError::MissingHeader { name, expected } => ResolvedException::new(
                StatusCode::BAD_REQUEST,
                vec![
                    Resolvable::new("exception.missing_header")
                        .with_argument(name.clone())
                        .with_argument(expected.clone()),
                ],
            ),

            RequestError::MissingCookie { name, expected } => ResolvedException::new(
                StatusCode::BAD_REQUEST,
                vec![
                    Resolvable::new("exception.missing_cookie")
                        .with_argument(name.clone())
                        .with_argument(expected.clone()),
                ],
            ),

            RequestError::MissingMatrixVariable { name, expected } => ResolvedException::new(
                StatusCode::BAD_REQUEST,
                vec![
                    Resolvable::new("exception.missing_matrix_variable")
                        .with_argument(name.clone())
                        .with_argument(expected.clone()),
                ],
            ),

            RequestError::NoRouteFound { path } => ResolvedException::new(
                StatusCode::NOT_FOUND,
                vec![Resolvable::new("exception.not_found").with_argument(path.clone())],
            ),
        };

        Ok(Some(resolved))
    }
}

fn comma_join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn single_header(name: header::HeaderName, value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(_) => {
            tracing::debug!(header = %name, value, "dropping response header with an invalid value");
        }
    }

    headers
}
