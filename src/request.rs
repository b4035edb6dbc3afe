//! Transport-level request failures.
//!
//! The fixed catalog of request-shape failures the web resolver knows how
//! to map. Integration glue converts framework rejections (extractor
//! failures, router misses) into these variants before wrapping them in a
//! [`Caught`].
//!
//! [`Caught`]: crate::Caught

use axum::http::Method;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    /// The route exists but not for this HTTP method.
    #[error("request method {method} is not supported")]
    MethodNotAllowed {
        method: Method,
        supported: Vec<Method>,
    },

    /// None of the producible media types satisfy the `Accept` header.
    #[error("none of the producible media types are acceptable")]
    NotAcceptable { supported: Vec<String> },

    /// The request payload's media type cannot be consumed.
    #[error("media type {media_type:?} is not supported")]
    UnsupportedMediaType {
        media_type: Option<String>,
        supported: Vec<String>,
    },

    /// A required query or form parameter is absent.
    #[error("required request parameter {name:?} of type {expected} is missing")]
    MissingParameter { name: String, expected: String },

    /// A parameter was present but could not be converted to its target type.
    #[error("request parameter {name:?} could not be converted to {expected}")]
    ParameterTypeMismatch { name: String, expected: String },

    /// A required multipart file part is absent.
    #[error("required file part {name:?} is missing")]
    MissingPart { name: String },

    /// A required request header is absent.
    #[error("required request header {name:?} of type {expected} is missing")]
    MissingHeader { name: String, expected: String },

    /// A required cookie is absent.
    #[error("required cookie {name:?} of type {expected} is missing")]
    MissingCookie { name: String, expected: String },

    /// A required matrix variable is absent.
    #[error("required matrix variable {name:?} of type {expected} is missing")]
    MissingMatrixVariable { name: String, expected: String },

    /// No route matched the request path.
    #[error("no route found for {path:?}")]
    NoRouteFound { path: String },
}
