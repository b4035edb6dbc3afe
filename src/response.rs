//! The JSON:API error payload and response glue.

use std::collections::BTreeMap;

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single translated error object.
///
/// `title`, `detail` and `source` are omitted from the payload when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<BTreeMap<String, Value>>,
}

/// The JSON:API error response body.
///
/// The stack trace is omitted unless explicitly enabled on the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonApiErrors {
    pub errors: Vec<ErrorMessage>,

    #[serde(
        rename = "stackTrace",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub stack_trace: Option<String>,
}

impl JsonApiErrors {
    pub fn new(errors: Vec<ErrorMessage>) -> Self {
        Self {
            errors,
            stack_trace: None,
        }
    }

    pub fn with_stack_trace(mut self, stack_trace: impl Into<String>) -> Self {
        self.stack_trace = Some(stack_trace.into());
        self
    }
}

/// The fully assembled error response: status, headers and body.
///
/// The crate never writes to the wire itself; this converts into an
/// `axum` response for transports that want it, everyone else can read
/// the fields directly.
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: JsonApiErrors,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();

        for (name, value) in self.headers.iter() {
            response.headers_mut().append(name.clone(), value.clone());
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let body = JsonApiErrors::new(vec![ErrorMessage {
            code: "exception.not_found".to_string(),
            title: None,
            detail: Some("Not Found".to_string()),
            source: None,
        }]);

        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(
            json,
            r#"{"errors":[{"code":"exception.not_found","detail":"Not Found"}]}"#
        );
    }

    #[test]
    fn test_stack_trace_is_present_only_when_set() {
        let body = JsonApiErrors::new(vec![]).with_stack_trace("trace");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"stackTrace\":\"trace\""));
    }

    #[test]
    fn test_source_serializes_as_object() {
        let mut source = BTreeMap::new();
        source.insert("pointer".to_string(), Value::from("address/city"));

        let message = ErrorMessage {
            code: "exception.invalid".to_string(),
            title: Some("Invalid".to_string()),
            detail: Some("city is invalid".to_string()),
            source: Some(source),
        };

        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""source":{"pointer":"address/city"}"#));
    }

    #[test]
    fn test_round_trips_through_serde() {
        let body = JsonApiErrors::new(vec![ErrorMessage {
            code: "exception.conflict".to_string(),
            title: None,
            detail: Some("Already exists".to_string()),
            source: None,
        }]);

        let json = serde_json::to_string(&body).unwrap();
        let parsed: JsonApiErrors = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_into_response_keeps_status_and_headers() {
        use axum::http::header;

        let mut headers = HeaderMap::new();
        headers.insert(header::ALLOW, "GET, POST".parse().unwrap());

        let response = ErrorResponse {
            status: StatusCode::METHOD_NOT_ALLOWED,
            headers,
            body: JsonApiErrors::new(vec![]),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "GET, POST");
    }
}
