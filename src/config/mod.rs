//! Externally supplied configuration.

use serde::Deserialize;

/// Configuration surface consumed by the builder factory.
///
/// Deserializes from whatever configuration layer the embedding
/// application uses, with kebab-case keys:
///
/// ```
/// use jsonapi_errors::config::JsonApiErrorProperties;
///
/// let properties: JsonApiErrorProperties = serde_json::from_str(
///     r#"{"include-stack-trace": true, "default-locale": "de-DE"}"#,
/// ).unwrap();
///
/// assert!(properties.include_stack_trace);
/// assert_eq!(properties.default_error_code, "exception.error-message");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct JsonApiErrorProperties {
    /// Whether error responses should include the caught error's cause chain.
    pub include_stack_trace: bool,

    /// Message code used when no resolver claims a caught error.
    pub default_error_code: String,

    /// Locale used for catalog lookups.
    pub default_locale: String,
}

impl Default for JsonApiErrorProperties {
    fn default() -> Self {
        Self {
            include_stack_trace: false,
            default_error_code: "exception.error-message".to_string(),
            default_locale: "en".to_string(),
        }
    }
}
