//! Message catalog collaborators.
//!
//! A [`MessageCatalog`] resolves a lookup key for a locale into an
//! interpolated string. The crate ships an in-memory [`MessageBundle`]
//! catalog; loading bundles from external storage is left to the embedding
//! application.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// A language/region tag such as `en` or `de-DE`.
///
/// Lookups walk the fallback chain from the most specific tag down to the
/// bare language, so a `de-DE` locale falls back to `de` templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn tag(&self) -> &str {
        &self.0
    }

    /// The tag followed by every less specific prefix, e.g.
    /// `en-US` yields `["en-US", "en"]`.
    pub fn fallback_chain(&self) -> Vec<&str> {
        let mut chain = vec![self.0.as_str()];
        let mut tag = self.0.as_str();

        while let Some(separator) = tag.rfind('-') {
            tag = &tag[..separator];
            chain.push(tag);
        }

        chain
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self("en".to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Collaborator interface wrapped by [`CatalogMessageSource`].
///
/// [`CatalogMessageSource`]: crate::messages::CatalogMessageSource
pub trait MessageCatalog: Send + Sync {
    /// Resolve and interpolate the template stored under `key`, or return
    /// `None` when the catalog has no entry for it.
    fn resolve(&self, key: &str, locale: &Locale, arguments: &[Value]) -> Option<String>;
}

/// Interpolate positional `{0}`-style placeholders with the given arguments.
///
/// Placeholders without a matching argument and anything that is not a valid
/// placeholder are kept verbatim.
pub fn format_message(template: &str, arguments: &[Value]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let tail = &rest[open..];

        match tail.find('}') {
            Some(close) => {
                let placeholder = &tail[1..close];

                match placeholder.parse::<usize>() {
                    Ok(index) if index < arguments.len() => {
                        output.push_str(&display_value(&arguments[index]));
                    }
                    _ => output.push_str(&tail[..=close]),
                }

                rest = &tail[close + 1..];
            }
            None => {
                output.push_str(tail);
                rest = "";
            }
        }
    }

    output.push_str(rest);
    output
}

/// Render an opaque argument without the quotes JSON would add to strings.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// In-memory message catalog with per-locale overrides.
///
/// Default templates apply to every locale; localized templates win when the
/// locale fallback chain reaches them.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    templates: HashMap<String, String>,
    localized: HashMap<String, HashMap<String, String>>,
}

impl MessageBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default template, used for every locale.
    pub fn with_message(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    /// Add a template for a specific locale tag.
    pub fn with_localized_message(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        self.localized
            .entry(locale.into())
            .or_default()
            .insert(key.into(), template.into());
        self
    }

    /// Build a bundle of default templates from a flat JSON object of
    /// `key -> template` pairs.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let templates: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self {
            templates,
            localized: HashMap::new(),
        })
    }

    fn template(&self, key: &str, locale: &Locale) -> Option<&str> {
        for tag in locale.fallback_chain() {
            if let Some(template) = self.localized.get(tag).and_then(|templates| templates.get(key))
            {
                return Some(template);
            }
        }

        self.templates.get(key).map(String::as_str)
    }
}

impl MessageCatalog for MessageBundle {
    fn resolve(&self, key: &str, locale: &Locale, arguments: &[Value]) -> Option<String> {
        self.template(key, locale)
            .map(|template| format_message(template, arguments))
    }
}
