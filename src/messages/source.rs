use std::sync::Arc;

use crate::order::LOWEST_PRECEDENCE;
use crate::response::ErrorMessage;

use super::{ErrorMessageSource, Locale, MessageCatalog, NoSuchMessageError, Resolvable};

/// An [`ErrorMessageSource`] backed by a [`MessageCatalog`].
///
/// The title is looked up under `"<code>.title"` and stays absent when the
/// catalog has no entry for it. The detail is looked up under
/// `"<code>.message"`, then `"<code>"`, then the resolvable's default
/// message; when all three are missing the lookup fails.
pub struct CatalogMessageSource {
    catalog: Arc<dyn MessageCatalog>,
    locale: Locale,
    order: i32,
}

impl CatalogMessageSource {
    pub fn new(catalog: Arc<dyn MessageCatalog>, locale: Locale) -> Self {
        Self {
            catalog,
            locale,
            order: LOWEST_PRECEDENCE,
        }
    }

    /// Override the precedence of this source within a composite.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl ErrorMessageSource for CatalogMessageSource {
    fn get(&self, resolvable: &Resolvable) -> Result<ErrorMessage, NoSuchMessageError> {
        let title = self.catalog.resolve(
            &format!("{}.title", resolvable.code),
            &self.locale,
            &resolvable.arguments,
        );

        let detail = self
            .catalog
            .resolve(
                &format!("{}.message", resolvable.code),
                &self.locale,
                &resolvable.arguments,
            )
            .or_else(|| {
                self.catalog
                    .resolve(&resolvable.code, &self.locale, &resolvable.arguments)
            })
            .or_else(|| resolvable.default_message.clone());

        let Some(detail) = detail else {
            return Err(NoSuchMessageError {
                code: resolvable.code.clone(),
                locale: self.locale.clone(),
            });
        };

        Ok(ErrorMessage {
            code: resolvable.code.clone(),
            title,
            detail: Some(detail),
            source: if resolvable.source.is_empty() {
                None
            } else {
                Some(resolvable.source.clone())
            },
        })
    }

    fn order(&self) -> i32 {
        self.order
    }
}
