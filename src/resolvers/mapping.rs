use std::sync::Arc;

use crate::caught::Caught;
use crate::error::BoxError;
use crate::mappings::ErrorMappingRegistry;
use crate::messages::Resolvable;
use crate::order::LOWEST_PRECEDENCE;

use super::{ExceptionResolver, ResolvedException};

/// Resolves errors through the [`ErrorMappingRegistry`].
///
/// An exact-type registry hit produces a single resolvable carrying the
/// mapping's code and the mapping's status. A registered mapping without a
/// code is reported as a fault instead of a decline, it can only be a
/// configuration mistake.
pub struct MappingExceptionResolver {
    registry: Arc<ErrorMappingRegistry>,
    order: i32,
}

impl MappingExceptionResolver {
    pub fn new(registry: Arc<ErrorMappingRegistry>) -> Self {
        Self {
            registry,
            order: LOWEST_PRECEDENCE - 4,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl ExceptionResolver for MappingExceptionResolver {
    fn name(&self) -> &'static str {
        "MappingExceptionResolver"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn resolve(&self, caught: &Caught) -> Result<Option<ResolvedException>, BoxError> {
        let Some(mapping) = self.registry.get(caught.type_id()) else {
            return Ok(None);
        };

        let Some(code) = mapping.error_code() else {
            return Err(format!(
                "error mapping for {} has no code configured",
                caught.type_name()
            )
            .into());
        };

        Ok(Some(ResolvedException::new(
            mapping.http_status(),
            vec![Resolvable::new(code)],
        )))
    }
}
