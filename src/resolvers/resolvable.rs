use std::sync::Arc;

use axum::http::StatusCode;

use crate::caught::Caught;
use crate::error::BoxError;
use crate::mappings::DeclaredStatuses;
use crate::order::LOWEST_PRECEDENCE;

use super::{ExceptionResolver, ResolvedException};

/// Resolves errors that carried their own [`Resolvable`] at wrap time.
///
/// The status comes from the declared-status table when the error type has
/// an entry there, otherwise internal server error. Runs before every other
/// built-in resolver since the error itself is the most specific source of
/// truth.
///
/// [`Resolvable`]: crate::messages::Resolvable
pub struct ResolvableExceptionResolver {
    declared: Arc<DeclaredStatuses>,
    order: i32,
}

impl ResolvableExceptionResolver {
    pub fn new(declared: Arc<DeclaredStatuses>) -> Self {
        Self {
            declared,
            order: LOWEST_PRECEDENCE - 5,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl ExceptionResolver for ResolvableExceptionResolver {
    fn name(&self) -> &'static str {
        "ResolvableExceptionResolver"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn resolve(&self, caught: &Caught) -> Result<Option<ResolvedException>, BoxError> {
        let Some(resolvable) = caught.as_resolvable() else {
            return Ok(None);
        };

        let status = self
            .declared
            .get(caught.type_id())
            .map(|declared| declared.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Ok(Some(ResolvedException::new(status, vec![resolvable.clone()])))
    }
}
