use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;

use crate::caught::Caught;
use crate::error::BoxError;
use crate::mappings::DeclaredStatuses;
use crate::messages::Resolvable;
use crate::order::LOWEST_PRECEDENCE;

use super::{ExceptionResolver, ResolvedException};

/// Resolves errors through the declared-status table.
///
/// The resolution for a type never changes at runtime, so results are
/// memoized per `TypeId` in a concurrent map. Concurrent writes for the
/// same type always produce an equivalent entry, last write wins.
pub struct DeclaredStatusResolver {
    declared: Arc<DeclaredStatuses>,
    cache: DashMap<TypeId, ResolvedException>,
    order: i32,
}

impl DeclaredStatusResolver {
    pub fn new(declared: Arc<DeclaredStatuses>) -> Self {
        Self {
            declared,
            cache: DashMap::new(),
            order: LOWEST_PRECEDENCE - 3,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

impl ExceptionResolver for DeclaredStatusResolver {
    fn name(&self) -> &'static str {
        "DeclaredStatusResolver"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn resolve(&self, caught: &Caught) -> Result<Option<ResolvedException>, BoxError> {
        if let Some(hit) = self.cache.get(&caught.type_id()) {
            return Ok(Some(hit.clone()));
        }

        let Some(declared) = self.declared.get(caught.type_id()) else {
            return Ok(None);
        };

        let resolved = ResolvedException::new(
            declared.status,
            vec![Resolvable::new(declared.reason.clone())],
        );
        self.cache.insert(caught.type_id(), resolved.clone());

        Ok(Some(resolved))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("report is gone")]
    struct ReportGone;

    #[derive(Debug, thiserror::Error)]
    #[error("undeclared")]
    struct Undeclared;

    fn resolver() -> DeclaredStatusResolver {
        let mut declared = DeclaredStatuses::new();
        declared.declare::<ReportGone>(StatusCode::GONE, "exception.report_gone");
        DeclaredStatusResolver::new(Arc::new(declared))
    }

    #[test]
    fn test_resolves_declared_type() {
        let resolved = resolver().resolve(&Caught::new(ReportGone)).unwrap().unwrap();

        assert_eq!(resolved.status, StatusCode::GONE);
        assert_eq!(resolved.errors[0].code, "exception.report_gone");
    }

    #[test]
    fn test_declines_undeclared_type() {
        assert!(resolver().resolve(&Caught::new(Undeclared)).unwrap().is_none());
    }

    #[test]
    fn test_resolution_is_cached_per_type() {
        let resolver = resolver();

        let first = resolver.resolve(&Caught::new(ReportGone)).unwrap().unwrap();
        assert_eq!(resolver.cache.len(), 1);

        let second = resolver.resolve(&Caught::new(ReportGone)).unwrap().unwrap();
        assert_eq!(resolver.cache.len(), 1);
        assert_eq!(first.status, second.status);
        assert_eq!(first.errors[0].code, second.errors[0].code);
    }

    #[test]
    fn test_misses_are_not_cached() {
        let resolver = resolver();
        resolver.resolve(&Caught::new(Undeclared)).unwrap();
        assert!(resolver.cache.is_empty());
    }
}
