use std::sync::Arc;

use crate::order::HIGHEST_PRECEDENCE;
use crate::response::ErrorMessage;

use super::{ErrorMessageSource, Locale, NoSuchMessageError, Resolvable};

/// An [`ErrorMessageSource`] that delegates to an ordered list of children.
///
/// Children are consulted in the order they were added and the first
/// successful translation wins, which gives stacked catalogs
/// override-wins-if-present semantics. When every child fails, the last
/// failure is re-raised.
#[derive(Default)]
pub struct CompositeMessageSource {
    sources: Vec<Arc<dyn ErrorMessageSource>>,
}

impl CompositeMessageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child source. Only called during configuration, the
    /// composite is frozen once the builder is constructed.
    pub fn add_source(&mut self, source: Arc<dyn ErrorMessageSource>) {
        self.sources.push(source);
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl ErrorMessageSource for CompositeMessageSource {
    fn get(&self, resolvable: &Resolvable) -> Result<ErrorMessage, NoSuchMessageError> {
        let mut last_error = None;

        for source in &self.sources {
            match source.get(resolvable) {
                Ok(message) => return Ok(message),
                Err(error) => last_error = Some(error),
            }
        }

        Err(last_error.unwrap_or_else(|| NoSuchMessageError {
            code: resolvable.code.clone(),
            locale: Locale::default(),
        }))
    }

    fn order(&self) -> i32 {
        HIGHEST_PRECEDENCE
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingSource {
        calls: Arc<AtomicUsize>,
        result: Option<&'static str>,
    }

    impl ErrorMessageSource for CountingSource {
        fn get(&self, resolvable: &Resolvable) -> Result<ErrorMessage, NoSuchMessageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.result {
                Some(detail) => Ok(ErrorMessage {
                    code: resolvable.code.clone(),
                    title: None,
                    detail: Some(detail.to_string()),
                    source: None,
                }),
                None => Err(NoSuchMessageError {
                    code: resolvable.code.clone(),
                    locale: Locale::default(),
                }),
            }
        }
    }

    fn counting(result: Option<&'static str>) -> (Arc<AtomicUsize>, Arc<dyn ErrorMessageSource>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Arc::new(CountingSource {
            calls: calls.clone(),
            result,
        });
        (calls, source)
    }

    #[test]
    fn test_first_successful_child_wins() {
        let (first_calls, first) = counting(Some("from first"));
        let (second_calls, second) = counting(Some("from second"));

        let mut composite = CompositeMessageSource::new();
        composite.add_source(first);
        composite.add_source(second);
        assert!(!composite.is_empty());

        let message = composite.get(&Resolvable::new("exception.any")).unwrap();

        assert_eq!(message.detail.as_deref(), Some("from first"));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_child_is_skipped() {
        let (_, failing) = counting(None);
        let (_, succeeding) = counting(Some("found"));

        let mut composite = CompositeMessageSource::new();
        composite.add_source(failing);
        composite.add_source(succeeding);

        let message = composite.get(&Resolvable::new("exception.any")).unwrap();
        assert_eq!(message.detail.as_deref(), Some("found"));
    }

    #[test]
    fn test_all_children_failing_reraises_last_error() {
        let (_, first) = counting(None);
        let (_, second) = counting(None);

        let mut composite = CompositeMessageSource::new();
        composite.add_source(first);
        composite.add_source(second);

        let error = composite.get(&Resolvable::new("exception.any")).unwrap_err();
        assert_eq!(error.code, "exception.any");
    }

    #[test]
    fn test_empty_composite_synthesizes_error() {
        let composite = CompositeMessageSource::new();
        assert!(composite.is_empty());

        let error = composite.get(&Resolvable::new("exception.any")).unwrap_err();
        assert_eq!(error.code, "exception.any");
    }
}
