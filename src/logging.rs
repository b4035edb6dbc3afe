//! Logger collaborator invoked once per build.

use crate::caught::Caught;

/// Side-effecting logger for caught errors.
///
/// Invoked exactly once per [`build`] call, before resolution starts. It
/// must not alter control flow.
///
/// [`build`]: crate::builders::JsonApiErrorsBuilder::build
pub trait ErrorLogger: Send + Sync {
    fn log(&self, caught: &Caught);
}

/// Discards every caught error. The default logger.
#[derive(Debug, Default)]
pub struct NoopErrorLogger;

impl ErrorLogger for NoopErrorLogger {
    fn log(&self, _caught: &Caught) {}
}

/// Logs caught errors through `tracing` at error level, including the
/// full cause chain.
#[derive(Debug, Default)]
pub struct TracingErrorLogger;

impl ErrorLogger for TracingErrorLogger {
    fn log(&self, caught: &Caught) {
        tracing::error!(error_type = caught.type_name(), "{}", caught.trace());
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[derive(Clone, Default)]
    struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CaptureWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_noop_logger_discards() {
        NoopErrorLogger.log(&Caught::new(Boom));
    }

    #[test]
    fn test_tracing_logger_emits_type_and_message() {
        let writer = CaptureWriter::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            TracingErrorLogger.log(&Caught::new(Boom));
        });

        let output = writer.contents();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Boom"));
        assert!(output.contains("boom"));
    }
}
