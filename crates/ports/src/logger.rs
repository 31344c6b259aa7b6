//! Structured logging boundary contract.

use cwlog_domain::{FieldMap, LogLevel, LogRecord};
use std::io;

/// Boundary contract for structured logging.
///
/// Collaborators that only need to emit events take a `&dyn LoggerPort` (or a
/// boxed one) instead of a concrete logger.
pub trait LoggerPort: Send + Sync {
    /// Logger name written to the `logger` field.
    fn name(&self) -> &str;

    /// Returns true when records at `level` would be emitted.
    fn is_enabled_for(&self, level: LogLevel) -> bool;

    /// Run a record through the pipeline and write the rendered line.
    ///
    /// Filtered records return `Ok(())`; only sink write failures surface.
    fn log(&self, record: LogRecord) -> io::Result<()>;

    /// Create a child logger whose context fields are added to every event.
    fn bind(&self, fields: FieldMap) -> Box<dyn LoggerPort>;

    /// Convenience: debug event.
    #[track_caller]
    fn debug(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Debug, event).with_fields(fields))
    }

    /// Convenience: info event.
    #[track_caller]
    fn info(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Info, event).with_fields(fields))
    }

    /// Convenience: warning event.
    #[track_caller]
    fn warning(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Warning, event).with_fields(fields))
    }

    /// Convenience: error event.
    #[track_caller]
    fn error(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Error, event).with_fields(fields))
    }

    /// Convenience: critical event.
    #[track_caller]
    fn critical(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Critical, event).with_fields(fields))
    }
}
