//! Named logger handed out by the factory.

use crate::factory::Shared;
use cwlog_domain::{FieldMap, LogLevel, LogRecord};
use cwlog_ports::{LoggerPort, RecordMeta};
use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// A named logger with an effective minimum level and bound context.
///
/// Every method builds a [`LogRecord`] located at the caller, runs it
/// through the shared pipeline and writes the rendered line to the sink.
/// Records below the minimum level return immediately.
#[derive(Clone)]
pub struct Logger {
    name: Arc<str>,
    min_level: LogLevel,
    context: FieldMap,
    shared: Arc<Shared>,
}

impl Logger {
    pub(crate) fn new(name: &str, min_level: LogLevel, shared: Arc<Shared>) -> Self {
        Self {
            name: Arc::from(name),
            min_level,
            context: FieldMap::new(),
            shared,
        }
    }

    /// Logger name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective minimum level.
    #[must_use]
    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Whether `level` passes this logger's minimum.
    #[must_use]
    pub fn is_enabled_for(&self, level: LogLevel) -> bool {
        level.is_enabled_for(self.min_level)
    }

    /// Fields bound to this logger.
    #[must_use]
    pub const fn context(&self) -> &FieldMap {
        &self.context
    }

    /// Child logger with `fields` added to (or replacing keys in) the context.
    #[must_use]
    pub fn bind(&self, fields: FieldMap) -> Self {
        let mut child = self.clone();
        child.context.merge(&fields);
        child
    }

    /// Child logger whose context is exactly `fields`.
    #[must_use]
    pub fn new_context(&self, fields: FieldMap) -> Self {
        let mut child = self.clone();
        child.context = fields;
        child
    }

    /// Child logger without the given context keys.
    #[must_use]
    pub fn unbind<'a>(&self, keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut child = self.clone();
        for key in keys {
            child.context.remove(key);
        }
        child
    }

    /// True when both loggers came from the same factory.
    #[must_use]
    pub fn shares_pipeline_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Run `record` through the pipeline and write the result.
    pub fn log(&self, record: LogRecord) -> io::Result<()> {
        if !self.is_enabled_for(record.level) {
            return Ok(());
        }
        let call_site = record.call_site;
        let meta = RecordMeta {
            logger: &self.name,
            level: record.level,
            min_level: self.min_level,
            call_site: &call_site,
        };
        let event = record.into_event_dict(&self.context);
        match self.shared.pipeline.run(&meta, event) {
            Some(line) => self.shared.sink.write_line(&line),
            None => Ok(()),
        }
    }

    /// Log at `debug`.
    #[track_caller]
    pub fn debug(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Debug, event).with_fields(fields))
    }

    /// Log at `info`.
    #[track_caller]
    pub fn info(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Info, event).with_fields(fields))
    }

    /// Log at `warning`.
    #[track_caller]
    pub fn warning(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Warning, event).with_fields(fields))
    }

    /// Log at `error`.
    #[track_caller]
    pub fn error(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Error, event).with_fields(fields))
    }

    /// Log at `critical`.
    #[track_caller]
    pub fn critical(&self, event: &str, fields: FieldMap) -> io::Result<()> {
        self.log(LogRecord::new(LogLevel::Critical, event).with_fields(fields))
    }

    /// Log `error` at `error` level, rendered under `exception`.
    #[track_caller]
    pub fn exception<E>(&self, event: &str, error: &E, fields: FieldMap) -> io::Result<()>
    where
        E: Error + 'static,
    {
        self.log(
            LogRecord::new(LogLevel::Error, event)
                .with_fields(fields)
                .with_error(error),
        )
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl LoggerPort for Logger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_enabled_for(&self, level: LogLevel) -> bool {
        Self::is_enabled_for(self, level)
    }

    fn log(&self, record: LogRecord) -> io::Result<()> {
        Self::log(self, record)
    }

    fn bind(&self, fields: FieldMap) -> Box<dyn LoggerPort> {
        Box::new(Self::bind(self, fields))
    }
}
