//! Routes `tracing` events through the logging pipeline.
//!
//! The event target names the logger, so per-logger levels and noisy
//! sources apply to events from third-party crates as well.

use crate::error::LoggingError;
use crate::factory::LoggerFactory;
use crate::global;
use cwlog_domain::{CallSite, ExceptionInfo, FieldMap, LogLevel, LogRecord};
use std::error::Error;
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

const MESSAGE_FIELD: &str = "message";

/// `tracing_subscriber` layer feeding a [`LoggerFactory`].
#[derive(Debug, Clone)]
pub struct CalloutLayer {
    factory: LoggerFactory,
}

impl CalloutLayer {
    /// Layer logging through `factory`.
    #[must_use]
    pub const fn new(factory: LoggerFactory) -> Self {
        Self { factory }
    }

    /// Layer logging through the global factory.
    #[must_use]
    pub fn global() -> Self {
        Self::new(global::factory().clone())
    }
}

/// Install [`CalloutLayer::global`] as the global default subscriber.
pub fn install_tracing_bridge() -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(CalloutLayer::global())
        .try_init()
        .map_err(|error| LoggingError::Bridge(error.to_string()))
}

/// `TRACE` has no counterpart and maps to `debug`.
#[must_use]
pub fn map_level(level: tracing::Level) -> LogLevel {
    if level == tracing::Level::ERROR {
        LogLevel::Error
    } else if level == tracing::Level::WARN {
        LogLevel::Warning
    } else if level == tracing::Level::INFO {
        LogLevel::Info
    } else {
        LogLevel::Debug
    }
}

impl<S: Subscriber> Layer<S> for CalloutLayer {
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        let minimum = self.factory.levels().level_for(metadata.target());
        map_level(*metadata.level()).is_enabled_for(minimum)
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = map_level(*metadata.level());
        let logger = self.factory.get_logger(metadata.target());
        if !logger.is_enabled_for(level) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let call_site = CallSite {
            file: metadata.file().unwrap_or("<unknown>"),
            line: metadata.line().unwrap_or(0),
            column: 0,
            function: None,
            module: metadata.module_path(),
        };
        let mut record = LogRecord::new(level, visitor.message.unwrap_or_default())
            .with_fields(visitor.fields)
            .with_call_site(call_site);
        if let Some(info) = visitor.error {
            record = record.with_exc_info(info);
        }
        if let Err(error) = logger.log(record) {
            eprintln!("log sink write failed: {error}");
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: Option<String>,
    fields: FieldMap,
    error: Option<ExceptionInfo>,
}

impl Visit for RecordVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == MESSAGE_FIELD {
            self.message = Some(text);
        } else {
            self.fields.insert(field.name(), text);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == MESSAGE_FIELD {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name(), value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name(), value);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name(), value);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name(), value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.fields.insert(field.name(), value.to_string());
        if self.error.is_none() {
            self.error = Some(ExceptionInfo::from_dyn(value));
        }
    }
}
