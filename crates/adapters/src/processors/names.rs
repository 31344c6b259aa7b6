//! Logger-name and level-name fields.

use cwlog_domain::{EventDict, keys};
use cwlog_ports::{Processor, RecordMeta, Step};

/// Adds `logger` with the emitting logger's name.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddLoggerName;

impl Processor for AddLoggerName {
    fn name(&self) -> &'static str {
        "add_logger_name"
    }

    fn process(&self, meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        event.insert(keys::LOGGER, meta.logger);
        Step::Continue(event)
    }
}

/// Adds `level` with the lowercase severity name.
#[derive(Debug, Default, Clone, Copy)]
pub struct AddLogLevel;

impl Processor for AddLogLevel {
    fn name(&self) -> &'static str {
        "add_log_level"
    }

    fn process(&self, meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        event.insert(keys::LEVEL, meta.level.as_str());
        Step::Continue(event)
    }
}
