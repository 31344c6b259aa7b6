//! Processor chain contract.

use cwlog_domain::{CallSite, EventDict, LogLevel};

/// Per-record context shared by every processor and the renderer.
#[derive(Debug, Clone, Copy)]
pub struct RecordMeta<'a> {
    /// Name of the emitting logger.
    pub logger: &'a str,
    /// Severity of the record.
    pub level: LogLevel,
    /// Effective minimum severity of the emitting logger.
    pub min_level: LogLevel,
    /// Where the record was created.
    pub call_site: &'a CallSite,
}

/// Outcome of one processor.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Hand the (possibly modified) event to the next processor.
    Continue(EventDict),
    /// Stop the chain; nothing is emitted.
    Drop,
}

impl Step {
    /// Returns the event when the chain continues.
    #[must_use]
    pub fn into_event(self) -> Option<EventDict> {
        match self {
            Self::Continue(event) => Some(event),
            Self::Drop => None,
        }
    }
}

/// A single transformation in the chain.
///
/// Processors are total: anything they cannot handle is left in place or
/// degraded to a descriptive field, never surfaced as an error.
pub trait Processor: Send + Sync {
    /// Stable name used in diagnostics and `config show`.
    fn name(&self) -> &'static str;

    /// Transform `event` or drop it.
    fn process(&self, meta: &RecordMeta<'_>, event: EventDict) -> Step;
}

/// Terminal step turning an event dict into one output line.
pub trait Renderer: Send + Sync {
    /// Stable name used in diagnostics and `config show`.
    fn name(&self) -> &'static str;

    /// Render the event without a trailing newline. Never fails.
    fn render(&self, meta: &RecordMeta<'_>, event: &EventDict) -> String;
}
