//! Stack capture for `stack_info`.

use cwlog_domain::{EventDict, keys};
use cwlog_ports::{Processor, RecordMeta, Step};
use std::backtrace::Backtrace;

/// Replaces a truthy `stack_info` flag with the current backtrace under `stack`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackInfoRenderer;

impl Processor for StackInfoRenderer {
    fn name(&self) -> &'static str {
        "stack_info_renderer"
    }

    fn process(&self, _meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        if event
            .remove(keys::STACK_INFO)
            .is_some_and(|flag| flag.is_truthy())
        {
            event.insert(keys::STACK, full_stack());
        }
        Step::Continue(event)
    }
}

/// Capture the current thread's stack, regardless of `RUST_BACKTRACE`.
#[must_use]
pub fn full_stack() -> String {
    format!("Stack backtrace:\n{}", Backtrace::force_capture())
}
