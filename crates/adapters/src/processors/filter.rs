//! Level filtering against the logger's effective minimum.

use cwlog_domain::EventDict;
use cwlog_ports::{Processor, RecordMeta, Step};

/// Drops records below the logger's effective minimum level.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterByLevel;

impl Processor for FilterByLevel {
    fn name(&self) -> &'static str {
        "filter_by_level"
    }

    fn process(&self, meta: &RecordMeta<'_>, event: EventDict) -> Step {
        if meta.level.is_enabled_for(meta.min_level) {
            Step::Continue(event)
        } else {
            Step::Drop
        }
    }
}
