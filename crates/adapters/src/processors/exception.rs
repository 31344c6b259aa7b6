//! Exception rendering from `exc_info`.

use cwlog_domain::{EventDict, FieldValue, keys};
use cwlog_ports::{Processor, RecordMeta, Step};

/// Turns `exc_info` into a rendered `exception` field.
///
/// Only an explicitly captured [`cwlog_domain::ExceptionInfo`] produces
/// output; any other `exc_info` value is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatExcInfo;

impl Processor for FormatExcInfo {
    fn name(&self) -> &'static str {
        "format_exc_info"
    }

    fn process(&self, _meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        if let Some(FieldValue::Exception(info)) = event.remove(keys::EXC_INFO) {
            event.insert(keys::EXCEPTION, info.render());
        }
        Step::Continue(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::test_support::meta;
    use cwlog_domain::{CallSite, ExceptionInfo, LogLevel};

    fn run(event: EventDict) -> EventDict {
        let site = CallSite::caller();
        let meta = meta(&site, LogLevel::Error);
        FormatExcInfo
            .process(&meta, event)
            .into_event()
            .unwrap_or_default()
    }

    #[test]
    fn captured_exception_is_rendered() {
        let info = ExceptionInfo::new("TimeoutError", "upstream took too long");
        let event = run(EventDict::new().with("event", "charge failed").with("exc_info", info));
        assert!(!event.contains_key("exc_info"));
        assert_eq!(
            event.get("exception"),
            Some(&FieldValue::from("TimeoutError: upstream took too long"))
        );
    }

    #[test]
    fn bare_true_is_omitted() {
        let event = run(EventDict::new().with("event", "charge failed").with("exc_info", true));
        assert!(!event.contains_key("exc_info"));
        assert!(!event.contains_key("exception"));
    }
}
