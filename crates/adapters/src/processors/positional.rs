//! Positional-argument interpolation into the event message.

use super::percent::format_percent;
use cwlog_domain::{EventDict, FieldValue, keys};
use cwlog_ports::{Processor, RecordMeta, Step};

/// Interpolates `positional_args` into the `event` message.
///
/// On success the arguments are removed. When the template and the
/// arguments do not fit, both are left exactly as they were.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionalArgumentsFormatter;

impl Processor for PositionalArgumentsFormatter {
    fn name(&self) -> &'static str {
        "positional_arguments_formatter"
    }

    fn process(&self, _meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        let formatted = match (event.get(keys::POSITIONAL_ARGS), event.get(keys::EVENT)) {
            (Some(FieldValue::List(args)), Some(FieldValue::Text(template))) if !args.is_empty() => {
                format_percent(template, args).ok()
            },
            _ => None,
        };
        if let Some(message) = formatted {
            event.insert(keys::EVENT, message);
            event.remove(keys::POSITIONAL_ARGS);
        }
        Step::Continue(event)
    }
}
