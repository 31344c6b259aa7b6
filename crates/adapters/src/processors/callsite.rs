//! Call-site details added to the event dict.

use cwlog_domain::{CallsiteParameter, EventDict, FieldValue};
use cwlog_ports::{Processor, RecordMeta, Step};
use std::thread;

/// Adds call-site details (file, function, line, ...) to the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallsiteParameterAdder {
    parameters: Vec<CallsiteParameter>,
}

impl CallsiteParameterAdder {
    /// Adder for the given parameters, in order.
    #[must_use]
    pub fn new(parameters: impl IntoIterator<Item = CallsiteParameter>) -> Self {
        Self {
            parameters: parameters.into_iter().collect(),
        }
    }

    /// Parameters this adder writes.
    #[must_use]
    pub fn parameters(&self) -> &[CallsiteParameter] {
        &self.parameters
    }
}

impl Default for CallsiteParameterAdder {
    fn default() -> Self {
        Self::new(CallsiteParameter::DEFAULTS)
    }
}

fn parameter_value(parameter: CallsiteParameter, meta: &RecordMeta<'_>) -> Option<FieldValue> {
    let site = meta.call_site;
    match parameter {
        CallsiteParameter::Pathname => Some(site.file.into()),
        CallsiteParameter::Filename => Some(site.file_name().into()),
        CallsiteParameter::Module => site.module.map(FieldValue::from),
        CallsiteParameter::FuncName => site.function_name().map(FieldValue::from),
        CallsiteParameter::Lineno => Some(site.line.into()),
        CallsiteParameter::Thread => Some(thread_id()),
        CallsiteParameter::ThreadName => {
            Some(thread::current().name().unwrap_or("<unnamed>").into())
        },
        CallsiteParameter::Process => Some(std::process::id().into()),
    }
}

/// Numeric thread id; `ThreadId` only exposes it through `Debug`.
fn thread_id() -> FieldValue {
    let debug = format!("{:?}", thread::current().id());
    let digits: String = debug.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<u64>()
        .map_or_else(|_| FieldValue::Text(debug), FieldValue::UInt)
}

impl Processor for CallsiteParameterAdder {
    fn name(&self) -> &'static str {
        "callsite_parameter_adder"
    }

    fn process(&self, meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        for &parameter in &self.parameters {
            if let Some(value) = parameter_value(parameter, meta) {
                event.insert(parameter.key(), value);
            }
        }
        Step::Continue(event)
    }
}
