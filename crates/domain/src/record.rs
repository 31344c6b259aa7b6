//! A single log call before it enters the processor chain.

use crate::callsite::CallSite;
use crate::exception::ExceptionInfo;
use crate::field_map::{EventDict, FieldMap};
use crate::keys;
use crate::level::LogLevel;
use crate::value::FieldValue;
use std::error::Error;

/// Everything a caller passed to one log call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Requested severity.
    pub level: LogLevel,
    /// Message text, possibly containing `%` placeholders.
    pub event: String,
    /// Positional arguments for the placeholders.
    pub args: Vec<FieldValue>,
    /// Keyword fields in call order.
    pub fields: FieldMap,
    /// Where the call was made.
    pub call_site: CallSite,
}

impl LogRecord {
    /// New record located at the caller.
    #[track_caller]
    pub fn new(level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            level,
            event: event.into(),
            args: Vec::new(),
            fields: FieldMap::new(),
            call_site: CallSite::caller(),
        }
    }

    /// Add a keyword field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<Box<str>>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key, value);
        self
    }

    /// Add several keyword fields.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Set positional arguments.
    #[must_use]
    pub fn with_args<I, V>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a captured error under `exc_info`.
    #[must_use]
    pub fn with_exc_info(self, info: ExceptionInfo) -> Self {
        self.with_field(keys::EXC_INFO, info)
    }

    /// Capture `error` and attach it under `exc_info`.
    #[must_use]
    pub fn with_error<E>(self, error: &E) -> Self
    where
        E: Error + 'static,
    {
        self.with_exc_info(ExceptionInfo::from_error(error))
    }

    /// Request a stack rendering.
    #[must_use]
    pub fn with_stack_info(self) -> Self {
        self.with_field(keys::STACK_INFO, true)
    }

    /// Override the call site.
    #[must_use]
    pub const fn with_call_site(mut self, call_site: CallSite) -> Self {
        self.call_site = call_site;
        self
    }

    /// Record the enclosing function and module.
    #[must_use]
    pub const fn with_function(mut self, function: &'static str, module: &'static str) -> Self {
        self.call_site = self.call_site.with_function(function).with_module(module);
        self
    }

    /// Build the initial event dict: bound context, then call fields, then
    /// `positional_args` (when any), then `event`.
    #[must_use]
    pub fn into_event_dict(self, context: &FieldMap) -> EventDict {
        let mut event = context.clone();
        event.extend(self.fields);
        if !self.args.is_empty() {
            event.insert(keys::POSITIONAL_ARGS, FieldValue::List(self.args));
        }
        event.insert(keys::EVENT, self.event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_dict_layers_context_then_fields() {
        let context = FieldMap::new().with("request_id", "r-1").with("user", "ann");
        let record = LogRecord::new(LogLevel::Info, "payment accepted")
            .with_field("user", "bob")
            .with_field("amount", 19.99);

        let event = record.into_event_dict(&context);
        assert_eq!(
            event.keys().collect::<Vec<_>>(),
            vec!["request_id", "user", "amount", "event"]
        );
        assert_eq!(event.get("user").and_then(FieldValue::as_str), Some("bob"));
        assert_eq!(
            event.get("event").and_then(FieldValue::as_str),
            Some("payment accepted")
        );
    }

    #[test]
    fn positional_args_are_kept_for_formatting() {
        let record = LogRecord::new(LogLevel::Debug, "user %s").with_args(["bob"]);
        let event = record.into_event_dict(&FieldMap::new());
        assert_eq!(
            event.get(keys::POSITIONAL_ARGS),
            Some(&FieldValue::List(vec![FieldValue::from("bob")]))
        );
    }

    #[test]
    fn record_tracks_its_call_site() {
        let record = LogRecord::new(LogLevel::Info, "here").with_function("app::run", "app");
        assert_eq!(record.call_site.file_name(), "record.rs");
        assert_eq!(record.call_site.function_name(), Some("run"));
    }

    #[test]
    fn flags_are_plain_fields() {
        let record = LogRecord::new(LogLevel::Error, "failed")
            .with_stack_info()
            .with_exc_info(ExceptionInfo::new("IoError", "disk full"));
        assert_eq!(record.fields.get(keys::STACK_INFO), Some(&FieldValue::Bool(true)));
        assert!(matches!(
            record.fields.get(keys::EXC_INFO),
            Some(FieldValue::Exception(info)) if info.message() == "disk full"
        ));
    }
}
