//! CloudWatch-friendly line renderer.
//!
//! Lines look like `[INFO] "O-42" "19.99" {"order_id":"O-42",...}`: the
//! uppercase level and two clear-text callout values come first, so a
//! CloudWatch Logs filter or a human scanning the console can pick them
//! out without parsing the JSON that follows.

use super::json::{JsonOptions, render_payload};
use super::{Fallback, default_fallback};
use cwlog_domain::{CalloutSpec, EventDict};
use cwlog_ports::{RecordMeta, Renderer};
use std::fmt;

/// `[LEVEL] "callout1" "callout2" {json}`.
#[derive(Clone)]
pub struct CloudWatchRenderer {
    callouts: CalloutSpec,
    options: JsonOptions,
    fallback: Fallback,
}

impl CloudWatchRenderer {
    /// Renderer for `callouts` with default JSON options.
    #[must_use]
    pub fn new(callouts: CalloutSpec) -> Self {
        Self {
            callouts,
            options: JsonOptions::default(),
            fallback: default_fallback(),
        }
    }

    /// Replace the JSON options.
    #[must_use]
    pub const fn with_options(mut self, options: JsonOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the fallback handler.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Configured callouts.
    #[must_use]
    pub const fn callouts(&self) -> &CalloutSpec {
        &self.callouts
    }
}

impl Default for CloudWatchRenderer {
    fn default() -> Self {
        Self::new(CalloutSpec::none())
    }
}

impl fmt::Debug for CloudWatchRenderer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CloudWatchRenderer")
            .field("callouts", &self.callouts)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Renderer for CloudWatchRenderer {
    fn name(&self) -> &'static str {
        "cloudwatch"
    }

    fn render(&self, meta: &RecordMeta<'_>, event: &EventDict) -> String {
        let [first, second] = self.callouts.resolve(event);
        let payload = render_payload(event, self.options, &*self.fallback);
        format!(
            "[{}] \"{first}\" \"{second}\" {payload}",
            meta.level.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwlog_domain::{CallSite, FieldValue, LogLevel};
    use serde_json::Value;
    use std::sync::Arc;

    fn meta(site: &CallSite, level: LogLevel) -> RecordMeta<'_> {
        RecordMeta {
            logger: "payments",
            level,
            min_level: LogLevel::Debug,
            call_site: site,
        }
    }

    fn payload(line: &str) -> Result<Value, Box<dyn std::error::Error>> {
        let start = line.find('{').ok_or("no JSON payload")?;
        Ok(serde_json::from_str(line.get(start..).unwrap_or_default())?)
    }

    #[test]
    fn renders_level_callouts_and_payload() -> Result<(), Box<dyn std::error::Error>> {
        let site = CallSite::caller();
        let renderer = CloudWatchRenderer::new(CalloutSpec::new(["order_id", "amount"])?);
        let event = EventDict::new()
            .with("order_id", "O-42")
            .with("amount", 19.99)
            .with("event", "payment accepted");

        let line = renderer.render(&meta(&site, LogLevel::Info), &event);
        assert!(line.starts_with(r#"[INFO] "O-42" "19.99" {"#), "{line}");
        let json = payload(&line)?;
        assert_eq!(json["order_id"], "O-42");
        assert_eq!(json["amount"], 19.99);
        assert_eq!(json["event"], "payment accepted");
        Ok(())
    }

    #[test]
    fn missing_callouts_render_none() -> Result<(), Box<dyn std::error::Error>> {
        let site = CallSite::caller();
        let event = EventDict::new().with("event", "hello");

        let unconfigured = CloudWatchRenderer::default().render(&meta(&site, LogLevel::Debug), &event);
        assert!(unconfigured.starts_with(r#"[DEBUG] "none" "none" {"#));

        let renderer = CloudWatchRenderer::new(CalloutSpec::new(["event", "order_id"])?);
        let line = renderer.render(&meta(&site, LogLevel::Critical), &event);
        assert!(line.starts_with(r#"[CRITICAL] "hello" "none" {"#));
        Ok(())
    }

    #[test]
    fn multiline_callouts_stay_on_one_line() -> Result<(), Box<dyn std::error::Error>> {
        let site = CallSite::caller();
        let renderer = CloudWatchRenderer::new(CalloutSpec::new(["note"])?);
        let event = EventDict::new().with("note", "line one\nline two\r");

        let line = renderer.render(&meta(&site, LogLevel::Warning), &event);
        assert!(!line.contains('\n'));
        assert!(line.starts_with(r#"[WARNING] "line one\nline two\r" "none" {"#));
        Ok(())
    }

    #[test]
    fn unserializable_values_still_parse() -> Result<(), Box<dyn std::error::Error>> {
        #[derive(Debug)]
        struct Connection {
            _port: u16,
        }

        let site = CallSite::caller();
        let event = EventDict::new()
            .with("conn", FieldValue::opaque(Connection { _port: 5432 }))
            .with("raw", FieldValue::bytes(vec![0xde, 0xad]));
        let line = CloudWatchRenderer::default().render(&meta(&site, LogLevel::Info), &event);
        let json = payload(&line)?;
        assert!(json["conn"].as_str().is_some_and(|repr| repr.contains("Connection")));
        assert!(json["raw"].is_string());

        let custom = CloudWatchRenderer::default()
            .with_fallback(Arc::new(|value: &FieldValue| Value::from(value.kind())));
        let json = payload(&custom.render(&meta(&site, LogLevel::Info), &event))?;
        assert_eq!(json["conn"], "opaque");
        assert_eq!(json["raw"], "bytes");
        Ok(())
    }
}
