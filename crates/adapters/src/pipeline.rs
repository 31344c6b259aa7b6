//! Ordered processor chain ending in a renderer.

use crate::processors::{
    AddLogLevel, AddLoggerName, CallsiteParameterAdder, FilterByLevel, FormatExcInfo,
    PositionalArgumentsFormatter, RedactSecrets, StackInfoRenderer, TimeStamper, UnicodeDecoder,
};
use crate::renderer::{CloudWatchRenderer, JsonOptions, JsonRenderer};
use cwlog_config::{RendererKind, ValidatedLoggingConfig};
use cwlog_domain::EventDict;
use cwlog_ports::{Processor, RecordMeta, Renderer, Step};
use std::fmt;

/// Processors run in insertion order; the first `Drop` ends the chain.
pub struct Pipeline {
    processors: Vec<Box<dyn Processor>>,
    renderer: Box<dyn Renderer>,
}

impl Pipeline {
    /// Empty chain feeding `renderer`.
    #[must_use]
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self {
            processors: Vec::new(),
            renderer: Box::new(renderer),
        }
    }

    /// Append a processor.
    #[must_use]
    pub fn with_processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Append an already boxed processor.
    pub fn push(&mut self, processor: Box<dyn Processor>) {
        self.processors.push(processor);
    }

    /// The standard chain for `config`.
    ///
    /// Level filter, logger name, level, positional formatting, timestamp,
    /// stack info, exception info, unicode decoding, call-site parameters,
    /// then (when enabled) secret redaction.
    #[must_use]
    pub fn standard(config: &ValidatedLoggingConfig) -> Self {
        let options = JsonOptions::from(config.json);
        let mut pipeline = match config.renderer {
            RendererKind::Cloudwatch => {
                Self::new(CloudWatchRenderer::new(config.callouts().clone()).with_options(options))
            },
            RendererKind::Json => Self::new(JsonRenderer::new(options)),
        };
        pipeline = pipeline
            .with_processor(FilterByLevel)
            .with_processor(AddLoggerName)
            .with_processor(AddLogLevel)
            .with_processor(PositionalArgumentsFormatter)
            .with_processor(TimeStamper::new(
                config.timestamp_format().clone(),
                config.timestamp.utc,
            ))
            .with_processor(StackInfoRenderer)
            .with_processor(FormatExcInfo)
            .with_processor(UnicodeDecoder::new(config.decode_errors))
            .with_processor(CallsiteParameterAdder::new(
                config.callsite_parameters.iter().copied(),
            ));
        if config.redact_secrets {
            pipeline = pipeline.with_processor(RedactSecrets);
        }
        tracing::debug!(
            processors = ?pipeline.processor_names(),
            renderer = pipeline.renderer_name(),
            "built logging pipeline"
        );
        pipeline
    }

    /// Run the chain; `None` when a processor dropped the event.
    pub fn run(&self, meta: &RecordMeta<'_>, mut event: EventDict) -> Option<String> {
        for processor in &self.processors {
            match processor.process(meta, event) {
                Step::Continue(next) => event = next,
                Step::Drop => return None,
            }
        }
        Some(self.renderer.render(meta, &event))
    }

    /// Processor names in run order.
    #[must_use]
    pub fn processor_names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|processor| processor.name()).collect()
    }

    /// Name of the terminal renderer.
    #[must_use]
    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Pipeline")
            .field("processors", &self.processor_names())
            .field("renderer", &self.renderer_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwlog_config::parse_logging_config_json;
    use cwlog_domain::{CallSite, FieldMap, LogLevel, LogRecord};
    use serde_json::Value;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    impl Processor for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn process(&self, _meta: &RecordMeta<'_>, event: EventDict) -> Step {
            self.0.fetch_add(1, Ordering::SeqCst);
            Step::Continue(event)
        }
    }

    fn meta(site: &CallSite, level: LogLevel, min_level: LogLevel) -> RecordMeta<'_> {
        RecordMeta {
            logger: "payments",
            level,
            min_level,
            call_site: site,
        }
    }

    #[test]
    fn standard_chain_order() {
        let pipeline = Pipeline::standard(&ValidatedLoggingConfig::default());
        assert_eq!(
            pipeline.processor_names(),
            [
                "filter_by_level",
                "add_logger_name",
                "add_log_level",
                "positional_arguments_formatter",
                "time_stamper",
                "stack_info_renderer",
                "format_exc_info",
                "unicode_decoder",
                "callsite_parameter_adder",
            ]
        );
        assert_eq!(pipeline.renderer_name(), "cloudwatch");
    }

    #[test]
    fn redaction_runs_last_when_enabled() -> Result<(), Box<dyn std::error::Error>> {
        let config = parse_logging_config_json(r#"{"redactSecrets":true,"renderer":"json"}"#)?;
        let pipeline = Pipeline::standard(&config);
        assert_eq!(pipeline.processor_names().last(), Some(&"redact_secrets"));
        assert_eq!(pipeline.renderer_name(), "json");
        Ok(())
    }

    #[test]
    fn filtered_events_skip_enrichment() {
        let count = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::standard(&ValidatedLoggingConfig::default())
            .with_processor(Counting(Arc::clone(&count)));
        let site = CallSite::caller();

        let dropped = pipeline.run(
            &meta(&site, LogLevel::Debug, LogLevel::Info),
            EventDict::new().with("event", "noise"),
        );
        assert_eq!(dropped, None);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        let kept = pipeline.run(
            &meta(&site, LogLevel::Info, LogLevel::Info),
            EventDict::new().with("event", "signal"),
        );
        assert!(kept.is_some());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rendered_payload_has_standard_members() -> Result<(), Box<dyn std::error::Error>> {
        let config = parse_logging_config_json(r#"{"callouts":["order_id","amount"]}"#)?;
        let pipeline = Pipeline::standard(&config);
        let site = CallSite::caller();
        let record = LogRecord::new(LogLevel::Info, "payment accepted")
            .with_field("order_id", "O-42")
            .with_field("amount", 19.99);

        let line = pipeline
            .run(
                &meta(&site, LogLevel::Info, LogLevel::Debug),
                record.into_event_dict(&FieldMap::new()),
            )
            .ok_or("event was dropped")?;

        assert!(line.starts_with(r#"[INFO] "O-42" "19.99" {"#), "{line}");
        let start = line.find('{').ok_or("no JSON payload")?;
        let json: Value = serde_json::from_str(line.get(start..).unwrap_or_default())?;
        for key in ["event", "logger", "level", "timestamp", "filename", "lineno"] {
            assert!(json.get(key).is_some(), "missing {key}: {line}");
        }
        assert_eq!(json["logger"], "payments");
        assert_eq!(json["level"], "info");
        Ok(())
    }
}
