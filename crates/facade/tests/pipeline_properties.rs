//! End-to-end behaviour of loggers built by a factory.
#![allow(missing_docs)]

use cwlog_facade::{
    EventDict, FieldMap, FieldValue, LogLevel, LogRecord, LoggerFactory, MemoryLogSink, Pipeline,
    Processor, RecordMeta, Step, ValidatedLoggingConfig, parse_logging_config_json,
};
use proptest::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn payload(line: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let start = line.find('{').ok_or("no JSON payload")?;
    Ok(serde_json::from_str(line.get(start..).unwrap_or_default())?)
}

type Fixture = (LoggerFactory, Arc<MemoryLogSink>);

fn payments_factory(min_level: &str) -> Result<Fixture, Box<dyn std::error::Error>> {
    let config = parse_logging_config_json(&format!(
        r#"{{"minLevel":"{min_level}","callouts":["order_id","amount"]}}"#
    ))?;
    let sink = Arc::new(MemoryLogSink::new());
    Ok((LoggerFactory::with_sink(config, sink.clone()), sink))
}

struct CountingStub(Arc<AtomicUsize>);

impl Processor for CountingStub {
    fn name(&self) -> &'static str {
        "counting_stub"
    }

    fn process(&self, _meta: &RecordMeta<'_>, event: EventDict) -> Step {
        self.0.fetch_add(1, Ordering::SeqCst);
        Step::Continue(event)
    }
}

#[test]
fn payments_scenario_renders_callouts_first() -> TestResult {
    let (factory, sink) = payments_factory("info")?;
    factory.get_logger("payments").info(
        "charge accepted",
        FieldMap::new().with("order_id", "O-42").with("amount", 19.99),
    )?;

    let lines = sink.take();
    assert_eq!(lines.len(), 1);
    let line = lines.first().ok_or("no line")?;
    assert!(line.starts_with(r#"[INFO] "O-42" "19.99" {"#), "{line}");

    let json = payload(line)?;
    assert_eq!(json["event"], "charge accepted");
    assert_eq!(json["logger"], "payments");
    assert_eq!(json["order_id"], "O-42");
    assert_eq!(json["amount"], 19.99);
    Ok(())
}

#[test]
fn debug_below_info_emits_nothing() -> TestResult {
    let (factory, sink) = payments_factory("info")?;
    factory.get_logger("payments").debug(
        "charge accepted",
        FieldMap::new().with("order_id", "O-42").with("amount", 19.99),
    )?;
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn filtered_calls_run_no_enrichment() -> TestResult {
    let config = parse_logging_config_json(r#"{"minLevel":"info"}"#)?;
    let count = Arc::new(AtomicUsize::new(0));
    let pipeline = Pipeline::standard(&config).with_processor(CountingStub(Arc::clone(&count)));
    let sink = Arc::new(MemoryLogSink::new());
    let factory = LoggerFactory::with_pipeline(config, pipeline, sink.clone());
    let logger = factory.get_logger("payments");

    logger.debug("ignored", FieldMap::new())?;
    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(sink.is_empty());

    logger.info("kept", FieldMap::new())?;
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(sink.len(), 1);
    Ok(())
}

#[test]
fn exc_info_without_exception_omits_field() -> TestResult {
    let (factory, sink) = payments_factory("debug")?;
    factory
        .get_logger("payments")
        .log(LogRecord::new(LogLevel::Error, "no active error").with_field("exc_info", true))?;

    let lines = sink.take();
    let json = payload(lines.first().ok_or("no line")?)?;
    assert!(json.get("exception").is_none());
    assert!(json.get("exc_info").is_none());
    Ok(())
}

#[test]
fn opaque_values_fall_back_to_repr() -> TestResult {
    #[derive(Debug)]
    #[allow(dead_code, reason = "only read through Debug")]
    struct Gateway {
        region: &'static str,
    }

    let (factory, sink) = payments_factory("debug")?;
    factory.get_logger("payments").info(
        "routing",
        FieldMap::new()
            .with("gateway", FieldValue::opaque(Gateway { region: "eu-west-1" }))
            .with("payload", FieldValue::bytes(vec![0xff, 0x00])),
    )?;

    let lines = sink.take();
    let json = payload(lines.first().ok_or("no line")?)?;
    let gateway = json["gateway"].as_str().unwrap_or_default();
    assert!(gateway.contains("eu-west-1"), "{gateway}");
    assert!(json["payload"].is_string());
    Ok(())
}

#[test]
fn standard_members_are_distinct_keys() -> TestResult {
    let (factory, sink) = payments_factory("debug")?;
    factory.get_logger("payments").warning("low balance", FieldMap::new())?;

    let lines = sink.take();
    let json = payload(lines.first().ok_or("no line")?)?;
    let object = json.as_object().ok_or("payload is not an object")?;
    for key in ["event", "logger", "level", "timestamp"] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert_eq!(json["level"], "warning");
    Ok(())
}

#[test]
fn json_renderer_emits_payload_only() -> TestResult {
    let config = parse_logging_config_json(r#"{"renderer":"json","callouts":["order_id"]}"#)?;
    let sink = Arc::new(MemoryLogSink::new());
    let factory = LoggerFactory::with_sink(config, sink.clone());
    factory
        .get_logger("payments")
        .info("charge accepted", FieldMap::new().with("order_id", "O-42"))?;

    let lines = sink.take();
    let line = lines.first().ok_or("no line")?;
    assert!(line.starts_with('{'), "{line}");
    let json: Value = serde_json::from_str(line)?;
    assert_eq!(json["order_id"], "O-42");
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_tasks_write_whole_lines() -> TestResult {
    let (factory, sink) = payments_factory("debug")?;
    let mut tasks = Vec::new();
    for worker in 0..16_i64 {
        let logger = factory
            .get_logger("payments")
            .bind(FieldMap::new().with("worker", worker));
        tasks.push(tokio::spawn(async move {
            for index in 0..25_i64 {
                let fields = FieldMap::new()
                    .with("order_id", format!("O-{worker}-{index}"))
                    .with("amount", 1.5);
                logger.info("charge accepted", fields)?;
                tokio::task::yield_now().await;
            }
            Ok::<(), std::io::Error>(())
        }));
    }
    for task in tasks {
        task.await??;
    }

    let lines = sink.take();
    assert_eq!(lines.len(), 16 * 25);
    for line in &lines {
        let json = payload(line)?;
        let order_id = json["order_id"].as_str().ok_or("order_id missing")?;
        assert!(line.starts_with(&format!("[INFO] \"{order_id}\" \"1.5\" {{")), "{line}");
    }
    Ok(())
}

fn event_without(keys: &[&str], fields: &[(String, i64)]) -> FieldMap {
    fields
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.as_str(), *value))
        .collect()
}

proptest! {
    #[test]
    fn missing_callouts_render_none_none(
        fields in proptest::collection::vec(("[a-z_]{1,12}", any::<i64>()), 0..8),
    ) {
        let config = parse_logging_config_json(r#"{"callouts":["order_id","amount"]}"#)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let sink = Arc::new(MemoryLogSink::new());
        let factory = LoggerFactory::with_sink(config, sink.clone());

        let event = event_without(&["order_id", "amount"], &fields);
        factory
            .get_logger("payments")
            .info("anything", event)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        let lines = sink.take();
        prop_assert_eq!(lines.len(), 1);
        prop_assert!(lines[0].starts_with(r#"[INFO] "none" "none" {"#), "{}", lines[0]);
    }

    #[test]
    fn only_first_callout_leaves_second_none(order_id in "[A-Z]-[0-9]{1,6}") {
        let config = parse_logging_config_json(r#"{"callouts":["order_id","amount"]}"#)
            .map_err(|error| TestCaseError::fail(error.to_string()))?;
        let sink = Arc::new(MemoryLogSink::new());
        let factory = LoggerFactory::with_sink(config, sink.clone());

        factory
            .get_logger("payments")
            .info("anything", FieldMap::new().with("order_id", order_id.as_str()))
            .map_err(|error| TestCaseError::fail(error.to_string()))?;

        let lines = sink.take();
        let expected = format!(r#"[INFO] "{order_id}" "none" {{"#);
        prop_assert!(lines[0].starts_with(&expected), "{}", lines[0]);
    }
}

#[test]
fn default_config_has_no_callouts() -> TestResult {
    let sink = Arc::new(MemoryLogSink::new());
    let factory = LoggerFactory::with_sink(ValidatedLoggingConfig::default(), sink.clone());
    factory.get_logger("payments").info("hello", FieldMap::new())?;
    let lines = sink.take();
    assert!(lines.first().is_some_and(|line| line.starts_with(r#"[INFO] "none" "none" {"#)));
    Ok(())
}
