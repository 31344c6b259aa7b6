#![allow(missing_docs)]
//! End-to-end tests for the `cwlog` binary.

use std::error::Error;
use std::fs;
use std::process::{Command, Output};

const LOGGING_ENV: [&str; 10] = [
    "CWLOG_LEVEL",
    "LOG_LEVEL",
    "CWLOG_CALLOUTS",
    "CWLOG_NOISY_SOURCES",
    "CWLOG_NOISY_LEVEL",
    "CWLOG_RENDERER",
    "CWLOG_TIMESTAMP_UTC",
    "CWLOG_SORT_KEYS",
    "CWLOG_ENSURE_ASCII",
    "CWLOG_REDACT_SECRETS",
];

fn command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_cwlog"));
    command.args(args);
    for key in LOGGING_ENV {
        command.env_remove(key);
    }
    command
}

fn cwlog(args: &[&str]) -> std::io::Result<Output> {
    command(args).output()
}

fn payload(line: &str) -> Result<serde_json::Value, Box<dyn Error>> {
    let start = line.find('{').ok_or("line has no json payload")?;
    let json = line.get(start..).ok_or("payload out of range")?;
    Ok(serde_json::from_str(json)?)
}

#[test]
fn emit_prints_callouts_before_the_payload() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("logging.json");
    fs::write(&config_path, r#"{"callouts":["order_id","amount"]}"#)?;
    let config = config_path.to_string_lossy().to_string();

    let output = cwlog(&[
        "emit",
        "--config",
        &config,
        "--logger",
        "payments",
        "charge accepted",
        "order_id=O-42",
        "amount=19.99",
    ])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    let line = lines.first().ok_or("missing line")?;
    assert!(line.starts_with(r#"[INFO] "O-42" "19.99" {"#), "{line}");

    let payload = payload(line)?;
    assert_eq!(payload["event"], "charge accepted");
    assert_eq!(payload["logger"], "payments");
    assert_eq!(payload["level"], "info");
    assert_eq!(payload["amount"], 19.99);
    Ok(())
}

#[test]
fn emit_formats_positional_arguments() -> Result<(), Box<dyn Error>> {
    let output = cwlog(&["emit", "--arg", "bob", "--arg", "3", "user %s retried %d times"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with(r#"[INFO] "none" "none" {"#), "{stdout}");
    let payload = payload(stdout.trim_end())?;
    assert_eq!(payload["event"], "user bob retried 3 times");
    assert!(payload.get("positional_args").is_none());
    Ok(())
}

#[test]
fn emit_below_the_minimum_level_prints_nothing() -> Result<(), Box<dyn Error>> {
    let output = command(&["emit", "--level", "debug", "cache warmed"])
        .env("CWLOG_LEVEL", "info")
        .output()?;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn too_many_callouts_exit_with_invalid_input() -> Result<(), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("logging.toml");
    fs::write(&config_path, "callouts = [\"a\", \"b\", \"c\"]\n")?;
    let config = config_path.to_string_lossy().to_string();

    let output = cwlog(&["emit", "--config", &config, "hello"])?;

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("too_many_callouts"), "{stderr}");
    Ok(())
}

#[test]
fn config_show_applies_env_overrides() -> Result<(), Box<dyn Error>> {
    let output = command(&["config", "show"])
        .env("CWLOG_CALLOUTS", "request_id")
        .env("CWLOG_LEVEL", "warning")
        .output()?;

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(config["callouts"], serde_json::json!(["request_id"]));
    assert_eq!(config["minLevel"], "warning");
    Ok(())
}

#[test]
fn config_show_renders_toml() -> Result<(), Box<dyn Error>> {
    let output = command(&["config", "show", "--format", "toml"])
        .env("CWLOG_RENDERER", "json")
        .output()?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("renderer = \"json\""), "{stdout}");
    Ok(())
}

#[test]
fn config_schema_is_json() -> Result<(), Box<dyn Error>> {
    let output = cwlog(&["config", "schema"])?;

    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert!(schema.get("properties").is_some());
    Ok(())
}
