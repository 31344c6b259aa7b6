//! Integration tests for parsing and loading config fixtures.

use cwlog_config::{
    CURRENT_CONFIG_VERSION, DecodeErrors, LoggingEnv, RendererKind, TimestampFormat,
    load_logging_config_from_path, parse_logging_config_json, parse_logging_config_toml,
};
use cwlog_domain::{CallsiteParameter, LogLevel};
use cwlog_shared::ErrorCode;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

fn fixture_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative)
}

fn read_fixture(relative: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(fixture_path(relative))?)
}

#[test]
fn parses_valid_json_fixture() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("logging.valid.json")?;
    let config = parse_logging_config_json(&contents)?;

    assert_eq!(config.version, CURRENT_CONFIG_VERSION);
    assert_eq!(config.min_level, LogLevel::Info);
    assert_eq!(config.callouts().first(), Some("order_id"));
    assert_eq!(config.callouts().second(), Some("amount"));
    assert_eq!(config.noisy_level, LogLevel::Error);
    assert_eq!(
        config.level_overrides.get("hyper::client"),
        Some(&LogLevel::Info)
    );
    assert_eq!(config.decode_errors, DecodeErrors::Backslash);
    assert!(config.callsite_parameters.contains(&CallsiteParameter::ThreadName));
    assert!(config.redact_secrets);
    assert!(!config.json.ensure_ascii);
    Ok(())
}

#[test]
fn parses_valid_toml_fixture() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("logging.valid.toml")?;
    let config = parse_logging_config_toml(&contents)?;

    assert_eq!(config.min_level, LogLevel::Warning);
    assert_eq!(config.renderer, RendererKind::Json);
    assert!(!config.timestamp.utc);
    assert_eq!(
        config.timestamp_format(),
        &TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string())
    );
    assert!(config.json.sort_keys);
    Ok(())
}

#[test]
fn too_many_callouts_fail_validation() -> Result<(), Box<dyn Error>> {
    let contents = read_fixture("logging.too-many-callouts.json")?;
    let Err(envelope) = parse_logging_config_json(&contents) else {
        return Err("expected validation to fail".into());
    };
    assert_eq!(envelope.code, ErrorCode::new("config", "too_many_callouts"));
    assert_eq!(envelope.metadata.get("count").map(String::as_str), Some("3"));
    Ok(())
}

#[test]
fn loads_from_path_by_extension() -> Result<(), Box<dyn Error>> {
    let env = LoggingEnv::default();
    let config = load_logging_config_from_path(Some(&fixture_path("logging.valid.toml")), &env)?;
    assert_eq!(config.renderer, RendererKind::Json);

    let dir = tempfile::tempdir()?;
    let missing = dir.path().join("missing.json");
    let Err(envelope) = load_logging_config_from_path(Some(&missing), &env) else {
        return Err("expected a missing file error".into());
    };
    assert_eq!(envelope.code, ErrorCode::new("config", "file_not_found"));

    let broken = dir.path().join("broken.toml");
    fs::write(&broken, "minLevel = ")?;
    let Err(envelope) = load_logging_config_from_path(Some(&broken), &env) else {
        return Err("expected a TOML parse error".into());
    };
    assert_eq!(envelope.code, ErrorCode::new("config", "invalid_toml"));
    Ok(())
}
