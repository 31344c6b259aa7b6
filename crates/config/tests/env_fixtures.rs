//! Integration tests for env parsing and env-to-config merging.

use cwlog_config::{
    LoggingConfig, LoggingEnv, apply_env_overrides, load_logging_config_from_path,
};
use cwlog_domain::LogLevel;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::Path;

fn read_env_map(relative: &str) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(relative);
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}

#[test]
fn env_fixture_merges_into_effective_config() -> Result<(), Box<dyn Error>> {
    let env_map = read_env_map("logging-env.valid.json")?;
    let env = LoggingEnv::from_map(&env_map)?;

    let config = apply_env_overrides(LoggingConfig::default(), &env)?;

    assert_eq!(config.min_level, LogLevel::Error);
    assert_eq!(config.callouts().first(), Some("tenant"));
    assert_eq!(config.callouts().second(), Some("request_id"));
    assert_eq!(
        config.noisy_sources,
        vec!["sqlx".to_string(), "tower_http".to_string()]
    );
    assert_eq!(config.noisy_level, LogLevel::Critical);
    assert!(config.json.sort_keys);
    assert!(!config.timestamp.utc);
    Ok(())
}

#[test]
fn env_overrides_file_values() -> Result<(), Box<dyn Error>> {
    let env = LoggingEnv::from_map(&read_env_map("logging-env.valid.json")?)?;
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("logging.valid.json");

    let config = load_logging_config_from_path(Some(&path), &env)?;
    // File says info/order_id; env wins.
    assert_eq!(config.min_level, LogLevel::Error);
    assert_eq!(config.callouts().first(), Some("tenant"));
    // Untouched by env, kept from the file.
    assert!(config.redact_secrets);
    Ok(())
}
