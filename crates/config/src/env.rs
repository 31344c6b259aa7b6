//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present but empty or malformed
//! fails fast instead of being ignored.

use crate::schema::{LoggingConfig, RendererKind, ValidatedLoggingConfig};
use cwlog_domain::LogLevel;
use cwlog_shared::{ErrorCode, ErrorEnvelope};
use std::collections::BTreeMap;
use std::fmt;

/// Env var: minimum level.
pub const ENV_LEVEL: &str = "CWLOG_LEVEL";
/// Env var: minimum level (alias).
pub const ENV_LEVEL_ALIAS: &str = "LOG_LEVEL";
/// Env var: callout field names (CSV, at most two).
pub const ENV_CALLOUTS: &str = "CWLOG_CALLOUTS";
/// Env var: noisy sources (CSV, replaces the default list).
pub const ENV_NOISY_SOURCES: &str = "CWLOG_NOISY_SOURCES";
/// Env var: minimum level for noisy sources.
pub const ENV_NOISY_LEVEL: &str = "CWLOG_NOISY_LEVEL";
/// Env var: renderer (`cloudwatch` or `json`).
pub const ENV_RENDERER: &str = "CWLOG_RENDERER";
/// Env var: render timestamps in UTC.
pub const ENV_TIMESTAMP_UTC: &str = "CWLOG_TIMESTAMP_UTC";
/// Env var: sort JSON keys.
pub const ENV_SORT_KEYS: &str = "CWLOG_SORT_KEYS";
/// Env var: escape non-ASCII characters in JSON.
pub const ENV_ENSURE_ASCII: &str = "CWLOG_ENSURE_ASCII";
/// Env var: redact secret-looking fields.
pub const ENV_REDACT_SECRETS: &str = "CWLOG_REDACT_SECRETS";

const ALL_VARS: [&str; 10] = [
    ENV_LEVEL,
    ENV_LEVEL_ALIAS,
    ENV_CALLOUTS,
    ENV_NOISY_SOURCES,
    ENV_NOISY_LEVEL,
    ENV_RENDERER,
    ENV_TIMESTAMP_UTC,
    ENV_SORT_KEYS,
    ENV_ENSURE_ASCII,
    ENV_REDACT_SECRETS,
];

const CSV_MAX: usize = 256;

/// Parsed env overrides; `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingEnv {
    /// Minimum level.
    pub level: Option<LogLevel>,
    /// Callout names.
    pub callouts: Option<Vec<String>>,
    /// Noisy sources.
    pub noisy_sources: Option<Vec<String>>,
    /// Noisy level.
    pub noisy_level: Option<LogLevel>,
    /// Renderer.
    pub renderer: Option<RendererKind>,
    /// UTC timestamps.
    pub timestamp_utc: Option<bool>,
    /// Sorted JSON keys.
    pub sort_keys: Option<bool>,
    /// ASCII-only JSON.
    pub ensure_ascii: Option<bool>,
    /// Secret redaction.
    pub redact_secrets: Option<bool>,
}

impl LoggingEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            level: parse_optional_level_any(map, &[ENV_LEVEL, ENV_LEVEL_ALIAS])?,
            callouts: parse_optional_csv(map, ENV_CALLOUTS)?,
            noisy_sources: parse_optional_csv(map, ENV_NOISY_SOURCES)?,
            noisy_level: parse_optional_level_any(map, &[ENV_NOISY_LEVEL])?,
            renderer: parse_optional_renderer(map, ENV_RENDERER)?,
            timestamp_utc: parse_optional_bool(map, ENV_TIMESTAMP_UTC)?,
            sort_keys: parse_optional_bool(map, ENV_SORT_KEYS)?,
            ensure_ascii: parse_optional_bool(map, ENV_ENSURE_ASCII)?,
            redact_secrets: parse_optional_bool(map, ENV_REDACT_SECRETS)?,
        })
    }

    /// Parse env overrides from the current process environment.
    pub fn from_std_env() -> Result<Self, EnvParseError> {
        let mut map = BTreeMap::new();
        for name in ALL_VARS {
            if let Ok(value) = std::env::var(name) {
                map.insert(name.to_string(), value);
            }
        }

        Self::from_map(&map)
    }

    /// Returns true when no variable was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Apply env overrides to a base config (env wins over file/default values).
pub fn apply_env_overrides(
    base: LoggingConfig,
    env: &LoggingEnv,
) -> Result<ValidatedLoggingConfig, ErrorEnvelope> {
    let mut config = base;
    set(&mut config.min_level, env.level);
    set(&mut config.noisy_level, env.noisy_level);
    set(&mut config.renderer, env.renderer);
    set(&mut config.timestamp.utc, env.timestamp_utc);
    set(&mut config.json.sort_keys, env.sort_keys);
    set(&mut config.json.ensure_ascii, env.ensure_ascii);
    set(&mut config.redact_secrets, env.redact_secrets);
    if let Some(callouts) = &env.callouts {
        config.callouts.clone_from(callouts);
    }
    if let Some(sources) = &env.noisy_sources {
        config.noisy_sources.clone_from(sources);
    }

    config.validate_and_normalize().map_err(Into::into)
}

fn set<T: Copy>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Boolean env var had an invalid value.
    InvalidBool {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Level env var had an invalid value.
    InvalidLevel {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// Enum env var had an invalid value.
    InvalidEnum {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
    /// CSV list exceeds a safety limit.
    CsvTooLarge {
        /// Env var name.
        var: &'static str,
        /// Number of parsed items.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidBool { .. } => ErrorCode::new("config", "invalid_env_bool"),
            Self::InvalidLevel { .. } => ErrorCode::new("config", "invalid_env_level"),
            Self::InvalidEnum { .. } => ErrorCode::new("config", "invalid_env_enum"),
            Self::CsvTooLarge { .. } => ErrorCode::new("config", "invalid_env_csv"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidBool { var, .. } => write!(formatter, "{var} must be a boolean"),
            Self::InvalidLevel { var, .. } => write!(
                formatter,
                "{var} must be one of debug, info, warning, error, critical"
            ),
            Self::InvalidEnum { var, .. } => write!(formatter, "{var} has an unsupported value"),
            Self::CsvTooLarge { var, len, max } => {
                write!(formatter, "{var} is too large ({len} items, max {max})")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidBool { var, value }
            | EnvParseError::InvalidLevel { var, value }
            | EnvParseError::InvalidEnum { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", value),
            EnvParseError::CsvTooLarge { var, len, max } => envelope
                .with_metadata("env_var", var)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
        }
    }
}

fn parse_present<'a>(
    map: &'a BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<&'a str>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }
    Ok(Some(trimmed))
}

fn parse_optional_level_any(
    map: &BTreeMap<String, String>,
    vars: &[&'static str],
) -> Result<Option<LogLevel>, EnvParseError> {
    for &var in vars {
        let Some(trimmed) = parse_present(map, var)? else {
            continue;
        };
        let level = LogLevel::parse(trimmed).ok_or_else(|| EnvParseError::InvalidLevel {
            var,
            value: trimmed.to_string(),
        })?;
        return Ok(Some(level));
    }
    Ok(None)
}

fn parse_optional_bool(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<bool>, EnvParseError> {
    let Some(trimmed) = parse_present(map, var)? else {
        return Ok(None);
    };

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(Some(true)),
        "false" | "0" | "no" | "off" => Ok(Some(false)),
        _ => Err(EnvParseError::InvalidBool {
            var,
            value: trimmed.to_string(),
        }),
    }
}

fn parse_optional_renderer(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<RendererKind>, EnvParseError> {
    let Some(trimmed) = parse_present(map, var)? else {
        return Ok(None);
    };
    RendererKind::parse(trimmed)
        .map(Some)
        .ok_or_else(|| EnvParseError::InvalidEnum {
            var,
            value: trimmed.to_string(),
        })
}

// CSV entries are trimmed and empty entries dropped; order is kept because
// callout order is significant.
fn parse_optional_csv(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Vec<String>>, EnvParseError> {
    let Some(trimmed) = parse_present(map, var)? else {
        return Ok(None);
    };
    let items: Vec<String> = trimmed
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect();
    if items.len() > CSV_MAX {
        return Err(EnvParseError::CsvTooLarge {
            var,
            len: items.len(),
            max: CSV_MAX,
        });
    }
    Ok(Some(items))
}
