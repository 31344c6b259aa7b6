//! Logging configuration schema, defaults, validation, and normalization.
//!
//! - Deserialization uses `serde` (JSON or TOML, camelCase keys).
//! - Validation is manual and returns typed errors mapped to `ErrorEnvelope`.
//! - Normalization trims names and dedupes lists while keeping their order.

use cwlog_domain::{CallsiteParameter, CalloutSpec, CalloutSpecError, LogLevel, MAX_CALLOUTS};
use crate::load::ConfigFormat;
use cwlog_shared::{ErrorCode, ErrorEnvelope};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Current supported configuration schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

const NOISY_SOURCES_MAX: usize = 256;
const LEVEL_OVERRIDES_MAX: usize = 256;

/// Third-party sources whose minimum level is raised by default.
pub const DEFAULT_NOISY_SOURCES: [&str; 10] = [
    "aws_config",
    "aws_sdk_s3",
    "aws_smithy_runtime",
    "aws_smithy_runtime_api",
    "aws_smithy_http",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
    "reqwest",
];

/// Top-level logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct LoggingConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Minimum severity for loggers without an override.
    #[schemars(with = "String")]
    pub min_level: LogLevel,
    /// Field names surfaced in clear text before the JSON payload (0..=2).
    pub callouts: Vec<String>,
    /// Sources whose minimum severity is raised to `noisyLevel`.
    pub noisy_sources: Vec<String>,
    /// Minimum severity applied to noisy sources.
    #[schemars(with = "String")]
    pub noisy_level: LogLevel,
    /// Per-source minimum severities; these win over the noisy table.
    #[schemars(with = "BTreeMap<String, String>")]
    pub level_overrides: BTreeMap<String, LogLevel>,
    /// Terminal renderer.
    pub renderer: RendererKind,
    /// Timestamp settings.
    pub timestamp: TimestampConfig,
    /// Call-site fields added to every event.
    #[schemars(with = "Vec<String>")]
    pub callsite_parameters: Vec<CallsiteParameter>,
    /// JSON payload settings.
    pub json: JsonConfig,
    /// How undecodable bytes are turned into text.
    pub decode_errors: DecodeErrors,
    /// Replace values under secret-looking keys before rendering.
    pub redact_secrets: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            min_level: LogLevel::Debug,
            callouts: Vec::new(),
            noisy_sources: DEFAULT_NOISY_SOURCES.iter().map(ToString::to_string).collect(),
            noisy_level: LogLevel::Warning,
            level_overrides: BTreeMap::new(),
            renderer: RendererKind::default(),
            timestamp: TimestampConfig::default(),
            callsite_parameters: CallsiteParameter::DEFAULTS.to_vec(),
            json: JsonConfig::default(),
            decode_errors: DecodeErrors::default(),
            redact_secrets: false,
        }
    }
}

/// Terminal renderer selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// `[LEVEL] "c1" "c2" {json}` lines.
    #[default]
    Cloudwatch,
    /// Bare JSON lines.
    Json,
}

impl RendererKind {
    /// Parse a renderer name (case-insensitive).
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "cloudwatch" | "aws" => Some(Self::Cloudwatch),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Timestamp settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct TimestampConfig {
    /// Render in UTC (`...Z`) instead of local time with an offset.
    pub utc: bool,
    /// `iso`, `unix`, or a strftime pattern.
    pub format: String,
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            utc: true,
            format: "iso".to_string(),
        }
    }
}

/// Parsed timestamp format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO-8601 with microseconds.
    Iso,
    /// Seconds since the epoch as a float.
    Unix,
    /// strftime pattern.
    Custom(String),
}

impl TimestampFormat {
    fn from_config(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "iso" => Self::Iso,
            "unix" => Self::Unix,
            _ => Self::Custom(raw.to_string()),
        }
    }
}

/// JSON payload settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct JsonConfig {
    /// Emit object keys in sorted order instead of insertion order.
    pub sort_keys: bool,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub ensure_ascii: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            sort_keys: false,
            ensure_ascii: true,
        }
    }
}

/// Strategy for bytes that are not valid UTF-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DecodeErrors {
    /// Substitute U+FFFD.
    #[default]
    Replace,
    /// Write `\xNN` escapes.
    Backslash,
}

impl LoggingConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedLoggingConfig, ConfigSchemaError> {
        self.validate_version()?;
        self.normalize();

        let callouts = CalloutSpec::new(&self.callouts).map_err(ConfigSchemaError::Callouts)?;
        if self.noisy_sources.len() > NOISY_SOURCES_MAX {
            return Err(ConfigSchemaError::ListTooLarge {
                field: "noisySources",
                len: self.noisy_sources.len(),
                max: NOISY_SOURCES_MAX,
            });
        }
        if self.level_overrides.len() > LEVEL_OVERRIDES_MAX {
            return Err(ConfigSchemaError::ListTooLarge {
                field: "levelOverrides",
                len: self.level_overrides.len(),
                max: LEVEL_OVERRIDES_MAX,
            });
        }
        if let Some(source) = self.noisy_sources.iter().find(|source| !is_valid_source(source)) {
            return Err(ConfigSchemaError::InvalidSourceName {
                field: "noisySources",
                name: source.clone(),
            });
        }
        if let Some(source) = self.level_overrides.keys().find(|source| !is_valid_source(source)) {
            return Err(ConfigSchemaError::InvalidSourceName {
                field: "levelOverrides",
                name: source.clone(),
            });
        }
        if self.timestamp.format.trim().is_empty() {
            return Err(ConfigSchemaError::EmptyTimestampFormat);
        }

        let timestamp_format = TimestampFormat::from_config(&self.timestamp.format);
        Ok(ValidatedLoggingConfig {
            raw: self,
            callouts,
            timestamp_format,
        })
    }

    const fn validate_version(&self) -> Result<(), ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }
        Ok(())
    }

    fn normalize(&mut self) {
        for callout in &mut self.callouts {
            *callout = callout.trim().to_string();
        }
        self.noisy_sources = dedupe_in_order(
            self.noisy_sources
                .iter()
                .map(|source| source.trim().to_string()),
        );
        self.callsite_parameters = dedupe_in_order(self.callsite_parameters.iter().copied());
    }
}

fn dedupe_in_order<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn is_valid_source(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':'))
}

/// Validated config wrapper carrying the parsed callout spec and timestamp format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLoggingConfig {
    raw: LoggingConfig,
    callouts: CalloutSpec,
    timestamp_format: TimestampFormat,
}

impl ValidatedLoggingConfig {
    /// Parsed callout spec.
    #[must_use]
    pub const fn callouts(&self) -> &CalloutSpec {
        &self.callouts
    }

    /// Parsed timestamp format.
    #[must_use]
    pub const fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Borrow the raw config.
    #[must_use]
    pub const fn as_ref(&self) -> &LoggingConfig {
        &self.raw
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> LoggingConfig {
        self.raw
    }
}

impl Default for ValidatedLoggingConfig {
    fn default() -> Self {
        Self {
            raw: LoggingConfig::default(),
            callouts: CalloutSpec::none(),
            timestamp_format: TimestampFormat::Iso,
        }
    }
}

impl AsRef<LoggingConfig> for ValidatedLoggingConfig {
    fn as_ref(&self) -> &LoggingConfig {
        &self.raw
    }
}

impl std::ops::Deref for ValidatedLoggingConfig {
    type Target = LoggingConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

/// Parse a logging config from a JSON string, applying validation and normalization.
pub fn parse_logging_config_json(input: &str) -> Result<ValidatedLoggingConfig, ErrorEnvelope> {
    let config = ConfigFormat::Json.parse(input)?;
    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a logging config from a TOML string, applying validation and normalization.
pub fn parse_logging_config_toml(input: &str) -> Result<ValidatedLoggingConfig, ErrorEnvelope> {
    let config = ConfigFormat::Toml.parse(input)?;
    config.validate_and_normalize().map_err(Into::into)
}

/// JSON Schema for `LoggingConfig`.
#[must_use]
pub fn logging_config_schema() -> schemars::Schema {
    schemars::schema_for!(LoggingConfig)
}

/// Typed validation errors for the configuration schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// The callout list is invalid.
    Callouts(CalloutSpecError),
    /// A list field exceeds the maximum allowed size.
    ListTooLarge {
        /// Field name in the config file (e.g. `noisySources`).
        field: &'static str,
        /// Number of entries after normalization.
        len: usize,
        /// Maximum allowed number of entries.
        max: usize,
    },
    /// A logger/source name contains unsupported characters.
    InvalidSourceName {
        /// Field name in the config file.
        field: &'static str,
        /// Offending name.
        name: String,
    },
    /// `timestamp.format` is blank.
    EmptyTimestampFormat,
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::Callouts(CalloutSpecError::TooMany { .. }) => {
                ErrorCode::new("config", "too_many_callouts")
            },
            Self::Callouts(CalloutSpecError::EmptyKey { .. }) => {
                ErrorCode::new("config", "empty_callout")
            },
            Self::ListTooLarge { .. } => ErrorCode::new("config", "list_too_large"),
            Self::InvalidSourceName { .. } => ErrorCode::new("config", "invalid_source_name"),
            Self::EmptyTimestampFormat => ErrorCode::new("config", "invalid_timestamp_format"),
        }
    }
}

impl fmt::Display for ConfigSchemaError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => write!(
                formatter,
                "unsupported config version {found} (supported: {supported})"
            ),
            Self::Callouts(error) => write!(formatter, "callouts: {error}"),
            Self::ListTooLarge { field, len, max } => {
                write!(formatter, "{field} is too large ({len} items, max {max})")
            },
            Self::InvalidSourceName { field, name } => {
                write!(formatter, "{field} contains an invalid source name: {name:?}")
            },
            Self::EmptyTimestampFormat => formatter.write_str("timestamp.format must be non-empty"),
        }
    }
}

impl std::error::Error for ConfigSchemaError {}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::Callouts(CalloutSpecError::TooMany { count }) => envelope
                .with_metadata("count", count.to_string())
                .with_metadata("max", MAX_CALLOUTS.to_string()),
            ConfigSchemaError::Callouts(CalloutSpecError::EmptyKey { index }) => {
                envelope.with_metadata("index", index.to_string())
            },
            ConfigSchemaError::ListTooLarge { field, len, max } => envelope
                .with_metadata("field", field)
                .with_metadata("len", len.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::InvalidSourceName { field, name } => envelope
                .with_metadata("field", field)
                .with_metadata("name", name),
            ConfigSchemaError::EmptyTimestampFormat => envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() -> Result<(), ConfigSchemaError> {
        let config = LoggingConfig::default().validate_and_normalize()?;
        assert_eq!(config.min_level, LogLevel::Debug);
        assert_eq!(config.noisy_level, LogLevel::Warning);
        assert_eq!(config.callouts(), &CalloutSpec::none());
        assert_eq!(config.timestamp_format(), &TimestampFormat::Iso);
        assert_eq!(config.renderer, RendererKind::Cloudwatch);
        assert!(config.json.ensure_ascii);
        assert!(!config.redact_secrets);
        Ok(())
    }

    #[test]
    fn three_callouts_are_rejected() {
        let config = LoggingConfig {
            callouts: vec!["a".into(), "b".into(), "c".into()],
            ..LoggingConfig::default()
        };
        let error = config.validate_and_normalize();
        assert_eq!(
            error,
            Err(ConfigSchemaError::Callouts(CalloutSpecError::TooMany { count: 3 }))
        );

        let envelope = ErrorEnvelope::from(ConfigSchemaError::Callouts(
            CalloutSpecError::TooMany { count: 3 },
        ));
        assert_eq!(envelope.code, ErrorCode::new("config", "too_many_callouts"));
        assert_eq!(envelope.metadata.get("max").map(String::as_str), Some("2"));
    }

    #[test]
    fn normalization_trims_and_dedupes() -> Result<(), ConfigSchemaError> {
        let config = LoggingConfig {
            callouts: vec![" order_id ".into()],
            noisy_sources: vec!["hyper".into(), " h2".into(), "hyper".into()],
            callsite_parameters: vec![
                CallsiteParameter::Lineno,
                CallsiteParameter::Filename,
                CallsiteParameter::Lineno,
            ],
            ..LoggingConfig::default()
        }
        .validate_and_normalize()?;

        assert_eq!(config.callouts().first(), Some("order_id"));
        assert_eq!(config.noisy_sources, vec!["hyper".to_string(), "h2".to_string()]);
        assert_eq!(
            config.callsite_parameters,
            vec![CallsiteParameter::Lineno, CallsiteParameter::Filename]
        );
        Ok(())
    }

    #[test]
    fn invalid_source_names_are_rejected() {
        let config = LoggingConfig {
            noisy_sources: vec!["bad name".into()],
            ..LoggingConfig::default()
        };
        assert!(matches!(
            config.validate_and_normalize(),
            Err(ConfigSchemaError::InvalidSourceName { field: "noisySources", .. })
        ));
    }

    #[test]
    fn parses_json_and_toml() -> Result<(), ErrorEnvelope> {
        let json = parse_logging_config_json(
            r#"{"minLevel":"info","callouts":["order_id","amount"],"renderer":"json","timestamp":{"format":"unix"}}"#,
        )?;
        assert_eq!(json.min_level, LogLevel::Info);
        assert_eq!(json.callouts().second(), Some("amount"));
        assert_eq!(json.renderer, RendererKind::Json);
        assert_eq!(json.timestamp_format(), &TimestampFormat::Unix);

        let toml = parse_logging_config_toml(
            "minLevel = \"warning\"\nredactSecrets = true\n\n[levelOverrides]\n\"app::db\" = \"error\"\n\n[json]\nsortKeys = true\n",
        )?;
        assert_eq!(toml.min_level, LogLevel::Warning);
        assert!(toml.redact_secrets);
        assert!(toml.json.sort_keys);
        assert_eq!(toml.level_overrides.get("app::db"), Some(&LogLevel::Error));
        Ok(())
    }

    #[test]
    fn unknown_fields_fail_with_stable_code() {
        let error = parse_logging_config_json(r#"{"minimumLevel":"info"}"#);
        assert!(matches!(
            error,
            Err(ref envelope) if envelope.code == ErrorCode::new("config", "invalid_json")
        ));
    }

    #[test]
    fn schema_describes_camel_case_fields() -> Result<(), Box<dyn std::error::Error>> {
        let schema = serde_json::to_value(logging_config_schema())?;
        let properties = schema
            .get("properties")
            .and_then(serde_json::Value::as_object)
            .ok_or("missing properties")?;
        assert!(properties.contains_key("minLevel"));
        assert!(properties.contains_key("callouts"));
        assert!(properties.contains_key("redactSecrets"));
        Ok(())
    }
}
