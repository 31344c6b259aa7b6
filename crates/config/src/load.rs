//! Config loading helpers (env + file).
//!
//! Sources merge in a fixed order: defaults, then the config file, then
//! `CWLOG_*` env vars. Validation runs once, on the merged result.

use crate::{LoggingConfig, LoggingEnv, ValidatedLoggingConfig, apply_env_overrides};
use cwlog_shared::{ErrorCode, ErrorEnvelope};
use std::io;
use std::path::Path;

/// Text format of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// JSON (also used for paths without an extension).
    #[default]
    Json,
    /// TOML.
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ErrorEnvelope> {
        let Some(extension) = path.extension() else {
            return Ok(Self::Json);
        };
        let extension = extension.to_string_lossy();
        if extension.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else if extension.eq_ignore_ascii_case("toml") {
            Ok(Self::Toml)
        } else {
            Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "unsupported_format"),
                "logging config must be a .json or .toml file",
            )
            .with_metadata("extension", extension))
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Deserialize a config document without validating it.
    pub fn parse(self, input: &str) -> Result<LoggingConfig, ErrorEnvelope> {
        let parsed = match self {
            Self::Json => serde_json::from_str(input).map_err(|error| error.to_string()),
            Self::Toml => toml::from_str(input).map_err(|error| error.to_string()),
        };
        parsed.map_err(|reason| {
            ErrorEnvelope::expected(
                ErrorCode::new("config", format!("invalid_{}", self.label())),
                format!("logging config is not valid {}: {reason}", self.label()),
            )
        })
    }

    /// Pretty-print a config, ending with a newline.
    pub fn render(self, config: &LoggingConfig) -> Result<String, ErrorEnvelope> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(config).map_err(|error| error.to_string()),
            Self::Toml => toml::to_string_pretty(config).map_err(|error| error.to_string()),
        };
        let mut output = rendered.map_err(|reason| {
            ErrorEnvelope::unexpected(
                ErrorCode::internal(),
                format!("failed to render logging config as {}: {reason}", self.label()),
            )
        })?;
        output.push('\n');
        Ok(output)
    }
}

/// Merge an optional JSON document with env overrides and validate.
///
/// Precedence (highest wins): `env`, `config_json`, defaults.
pub fn load_logging_config_from_sources(
    config_json: Option<&str>,
    env: &LoggingEnv,
) -> Result<ValidatedLoggingConfig, ErrorEnvelope> {
    let base = config_json.map_or_else(
        || Ok(LoggingConfig::default()),
        |input| ConfigFormat::Json.parse(input),
    )?;
    apply_env_overrides(base, env)
}

/// Merge an optional `.json`/`.toml` file with env overrides and validate.
pub fn load_logging_config_from_path(
    config_path: Option<&Path>,
    env: &LoggingEnv,
) -> Result<ValidatedLoggingConfig, ErrorEnvelope> {
    let base = match config_path {
        Some(path) => read_config_file(path)?,
        None => LoggingConfig::default(),
    };
    apply_env_overrides(base, env)
}

/// [`load_logging_config_from_path`] with the process environment.
pub fn load_logging_config_std_env(
    config_path: Option<&Path>,
) -> Result<ValidatedLoggingConfig, ErrorEnvelope> {
    let env = LoggingEnv::from_std_env()?;
    load_logging_config_from_path(config_path, &env)
}

/// Serialize the config as deterministic pretty JSON (with trailing newline).
pub fn to_pretty_json(config: &LoggingConfig) -> Result<String, ErrorEnvelope> {
    ConfigFormat::Json.render(config)
}

/// Serialize the config as deterministic pretty TOML (with trailing newline).
pub fn to_pretty_toml(config: &LoggingConfig) -> Result<String, ErrorEnvelope> {
    ConfigFormat::Toml.render(config)
}

fn read_config_file(path: &Path) -> Result<LoggingConfig, ErrorEnvelope> {
    let format = ConfigFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|error| {
        let code = if error.kind() == io::ErrorKind::NotFound {
            "file_not_found"
        } else {
            "file_unreadable"
        };
        ErrorEnvelope::expected(
            ErrorCode::new("config", code),
            format!("cannot read logging config: {error}"),
        )
        .with_metadata("path", path.display().to_string())
    })?;
    tracing::debug!(path = %path.display(), format = format.label(), "loading logging config");
    format
        .parse(&text)
        .map_err(|envelope| envelope.with_metadata("path", path.display().to_string()))
}
