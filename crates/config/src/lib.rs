//! # cwlog-config
//!
//! Logging configuration schema, validation, and normalization.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (env + file).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;

pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_NOISY_SOURCES, DecodeErrors, JsonConfig,
    LoggingConfig, RendererKind, TimestampConfig, TimestampFormat, ValidatedLoggingConfig,
    logging_config_schema, parse_logging_config_json, parse_logging_config_toml,
};

pub use env::{EnvParseError, LoggingEnv, apply_env_overrides};
pub use load::{
    ConfigFormat, load_logging_config_from_path, load_logging_config_from_sources, load_logging_config_std_env,
    to_pretty_json, to_pretty_toml,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
