//! Process-wide logger factory.
//!
//! The first successful `configure*` call, or the first `get_logger` (which
//! installs defaults), freezes the factory for the life of the process.

use crate::error::LoggingError;
use crate::factory::LoggerFactory;
use crate::logger::Logger;
use cwlog_config::{ValidatedLoggingConfig, load_logging_config_std_env};
use cwlog_ports::LogSink;
use std::path::Path;
use std::sync::{Arc, OnceLock};

static FACTORY: OnceLock<LoggerFactory> = OnceLock::new();

/// Install the standard pipeline for `config`, writing to stdout.
pub fn configure(config: ValidatedLoggingConfig) -> Result<(), LoggingError> {
    install(LoggerFactory::new(config))
}

/// Install the standard pipeline for `config`, writing to `sink`.
pub fn configure_with_sink(
    config: ValidatedLoggingConfig,
    sink: Arc<dyn LogSink>,
) -> Result<(), LoggingError> {
    install(LoggerFactory::with_sink(config, sink))
}

/// Install a prebuilt factory.
pub fn configure_factory(factory: LoggerFactory) -> Result<(), LoggingError> {
    install(factory)
}

/// Load the config from `CWLOG_*` env vars and an optional file, then install it.
pub fn configure_from_env(config_path: Option<&Path>) -> Result<(), LoggingError> {
    if FACTORY.get().is_some() {
        return Err(LoggingError::AlreadyConfigured);
    }
    let config = load_logging_config_std_env(config_path)?;
    configure(config)
}

/// Logger for `name` from the global factory.
pub fn get_logger(name: &str) -> Logger {
    factory().get_logger(name)
}

/// The global factory, installing defaults when nothing was configured.
pub fn factory() -> &'static LoggerFactory {
    FACTORY.get_or_init(|| LoggerFactory::new(ValidatedLoggingConfig::default()))
}

/// Whether the global factory is frozen.
pub fn is_configured() -> bool {
    FACTORY.get().is_some()
}

fn install(factory: LoggerFactory) -> Result<(), LoggingError> {
    FACTORY
        .set(factory)
        .map_err(|_| LoggingError::AlreadyConfigured)
}
