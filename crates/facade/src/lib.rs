//! # cwlog-facade
//!
//! Public logging API: the [`LoggerFactory`], named [`Logger`]s, the
//! process-wide `configure*`/`get_logger` functions, the `tracing` bridge and
//! the logging macros.
//! This crate depends on `adapters`, `config`, `ports`, `domain` and `shared`.
//!
//! ```
//! use cwlog_facade::{FieldMap, LoggerFactory, MemoryLogSink, parse_logging_config_json};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = parse_logging_config_json(r#"{"callouts":["order_id","amount"]}"#)?;
//! let sink = Arc::new(MemoryLogSink::new());
//! let factory = LoggerFactory::with_sink(config, sink.clone());
//!
//! factory.get_logger("payments").info(
//!     "payment accepted",
//!     FieldMap::new().with("order_id", "O-42").with("amount", 19.99),
//! )?;
//! assert!(sink.take()[0].starts_with(r#"[INFO] "O-42" "19.99" {"#));
//! # Ok(())
//! # }
//! ```

mod error;
mod factory;
mod global;
mod logger;
mod macros;
mod noisy;
mod tracing_bridge;

pub use error::LoggingError;
pub use factory::LoggerFactory;
pub use global::{
    configure, configure_factory, configure_from_env, configure_with_sink, factory, get_logger,
    is_configured,
};
pub use logger::Logger;
pub use noisy::LevelTable;
pub use tracing_bridge::{CalloutLayer, install_tracing_bridge, map_level};

pub use cwlog_adapters::{
    CloudWatchRenderer, JsonOptions, JsonRenderer, LogSink, MemoryLogSink, Pipeline,
    StderrLogSink, StdoutLogSink, WriterLogSink, processors,
};
pub use cwlog_config::{
    LoggingConfig, LoggingEnv, ValidatedLoggingConfig, load_logging_config_from_path,
    load_logging_config_std_env, parse_logging_config_json, parse_logging_config_toml,
};
pub use cwlog_domain::{
    CallSite, CalloutSpec, EventDict, ExceptionInfo, FieldMap, FieldValue, LogLevel, LogRecord,
};
pub use cwlog_ports::{LoggerPort, Processor, RecordMeta, Renderer, Step};
pub use cwlog_shared::ErrorEnvelope;

/// Returns the facade crate version.
#[must_use]
pub const fn facade_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
