//! # cwlog-adapters
//!
//! Concrete processors, renderers and sinks behind the `ports` traits, and
//! the [`Pipeline`] that wires them together from a validated config.
//! This crate depends on `ports`, `config`, `domain` and `shared`.

pub mod log_sink;
pub mod pipeline;
pub mod processors;
pub mod renderer;

pub use log_sink::{LogSink, MemoryLogSink, StderrLogSink, StdoutLogSink, WriterLogSink};
pub use pipeline::Pipeline;
pub use renderer::{CloudWatchRenderer, Fallback, JsonOptions, JsonRenderer, default_fallback};

/// Returns the adapters crate version.
#[must_use]
pub const fn adapters_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
