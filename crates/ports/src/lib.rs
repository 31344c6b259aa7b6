//! # cwlog-ports
//!
//! Port traits for the cwlog pipeline.
//!
//! This crate defines the seams between the record model and the concrete
//! processors, renderers and sinks. It depends only on `domain` and `shared`.

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod logger;
pub mod processor;
pub mod sink;

pub use logger::*;
pub use processor::*;
pub use sink::*;

// Re-export the domain types used in port signatures, so adapter crates can
// implement ports without naming `cwlog-domain` for them.
pub use cwlog_domain::{CallSite, EventDict, FieldMap, FieldValue, LogLevel, LogRecord};
