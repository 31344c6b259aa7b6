//! # cwlog-domain
//!
//! Log record model for the cwlog pipeline.
//!
//! - **Levels** - `LogLevel` and its parsing rules
//! - **Values** - `FieldValue`, `Opaque`, `ExceptionInfo`
//! - **Event dicts** - the insertion-ordered `FieldMap` and its JSON view
//! - **Records** - `LogRecord`, `CallSite`, `CallsiteParameter`
//! - **Callouts** - `CalloutSpec` and the `"none"` placeholder
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared`
//! - No I/O; rendering and sinks live in adapters

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub use cwlog_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod callout;
pub mod callsite;
pub mod exception;
pub mod field_map;
pub mod json;
pub mod keys;
pub mod level;
pub mod record;
pub mod value;

pub use callout::{CALLOUT_PLACEHOLDER, CalloutSpec, CalloutSpecError, MAX_CALLOUTS};
pub use callsite::{CallSite, CallsiteParameter};
pub use exception::ExceptionInfo;
pub use field_map::{EventDict, FieldMap};
pub use json::{FallbackFn, JsonView, repr_fallback};
pub use level::{LevelParseError, LogLevel};
pub use record::LogRecord;
pub use value::{FieldValue, Opaque, format_float};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
