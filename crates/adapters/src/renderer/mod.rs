//! Terminal renderers.

mod cloudwatch;
mod json;

pub use cloudwatch::CloudWatchRenderer;
pub use json::{JsonOptions, JsonRenderer, RENDER_FAILED_LINE, render_payload, serialize_event};

use cwlog_domain::{FallbackFn, FieldValue, repr_fallback};
use std::sync::Arc;

/// Shared fallback handler for values without a JSON form.
pub type Fallback = Arc<FallbackFn>;

/// The default fallback: the value's repr text.
#[must_use]
pub fn default_fallback() -> Fallback {
    Arc::new(|value: &FieldValue| repr_fallback(value))
}
