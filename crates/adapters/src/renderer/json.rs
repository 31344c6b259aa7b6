//! JSON payload rendering.

use super::{Fallback, default_fallback};
use cwlog_domain::{EventDict, FallbackFn, JsonView};
use cwlog_ports::{RecordMeta, Renderer};
use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::Formatter;
use std::io;

/// Emitted instead of the payload when serialization fails.
pub const RENDER_FAILED_LINE: &str =
    r#"{"event":"log serialization failed","level":"error","logger":"cwlog"}"#;

/// Payload encoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonOptions {
    /// Sort object keys at every depth.
    pub sort_keys: bool,
    /// Escape every non-ASCII character as `\uXXXX`.
    pub ensure_ascii: bool,
}

impl Default for JsonOptions {
    fn default() -> Self {
        Self {
            sort_keys: false,
            ensure_ascii: true,
        }
    }
}

impl From<cwlog_config::JsonConfig> for JsonOptions {
    fn from(config: cwlog_config::JsonConfig) -> Self {
        Self {
            sort_keys: config.sort_keys,
            ensure_ascii: config.ensure_ascii,
        }
    }
}

/// Serialize `event` as one compact JSON object.
pub fn serialize_event(
    event: &EventDict,
    options: JsonOptions,
    fallback: &FallbackFn,
) -> Result<String, serde_json::Error> {
    let view = JsonView::map(event, fallback).sorted(options.sort_keys);
    if !options.ensure_ascii {
        return serde_json::to_string(&view);
    }
    let mut buffer = Vec::with_capacity(128);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, AsciiFormatter);
    view.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde_json::Error::custom)
}

/// [`serialize_event`], degrading to [`RENDER_FAILED_LINE`] on error.
#[must_use]
pub fn render_payload(event: &EventDict, options: JsonOptions, fallback: &FallbackFn) -> String {
    serialize_event(event, options, fallback).unwrap_or_else(|_| RENDER_FAILED_LINE.to_string())
}

/// Compact formatter that escapes non-ASCII text.
struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment.get(start..index).unwrap_or_default().as_bytes())?;
            let mut units = [0_u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment.get(start..).unwrap_or_default().as_bytes())
    }
}

/// Renders the payload alone.
#[derive(Clone)]
pub struct JsonRenderer {
    options: JsonOptions,
    fallback: Fallback,
}

impl JsonRenderer {
    /// Renderer with the given options and the repr fallback.
    #[must_use]
    pub fn new(options: JsonOptions) -> Self {
        Self {
            options,
            fallback: default_fallback(),
        }
    }

    /// Replace the fallback handler.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new(JsonOptions::default())
    }
}

impl std::fmt::Debug for JsonRenderer {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("JsonRenderer")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, _meta: &RecordMeta<'_>, event: &EventDict) -> String {
        render_payload(event, self.options, &*self.fallback)
    }
}
