//! Byte-to-text decoding of field values.

use cwlog_config::DecodeErrors;
use cwlog_domain::{EventDict, FieldValue};
use cwlog_ports::{Processor, RecordMeta, Step};
use std::fmt::Write as _;

/// Decodes byte values to text, through nested lists and maps.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeDecoder {
    errors: DecodeErrors,
}

impl UnicodeDecoder {
    /// Decoder using `errors` for invalid UTF-8.
    #[must_use]
    pub const fn new(errors: DecodeErrors) -> Self {
        Self { errors }
    }

    fn decode(self, value: &mut FieldValue) {
        match value {
            FieldValue::Bytes(bytes) => *value = FieldValue::Text(decode_bytes(bytes, self.errors)),
            FieldValue::List(items) => {
                for item in items {
                    self.decode(item);
                }
            },
            FieldValue::Map(map) => {
                for (_, nested) in map.iter_mut() {
                    self.decode(nested);
                }
            },
            _ => {},
        }
    }
}

fn decode_bytes(bytes: &[u8], errors: DecodeErrors) -> String {
    match errors {
        DecodeErrors::Replace => String::from_utf8_lossy(bytes).into_owned(),
        DecodeErrors::Backslash => {
            let mut out = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                out.push_str(chunk.valid());
                for byte in chunk.invalid() {
                    let _ = write!(out, "\\x{byte:02x}");
                }
            }
            out
        },
    }
}

impl Processor for UnicodeDecoder {
    fn name(&self) -> &'static str {
        "unicode_decoder"
    }

    fn process(&self, _meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        for (_, value) in event.iter_mut() {
            self.decode(value);
        }
        Step::Continue(event)
    }
}
