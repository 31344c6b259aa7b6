//! Masking of secret-looking fields.

use cwlog_domain::{EventDict, FieldMap, FieldValue};
use cwlog_ports::{Processor, RecordMeta, Step};
use cwlog_shared::{REDACTED, is_secret_key};

/// Masks values stored under secret-looking keys, at any depth.
#[derive(Debug, Default, Clone, Copy)]
pub struct RedactSecrets;

impl Processor for RedactSecrets {
    fn name(&self) -> &'static str {
        "redact_secrets"
    }

    fn process(&self, _meta: &RecordMeta<'_>, mut event: EventDict) -> Step {
        redact_fields(&mut event);
        Step::Continue(event)
    }
}

fn redact_fields(fields: &mut FieldMap) {
    for (key, value) in fields.iter_mut() {
        if is_secret_key(key) {
            *value = FieldValue::Text(REDACTED.to_string());
        } else {
            redact_value(value);
        }
    }
}

fn redact_value(value: &mut FieldValue) {
    match value {
        FieldValue::Map(map) => redact_fields(map),
        FieldValue::List(items) => {
            for item in items {
                redact_value(item);
            }
        },
        _ => {},
    }
}
