//! Callout selection for the CloudWatch line prefix.

use crate::field_map::FieldMap;
use cwlog_shared::{ErrorCode, ErrorEnvelope};
use std::fmt;

/// Text used for an unconfigured callout slot or a missing field.
pub const CALLOUT_PLACEHOLDER: &str = "none";

/// Number of callout slots on each line.
pub const MAX_CALLOUTS: usize = 2;

/// Up to two field names whose values are shown in clear text before the JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalloutSpec {
    keys: Vec<Box<str>>,
}

/// Invalid callout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalloutSpecError {
    /// More than [`MAX_CALLOUTS`] names were given.
    TooMany {
        /// Number of names supplied.
        count: usize,
    },
    /// A name was empty or whitespace.
    EmptyKey {
        /// Slot index of the empty name.
        index: usize,
    },
}

impl fmt::Display for CalloutSpecError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooMany { count } => write!(
                formatter,
                "at most {MAX_CALLOUTS} callouts are supported, got {count}"
            ),
            Self::EmptyKey { index } => write!(formatter, "callout {index} has an empty name"),
        }
    }
}

impl std::error::Error for CalloutSpecError {}

impl From<CalloutSpecError> for ErrorEnvelope {
    fn from(error: CalloutSpecError) -> Self {
        let code = match error {
            CalloutSpecError::TooMany { .. } => "too_many_callouts",
            CalloutSpecError::EmptyKey { .. } => "empty_callout",
        };
        Self::expected(ErrorCode::new("config", code), error.to_string())
    }
}

impl CalloutSpec {
    /// No callouts; both slots render the placeholder.
    #[must_use]
    pub const fn none() -> Self {
        Self { keys: Vec::new() }
    }

    /// Build from zero, one or two field names.
    pub fn new<I, S>(keys: I) -> Result<Self, CalloutSpecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<Box<str>> = keys.into_iter().map(|key| key.as_ref().into()).collect();
        if keys.len() > MAX_CALLOUTS {
            return Err(CalloutSpecError::TooMany { count: keys.len() });
        }
        if let Some(index) = keys.iter().position(|key| key.trim().is_empty()) {
            return Err(CalloutSpecError::EmptyKey { index });
        }
        Ok(Self { keys })
    }

    /// Configured names in slot order.
    #[must_use]
    pub fn keys(&self) -> &[Box<str>] {
        &self.keys
    }

    /// First slot name.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.keys.first().map(|key| &**key)
    }

    /// Second slot name.
    #[must_use]
    pub fn second(&self) -> Option<&str> {
        self.keys.get(1).map(|key| &**key)
    }

    /// Clear-text values for both slots.
    ///
    /// A slot renders [`CALLOUT_PLACEHOLDER`] when it has no name or the
    /// event lacks the field. Line breaks are escaped so the result stays on
    /// one line.
    #[must_use]
    pub fn resolve(&self, event: &FieldMap) -> [String; MAX_CALLOUTS] {
        [slot(self.first(), event), slot(self.second(), event)]
    }
}

fn slot(key: Option<&str>, event: &FieldMap) -> String {
    key.and_then(|key| event.get(key)).map_or_else(
        || CALLOUT_PLACEHOLDER.to_string(),
        |value| single_line(&value.to_string()),
    )
}

fn single_line(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_string();
    }
    text.replace('\r', "\\r").replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldValue;

    #[test]
    fn unconfigured_slots_render_placeholder() {
        let event = FieldMap::new().with("order_id", "O-42");
        assert_eq!(CalloutSpec::none().resolve(&event), ["none", "none"]);
    }

    #[test]
    fn missing_fields_render_placeholder() -> Result<(), CalloutSpecError> {
        let spec = CalloutSpec::new(["order_id", "amount"])?;
        let event = FieldMap::new().with("order_id", "O-42");
        assert_eq!(spec.resolve(&event), ["O-42", "none"]);

        let event = FieldMap::new();
        assert_eq!(spec.resolve(&event), ["none", "none"]);
        Ok(())
    }

    #[test]
    fn values_render_as_clear_text() -> Result<(), CalloutSpecError> {
        let spec = CalloutSpec::new(["order_id", "amount"])?;
        let event = FieldMap::new().with("amount", 19.99).with("order_id", "O-42");
        assert_eq!(spec.resolve(&event), ["O-42", "19.99"]);
        Ok(())
    }

    #[test]
    fn line_breaks_are_escaped() -> Result<(), CalloutSpecError> {
        let spec = CalloutSpec::new(["note"])?;
        let event = FieldMap::new().with("note", FieldValue::from("a\nb\r"));
        assert_eq!(spec.resolve(&event), ["a\\nb\\r", "none"]);
        Ok(())
    }

    #[test]
    fn rejects_invalid_specs() {
        assert_eq!(
            CalloutSpec::new(["a", "b", "c"]),
            Err(CalloutSpecError::TooMany { count: 3 })
        );
        assert_eq!(
            CalloutSpec::new(["a", " "]),
            Err(CalloutSpecError::EmptyKey { index: 1 })
        );
        let envelope = ErrorEnvelope::from(CalloutSpecError::TooMany { count: 3 });
        assert_eq!(envelope.code, ErrorCode::new("config", "too_many_callouts"));
    }
}
