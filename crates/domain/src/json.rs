//! Order-preserving JSON view over field values.
//!
//! Variants without a native JSON form (bytes, exceptions, opaque values)
//! are passed to a fallback handler, so serializing a view never fails on
//! account of the data it holds.

use crate::field_map::FieldMap;
use crate::value::FieldValue;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Converts a non-native value into something JSON can carry.
pub type FallbackFn = dyn Fn(&FieldValue) -> serde_json::Value + Send + Sync;

/// Default fallback: the value's debug-style representation as a string.
pub fn repr_fallback(value: &FieldValue) -> serde_json::Value {
    serde_json::Value::String(value.repr())
}

#[derive(Clone, Copy)]
enum Target<'a> {
    Value(&'a FieldValue),
    Map(&'a FieldMap),
}

/// Borrowed serializer for a `FieldMap` or `FieldValue`.
#[derive(Clone, Copy)]
pub struct JsonView<'a> {
    target: Target<'a>,
    fallback: &'a FallbackFn,
    sort_keys: bool,
}

impl<'a> JsonView<'a> {
    /// View over a whole map, keys in insertion order.
    pub fn map(map: &'a FieldMap, fallback: &'a FallbackFn) -> Self {
        Self {
            target: Target::Map(map),
            fallback,
            sort_keys: false,
        }
    }

    /// View over a single value.
    pub fn value(value: &'a FieldValue, fallback: &'a FallbackFn) -> Self {
        Self {
            target: Target::Value(value),
            fallback,
            sort_keys: false,
        }
    }

    /// Emit object keys in lexicographic order at every depth.
    #[must_use]
    pub const fn sorted(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    const fn nested(&self, value: &'a FieldValue) -> Self {
        Self {
            target: Target::Value(value),
            fallback: self.fallback,
            sort_keys: self.sort_keys,
        }
    }

    fn serialize_map<S: Serializer>(&self, map: &'a FieldMap, serializer: S) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&str, &FieldValue)> = map.iter().collect();
        if self.sort_keys {
            entries.sort_by(|left, right| left.0.cmp(right.0));
        }
        let mut out = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            out.serialize_entry(key, &self.nested(value))?;
        }
        out.end()
    }
}

impl Serialize for JsonView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let value = match self.target {
            Target::Map(map) => return self.serialize_map(map, serializer),
            Target::Value(value) => value,
        };
        match value {
            FieldValue::Null => serializer.serialize_unit(),
            FieldValue::Bool(flag) => serializer.serialize_bool(*flag),
            FieldValue::Int(number) => serializer.serialize_i64(*number),
            FieldValue::UInt(number) => serializer.serialize_u64(*number),
            FieldValue::Float(number) => serializer.serialize_f64(*number),
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&self.nested(item))?;
                }
                seq.end()
            },
            FieldValue::Map(map) => self.serialize_map(map, serializer),
            FieldValue::Bytes(_) | FieldValue::Exception(_) | FieldValue::Opaque(_) => {
                (self.fallback)(value).serialize(serializer)
            },
        }
    }
}
