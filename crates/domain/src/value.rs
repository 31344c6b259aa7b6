//! Field values carried by an event dict.
//!
//! `FieldValue` is a closed tagged union: every value a caller can attach to
//! a log call is one of these variants, so serialization (and the fallback
//! used for variants without a JSON form) stays total.

use crate::exception::ExceptionInfo;
use crate::field_map::FieldMap;
use crate::json::{JsonView, repr_fallback};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer that may exceed `i64::MAX`.
    UInt(u64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 text.
    Text(String),
    /// Raw bytes; decoded to text by the unicode decoder before rendering.
    Bytes(Vec<u8>),
    /// Ordered sequence.
    List(Vec<FieldValue>),
    /// Nested ordered mapping.
    Map(FieldMap),
    /// Captured error, consumed by the exception formatter under `exc_info`.
    Exception(ExceptionInfo),
    /// Arbitrary value without a JSON form; rendered through the fallback.
    Opaque(Opaque),
}

impl FieldValue {
    /// Wrap any debuggable value as an opaque field.
    pub fn opaque<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self::Opaque(Opaque::new(value))
    }

    /// Build a bytes value.
    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(value.into())
    }

    /// Truthiness used for flag fields such as `stack_info` and `exc_info`.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Int(value) => *value != 0,
            Self::UInt(value) => *value != 0,
            Self::Float(value) => *value != 0.0,
            Self::Text(value) => !value.is_empty(),
            Self::Bytes(value) => !value.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Map(map) => !map.is_empty(),
            Self::Exception(_) | Self::Opaque(_) => true,
        }
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) | Self::UInt(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Exception(_) => "exception",
            Self::Opaque(_) => "opaque",
        }
    }

    /// Returns the text when the value is `Text`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true when the value has a direct JSON representation.
    #[must_use]
    pub const fn is_json_native(&self) -> bool {
        !matches!(self, Self::Bytes(_) | Self::Exception(_) | Self::Opaque(_))
    }

    /// Debug-style representation: quoted text, `b"..."` bytes, type-tagged
    /// exceptions, and the `Debug` output of opaque values.
    #[must_use]
    pub fn repr(&self) -> String {
        match self {
            Self::Text(value) => format!("{value:?}"),
            Self::Bytes(value) => format!("b\"{}\"", value.escape_ascii()),
            Self::Exception(info) => format!("{}({:?})", info.type_name(), info.message()),
            Self::Opaque(opaque) => opaque.repr(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::UInt(value) => write!(formatter, "{value}"),
            Self::Float(value) => formatter.write_str(&format_float(*value)),
            Self::Text(value) => formatter.write_str(value),
            Self::Bytes(value) => formatter.write_str(&String::from_utf8_lossy(value)),
            Self::List(_) | Self::Map(_) => {
                let rendered = serde_json::to_string(&JsonView::value(self, &repr_fallback))
                    .map_err(|_| fmt::Error)?;
                formatter.write_str(&rendered)
            },
            Self::Exception(info) => {
                write!(formatter, "{}: {}", info.type_name(), info.message())
            },
            Self::Opaque(opaque) => formatter.write_str(&opaque.repr()),
        }
    }
}

/// Shortest round-trip float text (`19.99`, `2.0`), with `NaN`/`inf` spelled out.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }
    serde_json::Number::from_f64(value).map_or_else(|| value.to_string(), |number| number.to_string())
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        JsonView::value(self, &repr_fallback).serialize(serializer)
    }
}

/// Arbitrary value without a JSON form.
///
/// Equality is identity: two opaque values are equal only when they share
/// the same allocation.
#[derive(Clone)]
pub struct Opaque {
    type_name: &'static str,
    value: Arc<dyn fmt::Debug + Send + Sync>,
}

impl Opaque {
    /// Wrap a value.
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// Full type name of the wrapped value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `Debug` rendering of the wrapped value.
    #[must_use]
    pub fn repr(&self) -> String {
        format!("{:?}", self.value)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.value, formatter)
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::Int(i64::from(value))
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    Self::UInt(u64::from(value))
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<isize> for FieldValue {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Float(value as f64), Self::Int)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(|_| Self::Float(value as f64), Self::UInt)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<Box<str>> for FieldValue {
    fn from(value: Box<str>) -> Self {
        Self::Text(value.into_string())
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<Self>> for FieldValue {
    fn from(value: Vec<Self>) -> Self {
        Self::List(value)
    }
}

impl From<FieldMap> for FieldValue {
    fn from(value: FieldMap) -> Self {
        Self::Map(value)
    }
}

impl From<ExceptionInfo> for FieldValue {
    fn from(value: ExceptionInfo) -> Self {
        Self::Exception(value)
    }
}

impl From<Opaque> for FieldValue {
    fn from(value: Opaque) -> Self {
        Self::Opaque(value)
    }
}

impl<T> From<Option<T>> for FieldValue
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map(Self::Int)
                .or_else(|| number.as_u64().map(Self::UInt))
                .or_else(|| number.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            serde_json::Value::String(value) => Self::Text(value),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            },
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
