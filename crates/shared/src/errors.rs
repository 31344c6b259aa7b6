//! Error envelope types and helpers.
//!
//! Logging calls never surface pipeline failures; the envelope is used by the
//! configuration layer and the facade, where startup errors must be reported
//! with a stable code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Diagnostic key/value pairs carried by an [`ErrorEnvelope`].
pub type ErrorMetadata = BTreeMap<String, String>;

/// Whether a failure was caused by the caller or by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Invalid configuration or misuse of the API.
    Expected,
    /// Failures the caller could not have prevented (serialization, I/O).
    Unexpected,
}

impl ErrorKind {
    /// Lowercase label used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expected => "expected",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Stable `namespace:code` identifier, e.g. `config:too_many_callouts`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode {
    namespace: String,
    code: String,
}

impl ErrorCode {
    /// Code `code` inside `namespace`.
    pub fn new(namespace: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            code: code.into(),
        }
    }

    /// `core:invalid_input`.
    pub fn invalid_input() -> Self {
        Self::new("core", "invalid_input")
    }

    /// `core:internal`.
    pub fn internal() -> Self {
        Self::new("core", "internal")
    }

    /// `logging:already_configured`: the process-wide factory is frozen.
    pub fn already_configured() -> Self {
        Self::new("logging", "already_configured")
    }

    /// Part before the colon.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Part after the colon.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.namespace, self.code)
    }
}

/// Error reported by configuration and setup calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Caller or environment.
    pub kind: ErrorKind,
    /// Stable code for matching.
    pub code: ErrorCode,
    /// Text for humans.
    pub message: String,
    /// Offending values (config key, env var, path).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: ErrorMetadata,
}

impl ErrorEnvelope {
    fn build(kind: ErrorKind, code: ErrorCode, message: String) -> Self {
        Self {
            kind,
            code,
            message,
            metadata: ErrorMetadata::new(),
        }
    }

    /// Caller error.
    pub fn expected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Expected, code, message.into())
    }

    /// Environment failure.
    pub fn unexpected(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::build(ErrorKind::Unexpected, code, message.into())
    }

    /// Builder form of inserting into [`ErrorEnvelope::metadata`].
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Metadata value recorded under `key`.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}: {}", self.kind, self.code, self.message)
    }
}

impl std::error::Error for ErrorEnvelope {}
