//! Log severity levels.

use cwlog_shared::{ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LogLevel {
    /// Diagnostic detail.
    #[default]
    Debug,
    /// Routine operational messages.
    Info,
    /// Something unexpected that did not stop the operation.
    Warning,
    /// The operation failed.
    Error,
    /// The process cannot continue normally.
    Critical,
}

impl LogLevel {
    /// All levels in ascending severity.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Critical,
    ];

    /// Lowercase name written to the `level` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Uppercase name used in the bracketed line prefix.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }

    /// Numeric rank compatible with the classic `10..=50` severity scale.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Debug => 10,
            Self::Info => 20,
            Self::Warning => 30,
            Self::Error => 40,
            Self::Critical => 50,
        }
    }

    /// Returns true when a record at `self` passes a `minimum` threshold.
    #[must_use]
    pub fn is_enabled_for(self, minimum: Self) -> bool {
        self >= minimum
    }

    /// Parse a level name (case-insensitive). Accepts `warn` and `fatal`.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            "critical" | "fatal" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Level name that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelParseError {
    /// The raw input.
    pub input: String,
}

impl fmt::Display for LevelParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "invalid log level: '{}' (expected debug, info, warning, error, or critical)",
            self.input
        )
    }
}

impl std::error::Error for LevelParseError {}

impl From<LevelParseError> for ErrorEnvelope {
    fn from(error: LevelParseError) -> Self {
        let message = error.to_string();
        Self::expected(ErrorCode::new("domain", "invalid_log_level"), message)
            .with_metadata("input", error.input)
    }
}

impl FromStr for LogLevel {
    type Err = LevelParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::parse(input).ok_or_else(|| LevelParseError {
            input: input.to_string(),
        })
    }
}

impl Serialize for LogLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
