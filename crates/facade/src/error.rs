//! Facade error type.

use cwlog_shared::{ErrorCode, ErrorEnvelope};

/// Failures of the configuration entry points.
///
/// Logging calls themselves only ever fail with the sink's `io::Error`.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// A configuration was already installed (or defaults were frozen by an
    /// earlier `get_logger`).
    #[error("logging is already configured")]
    AlreadyConfigured,
    /// The configuration could not be loaded or validated.
    #[error("invalid logging configuration: {0}")]
    Config(#[from] ErrorEnvelope),
    /// Another global tracing subscriber is already installed.
    #[error("failed to install tracing bridge: {0}")]
    Bridge(String),
}

impl From<LoggingError> for ErrorEnvelope {
    fn from(error: LoggingError) -> Self {
        match error {
            LoggingError::AlreadyConfigured => Self::expected(
                ErrorCode::already_configured(),
                "logging is already configured",
            ),
            LoggingError::Config(envelope) => envelope,
            LoggingError::Bridge(message) => Self::expected(
                ErrorCode::new("logging", "bridge_install_failed"),
                message,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_configured_maps_to_shared_code() {
        let envelope = ErrorEnvelope::from(LoggingError::AlreadyConfigured);
        assert_eq!(envelope.code, ErrorCode::already_configured());
    }

    #[test]
    fn config_errors_keep_their_envelope() {
        let source = ErrorEnvelope::expected(ErrorCode::new("config", "too_many_callouts"), "boom");
        let error = LoggingError::from(source.clone());
        assert!(error.to_string().contains("boom"));
        assert_eq!(ErrorEnvelope::from(error), source);
    }
}
