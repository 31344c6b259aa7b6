//! Captured error information attached to log records.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExceptionDetails {
    type_name: String,
    message: String,
    causes: Vec<String>,
    backtrace: Option<String>,
}

/// An error captured at the log call site.
///
/// Holds the error's short type name, its message, the messages of its
/// `source()` chain and, when `RUST_BACKTRACE` enables capture, a backtrace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    inner: Arc<ExceptionDetails>,
}

impl ExceptionInfo {
    /// Build from a bare type name and message.
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ExceptionDetails {
                type_name: type_name.into(),
                message: message.into(),
                causes: Vec::new(),
                backtrace: None,
            }),
        }
    }

    /// Capture a concrete error, its source chain and a backtrace.
    pub fn from_error<E>(error: &E) -> Self
    where
        E: Error + 'static,
    {
        Self::capture(short_type_name(std::any::type_name::<E>()), error)
    }

    /// Capture a type-erased error.
    pub fn from_dyn(error: &(dyn Error + 'static)) -> Self {
        Self::capture("Error".to_string(), error)
    }

    fn capture(type_name: String, error: &(dyn Error + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut current = error.source();
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }
        let backtrace = Backtrace::capture();
        let backtrace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        Self {
            inner: Arc::new(ExceptionDetails {
                type_name,
                message: error.to_string(),
                causes,
                backtrace,
            }),
        }
    }

    /// Replace the backtrace text.
    #[must_use]
    pub fn with_backtrace(self, backtrace: impl Into<String>) -> Self {
        let details = Arc::unwrap_or_clone(self.inner);
        Self {
            inner: Arc::new(ExceptionDetails {
                backtrace: Some(backtrace.into()),
                ..details
            }),
        }
    }

    /// Short type name of the captured error.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    /// Display text of the captured error.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Display text of each error in the source chain, outermost first.
    #[must_use]
    pub fn causes(&self) -> &[String] {
        &self.inner.causes
    }

    /// Backtrace text, when one was captured.
    #[must_use]
    pub fn backtrace(&self) -> Option<&str> {
        self.inner.backtrace.as_deref()
    }

    /// Multi-line rendering stored in the `exception` field.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}", self.type_name(), self.message());
        if !self.causes().is_empty() {
            out.push_str("\n\nCaused by:");
            for (index, cause) in self.causes().iter().enumerate() {
                let _ = write!(out, "\n    {index}: {cause}");
            }
        }
        if let Some(backtrace) = self.backtrace() {
            out.push_str("\n\nStack backtrace:\n");
            out.push_str(backtrace.trim_end());
        }
        out
    }
}

fn short_type_name(full: &str) -> String {
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .to_string()
}
