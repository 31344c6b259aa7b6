//! Source location of a log call.

use serde::{Deserialize, Serialize};
use std::panic::Location;

/// Where a log call was made.
///
/// File, line and column come from `#[track_caller]`. The exact function
/// path is only known when the call went through one of the logging macros;
/// otherwise [`CallSite::function_name`] degrades to the module or file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// Source file path as seen by the compiler.
    pub file: &'static str,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
    /// Enclosing function path, if known.
    pub function: Option<&'static str>,
    /// Module path, if known.
    pub module: Option<&'static str>,
}

impl CallSite {
    /// Location of the nearest caller not marked `#[track_caller]`.
    #[track_caller]
    #[must_use]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    /// Convert a panic location.
    #[must_use]
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
            function: None,
            module: None,
        }
    }

    /// Attach the enclosing function path.
    #[must_use]
    pub const fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// Attach the module path.
    #[must_use]
    pub const fn with_module(mut self, module: &'static str) -> Self {
        self.module = Some(module);
        self
    }

    /// Final path component of `file`.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        let file = self.file;
        file.rsplit(['/', '\\']).next().unwrap_or(file)
    }

    /// Stem of `file`; `mod.rs` files are named after their directory.
    #[must_use]
    pub fn file_stem(&self) -> Option<&'static str> {
        let mut components = self.file.rsplit(['/', '\\']);
        let name = components.next()?;
        let stem = name.strip_suffix(".rs").unwrap_or(name);
        let stem = if stem == "mod" { components.next()? } else { stem };
        (!stem.is_empty()).then_some(stem)
    }

    /// Last segment of the function path, else the module path, else the
    /// file stem.
    #[must_use]
    pub fn function_name(&self) -> Option<&'static str> {
        match (self.function, self.module) {
            (Some(function), _) => function.rsplit("::").next(),
            (None, Some(module)) => Some(module),
            (None, None) => self.file_stem(),
        }
    }
}

/// A call-site parameter the callsite processor can add to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallsiteParameter {
    /// Full source path.
    Pathname,
    /// Source file name.
    Filename,
    /// Module path.
    Module,
    /// Enclosing function name.
    FuncName,
    /// Line number.
    Lineno,
    /// Debug id of the current thread.
    Thread,
    /// Name of the current thread.
    ThreadName,
    /// Process id.
    Process,
}

impl CallsiteParameter {
    /// Parameters added when nothing else is configured.
    pub const DEFAULTS: [Self; 3] = [Self::Filename, Self::FuncName, Self::Lineno];

    /// Event dict key written for this parameter.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Pathname => "pathname",
            Self::Filename => "filename",
            Self::Module => "module",
            Self::FuncName => "func_name",
            Self::Lineno => "lineno",
            Self::Thread => "thread",
            Self::ThreadName => "thread_name",
            Self::Process => "process",
        }
    }
}
