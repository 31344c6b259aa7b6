//! Logging macros that capture the enclosing function name.
//!
//! ```
//! use cwlog_facade::{LoggerFactory, MemoryLogSink, ValidatedLoggingConfig, info};
//! use std::sync::Arc;
//!
//! # fn main() -> std::io::Result<()> {
//! let sink = Arc::new(MemoryLogSink::new());
//! let factory = LoggerFactory::with_sink(ValidatedLoggingConfig::default(), sink.clone());
//! let logger = factory.get_logger("payments");
//!
//! info!(logger, "user %s paid", ["bob"], order_id = "O-42", amount = 19.99)?;
//! assert!(sink.take()[0].contains(r#""event":"user bob paid""#));
//! # Ok(())
//! # }
//! ```

/// Path of the enclosing function, without closure segments.
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __cwlog_here() {}
        fn __cwlog_type_name<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let mut name = __cwlog_type_name(__cwlog_here);
        name = name.strip_suffix("::__cwlog_here").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name
    }};
}

/// Log at an explicit level: `log_event!(logger, level, "msg", [args], key = value, ...)`.
///
/// The positional argument list is optional.
#[macro_export]
macro_rules! log_event {
    ($logger:expr, $level:expr, $event:expr, [$($arg:expr),* $(,)?] $(, $key:ident = $value:expr)* $(,)?) => {{
        let args: ::std::vec::Vec<$crate::FieldValue> =
            ::std::vec![$($crate::FieldValue::from($arg)),*];
        $logger.log(
            $crate::LogRecord::new($level, $event)
                .with_args(args)
                $(.with_field(::std::stringify!($key), $value))*
                .with_function($crate::function_name!(), ::std::module_path!()),
        )
    }};
    ($logger:expr, $level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        $crate::log_event!($logger, $level, $event, [] $(, $key = $value)*)
    };
}

/// Log at `debug`.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_event!($logger, $crate::LogLevel::Debug, $($rest)+)
    };
}

/// Log at `info`.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_event!($logger, $crate::LogLevel::Info, $($rest)+)
    };
}

/// Log at `warning`.
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_event!($logger, $crate::LogLevel::Warning, $($rest)+)
    };
}

/// Log at `error`.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_event!($logger, $crate::LogLevel::Error, $($rest)+)
    };
}

/// Log at `critical`.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($rest:tt)+) => {
        $crate::log_event!($logger, $crate::LogLevel::Critical, $($rest)+)
    };
}

/// Build a `FieldMap`: `fields! { "order_id" => "O-42", "amount" => 19.99 }`.
#[macro_export]
macro_rules! fields {
    () => {
        $crate::FieldMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::FieldMap::new()$(.with($key, $value))+
    };
}
