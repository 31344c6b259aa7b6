//! Reserved event dict keys.

/// Message text.
pub const EVENT: &str = "event";
/// Logger name.
pub const LOGGER: &str = "logger";
/// Lowercase level name.
pub const LEVEL: &str = "level";
/// ISO-8601 timestamp.
pub const TIMESTAMP: &str = "timestamp";
/// Positional arguments for `%`-style interpolation of `event`.
pub const POSITIONAL_ARGS: &str = "positional_args";
/// Flag requesting a stack rendering.
pub const STACK_INFO: &str = "stack_info";
/// Rendered stack.
pub const STACK: &str = "stack";
/// Flag or captured error requesting exception rendering.
pub const EXC_INFO: &str = "exc_info";
/// Rendered exception.
pub const EXCEPTION: &str = "exception";
