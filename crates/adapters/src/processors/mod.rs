//! Built-in processors, in the order the standard pipeline runs them.

mod callsite;
mod exception;
mod filter;
mod names;
pub mod percent;
mod positional;
mod redact;
mod stack;
mod timestamp;
mod unicode;

pub use callsite::CallsiteParameterAdder;
pub use exception::FormatExcInfo;
pub use filter::FilterByLevel;
pub use names::{AddLogLevel, AddLoggerName};
pub use positional::PositionalArgumentsFormatter;
pub use redact::RedactSecrets;
pub use stack::{StackInfoRenderer, full_stack};
pub use timestamp::{Clock, TimeStamper};
pub use unicode::UnicodeDecoder;
