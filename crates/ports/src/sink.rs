//! Output sink contract.

use std::io;

/// Receives rendered lines.
pub trait LogSink: Send + Sync {
    /// Write `line` followed by a newline as one atomic write.
    fn write_line(&self, line: &str) -> io::Result<()>;
}
