//! Line sinks.

pub use cwlog_ports::LogSink;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Writes each line to stdout while holding the stdout lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutLogSink;

impl LogSink for StdoutLogSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        write_locked(&mut io::stdout().lock(), line)
    }
}

/// Writes each line to stderr while holding the stderr lock.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        write_locked(&mut io::stderr().lock(), line)
    }
}

fn write_locked(writer: &mut impl Write, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Wraps any writer (a file, a socket, a buffer) behind a mutex.
#[derive(Debug, Default)]
pub struct WriterLogSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterLogSink<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> LogSink for WriterLogSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        write_locked(&mut *guard, line)
    }
}

/// Keeps lines in memory; for tests and for callers that post-process output.
#[derive(Debug, Default)]
pub struct MemoryLogSink {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every captured line.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.guard())
    }

    /// Copy of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    /// Number of captured lines.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemoryLogSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.guard().push(line.to_string());
        Ok(())
    }
}
