//! # Sinks
//!
//! A sink receives finished log lines. The logger writes the serialized
//! record, then the platform line terminator, then flushes, all before the
//! log call returns. The logger itself takes no lock around these calls;
//! each sink decides how it handles being shared.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::core::error::LogError;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Append-text destination with an explicit flush.
pub trait LogSink: Send + Sync {
    fn write_str(&self, text: &str) -> io::Result<()>;
    fn flush(&self) -> io::Result<()>;
}

/// Process stdout. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        io::stdout().lock().write_all(text.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        io::stderr().lock().write_all(text.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

/// Adapts any [`Write`] (an open file, a socket, a pipe) into a sink.
pub struct WriterSink<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { inner: Mutex::new(writer) }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn writer(&self) -> io::Result<MutexGuard<'_, W>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("writer sink lock poisoned"))
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_str(&self, text: &str) -> io::Result<()> {
        self.writer()?.write_all(text.as_bytes())
    }

    fn flush(&self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

/// In-memory sink. Clones share one buffer, so a test can keep a handle
/// while the logger owns another.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    buf: Arc<Mutex<String>>,
    flushes: Arc<Mutex<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        self.buf.lock().map(|b| b.clone()).unwrap_or_default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Parses every written line as JSON.
    pub fn records(&self) -> Result<Vec<Value>, LogError> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line).map_err(LogError::from))
            .collect()
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.lock().map(|n| *n).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut b) = self.buf.lock() {
            b.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn write_str(&self, text: &str) -> io::Result<()> {
        self.buf
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))?
            .push_str(text);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        *self
            .flushes
            .lock()
            .map_err(|_| io::Error::other("memory sink lock poisoned"))? += 1;
        Ok(())
    }
}
