//! Line sinks receiving the simulation's status events.

use crate::error::EnvError;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for formatted status lines.
///
/// # Implementations
///
/// - **Production**: `StdoutSink` - one line per event on standard output
/// - **Tests / scenarios**: `MemorySink` - captures lines for inspection
///
/// Callers serialize access; an implementation only has to write one
/// complete line per call.
pub trait EventSink: Send + 'static {
    /// Writes a single line. `line` carries no trailing newline.
    fn write_line(&mut self, line: &str) -> Result<(), EnvError>;
}

/// Writes each line to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for StdoutSink {
    fn write_line(&mut self, line: &str) -> Result<(), EnvError> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

/// Captures lines in memory.
///
/// Clones share the same buffer, so a test keeps one handle and gives the
/// other to the simulation.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every line written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of lines written so far.
    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<(), EnvError> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
        Ok(())
    }
}
