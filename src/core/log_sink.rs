//! # Log Sink
//!
//! Append-only, timestamped log shared between the menu engine and any
//! background action workers. This is the only piece of state mutated from
//! more than one thread, so `append` is serialized by an internal mutex:
//! each entry becomes visible atomically, entries are never interleaved or
//! lost, and per-writer order is preserved.
//!
//! The display window is a read-time view. `window(n)` clones the most
//! recent `n` entries; nothing already appended is ever mutated or dropped
//! from storage.

use chrono::{DateTime, Local};
use std::sync::{Mutex, MutexGuard};

/// One logged line: wall-clock capture plus text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub text: String,
}

/// Thread-safe append-only log buffer.
pub struct LogSink {
    lines: Mutex<Vec<LogLine>>,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Append one line, capturing wall-clock time under the lock so the
    /// timestamp-and-append step is a single atomic unit.
    pub fn append(&self, text: impl Into<String>) {
        let mut lines = self.lock();
        lines.push(LogLine {
            at: Local::now(),
            text: text.into(),
        });
    }

    /// The most recent `n` lines (or fewer), oldest first, as a snapshot.
    pub fn window(&self, n: usize) -> Vec<LogLine> {
        let lines = self.lock();
        let start = lines.len().saturating_sub(n);
        lines[start..].to_vec()
    }

    /// Total number of entries appended so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A worker that panicked mid-append only poisons the lock after the push
    // completed or before it started, so recovering the guard is safe.
    fn lock(&self) -> MutexGuard<'_, Vec<LogLine>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}
