//! In-memory sink
//!
//! Collects admitted entries into a shared buffer. Useful for tests and for
//! applications that surface recent log lines themselves.

use crate::core::{LogEntry, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared view of the entries a [`MemorySink`] received.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryBuffer {
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: MemoryBuffer,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for reading what this sink has received.
    pub fn buffer(&self) -> MemoryBuffer {
        self.buffer.clone()
    }
}

impl Sink for MemorySink {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        self.buffer.entries.lock().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
