//! Sink trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// An output backend for admitted entries.
///
/// Sinks run only on the dispatcher's worker thread (or on the thread
/// calling `shutdown` for the final drain). A returned error is reported and
/// counted by the dispatcher but never retried; the sink decides whether to
/// buffer, drop, or retry on its own.
pub trait Sink: Send {
    fn write(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
