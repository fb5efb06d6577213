//! File sink implementation

use crate::core::{HeaderFormat, LogEntry, LogxxError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per entry to a file. Writes are buffered and flushed
/// after every dispatched batch.
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
    header: HeaderFormat,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogxxError::file_sink(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            path,
            writer: BufWriter::new(file),
            header: HeaderFormat::default(),
        })
    }

    /// Set the header format for this sink
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use logxx::sinks::FileSink;
    /// use logxx::HeaderFormat;
    ///
    /// let sink = FileSink::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_header(HeaderFormat::new("%1%T%2% %3% %6%:%10% %8%"));
    /// ```
    #[must_use]
    pub fn with_header(mut self, header: HeaderFormat) -> Self {
        self.header = header;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        let mut output = self.header.line(entry);
        output.push('\n');

        self.writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
