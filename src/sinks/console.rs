//! Console sink implementation

use crate::core::{HeaderFormat, LogEntry, Result, Sink};
use colored::Colorize;
use std::io::Write;

/// Writes one line per entry to standard error.
pub struct ConsoleSink {
    use_colors: bool,
    header: HeaderFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            header: HeaderFormat::default(),
        }
    }

    /// Set the header format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use logxx::sinks::ConsoleSink;
    /// use logxx::HeaderFormat;
    ///
    /// let sink = ConsoleSink::new()
    ///     .with_header(HeaderFormat::new("%2% %3% %5%:%10%"));
    /// ```
    #[must_use]
    pub fn with_header(mut self, header: HeaderFormat) -> Self {
        self.header = header;
        self
    }

    fn format_line(&self, entry: &LogEntry) -> String {
        let header = if self.use_colors {
            let level = entry.level.to_str().color(entry.level.color_code());
            self.header.render_with_level(entry, &level)
        } else {
            self.header.render(entry)
        };
        format!("{} {}", header, entry.message)
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, entry: &LogEntry) -> Result<()> {
        let line = self.format_line(entry);
        writeln!(std::io::stderr().lock(), "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_plain_line() {
        let sink = ConsoleSink::with_colors(false).with_header(HeaderFormat::new("%3% [%5%]"));
        let entry = LogEntry::new(LogLevel::Error, "write failed").with_location("src/io.rs", 9);
        assert_eq!(sink.format_line(&entry), "ERROR [io.rs] write failed");
    }

    #[test]
    fn test_colored_line_keeps_text() {
        let sink = ConsoleSink::new().with_header(HeaderFormat::new("%3%"));
        let entry = LogEntry::new(LogLevel::Warn, "careful");
        let line = sink.format_line(&entry);
        assert!(line.contains("WARN"));
        assert!(line.ends_with("careful"));
    }

    #[test]
    fn test_write_does_not_fail() {
        let mut sink = ConsoleSink::with_colors(false);
        sink.write(&LogEntry::new(LogLevel::Info, "to stderr")).unwrap();
        sink.flush().unwrap();
    }
}
