//! Line header rendering for text sinks
//!
//! The header template uses positional placeholders:
//!
//! | Placeholder | Value                                          |
//! |-------------|------------------------------------------------|
//! | `%1%`       | Date (`2025-01-08`)                            |
//! | `%2%`       | Time with microseconds (`10:30:45.123456`)     |
//! | `%3%`       | Level text                                     |
//! | `%4%`       | Thread name, or thread id when unnamed         |
//! | `%5%`       | File name                                      |
//! | `%6%`       | File with full path                            |
//! | `%7%`       | Extended function name if known, else function |
//! | `%8%`       | Function name                                  |
//! | `%9%`       | Extended function name                         |
//! | `%10%`      | Line number                                    |

use super::log_entry::LogEntry;
use super::template;
use std::fmt::Display;

pub const DEFAULT_HEADER_FORMAT: &str = "%1% %2% %3% [%4%] %5% %7%";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFormat {
    template: String,
}

impl HeaderFormat {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn render(&self, entry: &LogEntry) -> String {
        self.render_with_level(entry, &entry.level)
    }

    /// Render with a caller-supplied level text, e.g. a colored one.
    pub fn render_with_level(&self, entry: &LogEntry, level: &dyn Display) -> String {
        let date = entry.timestamp.format("%Y-%m-%d");
        let time = entry.timestamp.format("%H:%M:%S%.6f");
        let thread = entry.thread_name.as_deref().unwrap_or(&entry.thread_id);
        let file_name = entry.file_name().unwrap_or("");
        let path = entry.file.as_deref().unwrap_or("");
        let display_function = entry.display_function().unwrap_or("");
        let function = entry.function.as_deref().unwrap_or("");
        let extended = entry.extended_function.as_deref().unwrap_or("");
        let line = entry.line.map(|l| l.to_string()).unwrap_or_default();

        let args: [&dyn Display; 10] = [
            &date,
            &time,
            level,
            &thread,
            &file_name,
            &path,
            &display_function,
            &function,
            &extended,
            &line,
        ];
        template::render(&self.template, &args)
    }

    /// Header followed by the message body.
    pub fn line(&self, entry: &LogEntry) -> String {
        format!("{} {}", self.render(entry), entry.message)
    }
}

impl Default for HeaderFormat {
    fn default() -> Self {
        Self::new(DEFAULT_HEADER_FORMAT)
    }
}
