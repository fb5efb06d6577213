//! Log entry structure

use super::call_site::CallSite;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// One log record. Built on the producer thread, read-only once posted.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub thread_name: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
    pub extended_function: Option<String>,
    pub class: Option<String>,
    pub module: Option<String>,
    /// Identity of the lexical call site; `None` for entries built by hand,
    /// which are resolved without touching the decision cache.
    pub call_site_hash: Option<u64>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(&message.into()),
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            file: None,
            line: None,
            function: None,
            extended_function: None,
            class: None,
            module: None,
            call_site_hash: None,
        }
    }

    /// Attach everything a macro captured about the call site.
    pub fn with_call_site(mut self, site: CallSite) -> Self {
        self.file = Some(site.file.to_string());
        self.line = Some(site.line);
        self.module = Some(site.module.to_string());
        self.function = Some(site.function.to_string());
        self.extended_function = Some(site.extended_function.to_string());
        if let Some(class) = site.class {
            self.class = Some(class.to_string());
        }
        self.call_site_hash = Some(site.hash);
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn with_extended_function(mut self, function: impl Into<String>) -> Self {
        self.extended_function = Some(function.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn with_hash(mut self, hash: u64) -> Self {
        self.call_site_hash = Some(hash);
        self
    }

    /// File name without its directories, if a file was recorded.
    pub fn file_name(&self) -> Option<&str> {
        self.file
            .as_deref()
            .map(|path| path.rsplit(['/', '\\']).next().unwrap_or(path))
    }

    /// Extended function name when known, otherwise the bare one.
    pub fn display_function(&self) -> Option<&str> {
        self.extended_function
            .as_deref()
            .or(self.function.as_deref())
    }
}
