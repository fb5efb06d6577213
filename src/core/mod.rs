//! Core types: entries, levels, the level resolver and the dispatcher

pub mod call_site;
pub mod dispatcher;
pub mod error;
pub mod header;
pub mod log_entry;
pub mod log_level;
pub mod metrics;
pub mod resolver;
pub mod sink;
pub mod template;

pub use call_site::CallSite;
pub use dispatcher::{Dispatcher, DispatcherBuilder, Lifecycle, WORKER_THREAD_NAME};
pub use error::{LogxxError, Result};
pub use header::{HeaderFormat, DEFAULT_HEADER_FORMAT};
pub use log_entry::LogEntry;
pub use log_level::{LevelFilter, LogLevel};
pub use metrics::DispatcherMetrics;
pub use resolver::LevelResolver;
pub use sink::Sink;
