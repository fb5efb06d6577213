//! # logxx
//!
//! An in-process asynchronous logging core. Application threads build log
//! entries and hand them to a process-wide [`Dispatcher`] without blocking on
//! I/O; one worker thread filters each entry through per-call-site level
//! rules and fans admitted entries out to the registered sinks.
//!
//! ## Features
//!
//! - **Non-blocking producers**: posting is a short critical section
//! - **Hierarchical rules**: thresholds by module, file, function or class,
//!   resolved once per call site and cached
//! - **Pluggable sinks**: console, file, in-memory, or your own [`Sink`]
//! - **Orderly shutdown**: everything queued is delivered before
//!   [`Dispatcher::shutdown`] returns
//!
//! ```
//! use logxx::prelude::*;
//! use logxx::info;
//!
//! let sink = MemorySink::new();
//! let buffer = sink.buffer();
//! let dispatcher = Dispatcher::builder()
//!     .default_level(LevelFilter::Info)
//!     .sink(sink)
//!     .build();
//!
//! dispatcher.start()?;
//! info!("listening on port {}", 8080);
//! dispatcher.shutdown()?;
//!
//! assert_eq!(buffer.messages(), vec!["listening on port 8080"]);
//! # Ok::<(), logxx::LogxxError>(())
//! ```

pub mod config;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::config::{ConfigTree, Configuration, MatchKind, RuleNode};
    pub use crate::core::{
        CallSite, Dispatcher, DispatcherBuilder, DispatcherMetrics, HeaderFormat, LevelFilter,
        LevelResolver, Lifecycle, LogEntry, LogLevel, LogxxError, Result, Sink,
    };
    #[cfg(feature = "console")]
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "file")]
    pub use crate::sinks::FileSink;
    pub use crate::sinks::{MemoryBuffer, MemorySink};
}

pub use config::{BackendConfig, ConfigTree, Configuration, MatchClause, MatchKind, RuleNode};
pub use crate::core::{
    CallSite, Dispatcher, DispatcherBuilder, DispatcherMetrics, HeaderFormat, LevelFilter,
    LevelResolver, Lifecycle, LogEntry, LogLevel, LogxxError, Result, Sink,
    DEFAULT_HEADER_FORMAT, WORKER_THREAD_NAME,
};
#[cfg(feature = "console")]
pub use sinks::ConsoleSink;
#[cfg(feature = "file")]
pub use sinks::FileSink;
pub use sinks::{MemoryBuffer, MemorySink};
