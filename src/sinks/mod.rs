//! Sink implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

#[cfg(feature = "console")]
pub use console::ConsoleSink;
#[cfg(feature = "file")]
pub use file::FileSink;
pub use memory::{MemoryBuffer, MemorySink};

pub use crate::core::Sink;
