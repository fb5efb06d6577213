//! Basic dispatcher usage example
//!
//! Demonstrates starting a dispatcher with a console sink, logging at every
//! level through the macros, and shutting down cleanly.
//!
//! Run with: cargo run --example basic_usage

use logxx::prelude::*;
use logxx::{debug, error, fatal, info, log_template, trace, warn};

fn main() -> Result<()> {
    println!("=== logxx - Basic Usage Example ===\n");

    let dispatcher = Dispatcher::builder()
        .default_level(LevelFilter::All)
        .sink(ConsoleSink::new())
        .build();
    dispatcher.start()?;

    println!("1. Logging at different levels (written to stderr):");
    trace!("This is a trace message");
    debug!("This is a debug message");
    info!("This is an info message");
    warn!("This is a warning message");
    error!("This is an error message");
    fatal!("This is a fatal message");

    println!("\n2. Class names and runtime templates:");
    info!(class: "Session", "Session {} opened", 42);
    log_template!(LogLevel::Info, "%1% took %2% ms", "query", 12);

    println!("\n3. Nothing is lost on shutdown:");
    for i in 0..5 {
        info!("Queued message {}", i);
    }
    dispatcher.shutdown()?;

    let metrics = dispatcher.metrics();
    println!(
        "   posted={} delivered={} filtered={}",
        metrics.posted(),
        metrics.delivered(),
        metrics.filtered()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
