//! File logging example
//!
//! Demonstrates logging to both console and file sinks simultaneously.
//!
//! Run with: cargo run --example file_logging

use logxx::prelude::*;
use logxx::{debug, error, info, warn};

fn main() -> Result<()> {
    println!("=== logxx - File Logging Example ===\n");

    let dispatcher = Dispatcher::builder()
        .default_level(LevelFilter::Debug)
        .sink(ConsoleSink::new())
        .sink(FileSink::new("application.log")?.with_header(HeaderFormat::new("%1% %2% %3% %5%:%10%")))
        .build();
    dispatcher.start()?;

    println!("1. Logging to both console and file:");
    info!("Application started");
    debug!("Loading configuration...");
    info!("Configuration loaded successfully");
    warn!("Using default settings for some options");
    info!("Connecting to database...");
    info!("Database connection established");
    error!("Failed to load optional plugin");
    info!("Application initialization complete");

    dispatcher.shutdown()?;

    println!("\n2. Log file contents:");
    let content = std::fs::read_to_string("application.log")?;
    for line in content.lines() {
        println!("   {}", line);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
