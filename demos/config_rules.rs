//! Rule-based filtering example
//!
//! Demonstrates per-module and per-function thresholds loaded from a JSON
//! configuration document.
//!
//! Run with: cargo run --example config_rules

use logxx::prelude::*;

const CONFIG: &str = r#"{
    "level": "WARNING",
    "header": "%3% [%4%] %7%:%10%",
    "backends": { "console": { "colors": "true" } },
    "module": [
        { "name": "net", "level": "DEBUG",
          "function": { "name": "handshake", "level": "TRACE" } },
        { "name": "disk", "level": "ERROR" }
    ],
    "class": { "name": "Socket", "level": "ALL" }
}"#;

fn post(level: LogLevel, module: &str, function: &str, message: &str) {
    Dispatcher::post(
        LogEntry::new(level, message)
            .with_module(module)
            .with_function(function),
    );
}

fn main() -> Result<()> {
    println!("=== logxx - Config Rules Example ===\n");

    let config = Configuration::from_json_str(CONFIG)?;
    let dispatcher = Dispatcher::builder()
        .default_level(LevelFilter::Info)
        .configuration(config)?
        .build();
    dispatcher.start()?;

    println!("1. Module 'net' logs from DEBUG, its handshake from TRACE:");
    post(LogLevel::Trace, "net", "handshake", "handshake bytes exchanged");
    post(LogLevel::Trace, "net", "send", "send detail (hidden)");
    post(LogLevel::Debug, "net", "send", "send queued");

    println!("\n2. Module 'disk' only logs errors:");
    post(LogLevel::Warn, "disk", "flush", "disk nearly full (hidden)");
    post(LogLevel::Error, "disk", "flush", "flush failed");

    println!("\n3. Everything else uses the root WARNING threshold:");
    post(LogLevel::Info, "gpu", "init", "gpu ready (hidden)");
    post(LogLevel::Warn, "gpu", "init", "gpu running hot");

    println!("\n4. Class rules need the entry to carry a class:");
    Dispatcher::post(LogEntry::new(LogLevel::Trace, "socket opened").with_class("Socket"));

    dispatcher.shutdown()?;
    println!(
        "\n   delivered={} filtered={} ({:.1}% filtered)",
        dispatcher.metrics().delivered(),
        dispatcher.metrics().filtered(),
        dispatcher.metrics().filter_rate()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
