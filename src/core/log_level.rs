//! Log level and level filter definitions
//!
//! `LogLevel` is the severity carried by an entry, ordered so that a greater
//! value is more severe. `LevelFilter` is a threshold: it adds the `All` and
//! `None` sentinels around the levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            "FATAL" | "CRIT" | "CRITICAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Minimum severity an entry needs to be emitted.
///
/// `All` admits every entry, `None` suppresses every entry, and a level
/// variant admits entries at least as severe as that level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum LevelFilter {
    All = 0,
    Trace = 1,
    Debug = 2,
    #[default]
    Info = 3,
    Warn = 4,
    Error = 5,
    Fatal = 6,
    None = 7,
}

impl LevelFilter {
    /// Whether an entry at `level` passes this threshold.
    #[inline]
    pub const fn admits(self, level: LogLevel) -> bool {
        level as u8 + 1 >= self as u8
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LevelFilter::All => "ALL",
            LevelFilter::None => "NONE",
            LevelFilter::Trace => "TRACE",
            LevelFilter::Debug => "DEBUG",
            LevelFilter::Info => "INFO",
            LevelFilter::Warn => "WARN",
            LevelFilter::Error => "ERROR",
            LevelFilter::Fatal => "FATAL",
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Fatal => LevelFilter::Fatal,
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_str())
    }
}

impl FromStr for LevelFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(LevelFilter::All),
            "NONE" | "OFF" => Ok(LevelFilter::None),
            _ => s
                .parse::<LogLevel>()
                .map(LevelFilter::from)
                .map_err(|_| format!("Invalid level filter: '{}'", s)),
        }
    }
}
