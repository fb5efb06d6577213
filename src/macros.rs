//! Logging macros
//!
//! Each macro captures the call site (file, line, module, function and a
//! compile-time call-site hash), formats the message like `format!`, and
//! posts the entry to the active dispatcher. When no dispatcher is active
//! the message is not even formatted.
//!
//! # Examples
//!
//! ```
//! use logxx::{info, warn, log_template};
//! use logxx::LogLevel;
//!
//! let port = 8080;
//! info!("Server listening on port {}", port);
//!
//! // Attach a class name that `class` rules can match on
//! warn!(class: "Connection", "Retry attempt {} of {}", 3, 5);
//!
//! // Runtime templates with tolerant substitution
//! log_template!(LogLevel::Debug, "%1% took %2% ms", "query", 12);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// use logxx::{log, LogLevel};
/// log!(LogLevel::Info, "Simple message");
/// log!(LogLevel::Error, "Error code: {}", 500);
/// log!(class: "Parser", LogLevel::Debug, "token {:?}", "ident");
/// ```
#[macro_export]
macro_rules! log {
    (class: $class:expr, $level:expr, $($arg:tt)+) => {
        if $crate::Dispatcher::is_active() {
            $crate::Dispatcher::post(
                $crate::LogEntry::new($level, ::std::format!($($arg)+))
                    .with_call_site($crate::call_site!().with_class($class)),
            );
        }
    };
    ($level:expr, $($arg:tt)+) => {
        if $crate::Dispatcher::is_active() {
            $crate::Dispatcher::post(
                $crate::LogEntry::new($level, ::std::format!($($arg)+))
                    .with_call_site($crate::call_site!()),
            );
        }
    };
}

/// Log a message rendered from a runtime template.
///
/// Placeholders follow [`core::template::render`](crate::core::template::render):
/// `%N%` positional, `%s`-style sequential, `%%` literal. Missing arguments
/// render empty and extra ones are ignored.
#[macro_export]
macro_rules! log_template {
    ($level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        if $crate::Dispatcher::is_active() {
            $crate::Dispatcher::post(
                $crate::LogEntry::new(
                    $level,
                    $crate::core::template::render(
                        $template,
                        &[$(&$arg as &dyn ::std::fmt::Display),*],
                    ),
                )
                .with_call_site($crate::call_site!()),
            );
        }
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    (class: $class:expr, $($arg:tt)+) => {
        $crate::log!(class: $class, $crate::LogLevel::Trace, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    (class: $class:expr, $($arg:tt)+) => {
        $crate::log!(class: $class, $crate::LogLevel::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    (class: $class:expr, $($arg:tt)+) => {
        $crate::log!(class: $class, $crate::LogLevel::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    (class: $class:expr, $($arg:tt)+) => {
        $crate::log!(class: $class, $crate::LogLevel::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    (class: $class:expr, $($arg:tt)+) => {
        $crate::log!(class: $class, $crate::LogLevel::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    (class: $class:expr, $($arg:tt)+) => {
        $crate::log!(class: $class, $crate::LogLevel::Fatal, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::log!($crate::LogLevel::Fatal, $($arg)+)
    };
}
