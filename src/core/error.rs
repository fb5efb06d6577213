//! Error types for the logging core

use super::dispatcher::Lifecycle;

pub type Result<T> = std::result::Result<T, LogxxError>;

#[derive(Debug, thiserror::Error)]
pub enum LogxxError {
    /// Another dispatcher is already the active instance
    #[error("A log dispatcher is already running; only one active instance is allowed")]
    AlreadyRunning,

    /// Operation not valid in the dispatcher's current state
    #[error("Dispatcher cannot {operation} while {state}")]
    InvalidLifecycle {
        operation: &'static str,
        state: Lifecycle,
    },

    /// The worker thread could not be spawned
    #[error("Failed to spawn dispatch worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// The worker thread panicked before shutdown joined it
    #[error("Dispatch worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error in a configuration document
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// XML parsing error in a configuration document
    #[error("XML error: {0}")]
    XmlError(#[from] roxmltree::Error),

    /// File sink error with path
    #[error("File sink error for '{path}': {message}")]
    FileSinkError { path: String, message: String },

    /// Sink write error (generic)
    #[error("Sink error: {0}")]
    SinkError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LogxxError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LogxxError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LogxxError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn invalid_lifecycle(operation: &'static str, state: Lifecycle) -> Self {
        LogxxError::InvalidLifecycle { operation, state }
    }

    /// Create a file sink error
    pub fn file_sink(path: impl Into<String>, message: impl Into<String>) -> Self {
        LogxxError::FileSinkError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a sink error (generic)
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        LogxxError::SinkError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LogxxError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LogxxError::config("rules", "module rule without a name");
        assert!(matches!(err, LogxxError::InvalidConfiguration { .. }));

        let err = LogxxError::file_sink("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LogxxError::FileSinkError { .. }));

        let err = LogxxError::invalid_lifecycle("start", Lifecycle::Stopped);
        assert!(matches!(err, LogxxError::InvalidLifecycle { .. }));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            LogxxError::AlreadyRunning.to_string(),
            "A log dispatcher is already running; only one active instance is allowed"
        );

        let err = LogxxError::config("level", "unknown level 'LOUD'");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for level: unknown level 'LOUD'"
        );

        let err = LogxxError::invalid_lifecycle("start", Lifecycle::Stopped);
        assert_eq!(err.to_string(), "Dispatcher cannot start while stopped");

        let err = LogxxError::from(roxmltree::Document::parse("<logging>").unwrap_err());
        assert!(err.to_string().starts_with("XML error: "));
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LogxxError::io_operation("reading configuration", "logxx.json", io_err);

        assert!(matches!(err, LogxxError::IoOperation { .. }));
        assert!(err.to_string().contains("reading configuration"));
        assert!(err.to_string().contains("logxx.json"));
    }
}
