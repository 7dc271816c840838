//! Error types for the logger system
//!
//! Emission never returns these: a failing sink is reported on stderr and
//! counted in the driver metrics. Errors surface only from construction and
//! from the [`Sink`](super::Sink) contract itself.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
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

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The async worker thread could not be started
    #[error("Failed to spawn async worker '{name}': {message}")]
    WorkerSpawn { name: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn worker_spawn(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::WorkerSpawn {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::config("AsyncDriver", "capacity must be non-zero");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::worker_spawn("log-async-worker", "resource exhausted");
        assert!(matches!(err, LoggerError::WorkerSpawn { .. }));

        let err = LoggerError::writer("stdout closed");
        assert!(matches!(err, LoggerError::WriterError(_)));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::config("AsyncDriver", "capacity must be non-zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration for AsyncDriver: capacity must be non-zero"
        );

        let err = LoggerError::worker_spawn("log-async-worker", "out of threads");
        assert_eq!(
            err.to_string(),
            "Failed to spawn async worker 'log-async-worker': out of threads"
        );
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = LoggerError::io_operation("writing to stdout", "console sink failed", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("writing to stdout"));
        assert!(err.to_string().contains("console sink failed"));
    }
}
