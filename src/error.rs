//! Error types for the taskwatch pipeline.

/// Top-level error type for the task-watching daemon.
#[derive(Debug, thiserror::Error)]
pub enum TaskwatchError {
    /// Tasks service request or response error.
    #[error("api error: {0}")]
    Api(String),

    /// Credential resolution error.
    #[error("credential error: {0}")]
    Credential(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Notification sink error.
    #[error("notify error: {0}")]
    Notify(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TaskwatchError>;
