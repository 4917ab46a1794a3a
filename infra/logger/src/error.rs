use std::borrow::Cow;

/// Errors that can occur during logger initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Failure when configuring the rolling file appender (e.g., invalid path).
    #[error("Rolling file appender error: {0}")]
    Appender(#[from] tracing_appender::rolling::InitError),

    /// A global tracing subscriber was already initialized in this process.
    #[error("Tracing subscriber error: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),

    /// Failure while preparing the log directory.
    #[error("I/O error while preparing log path: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration supplied to the logger builder.
    #[error("Invalid logger configuration: {message}")]
    InvalidConfiguration { message: Cow<'static, str> },
}
