//! # Logger
//!
//! Centralized logging setup for the project: console output with
//! environment-based filtering, plus an optional rolling log file written
//! through a non-blocking worker.
//!
//! ## Example
//!
//! ```rust
//! use regkit_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder("my-app")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Configures and initializes the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    level: LevelFilter,
    env_filter: Option<String>,
    path: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl LoggerBuilder {
    /// Enables or disables console logging (on by default).
    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Sets the minimum log level to be emitted.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `regkit=debug,hyper=info`).
    ///
    /// `RUST_LOG` still overrides; this is a programmatic default. An
    /// invalid filter makes [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables the rolling log file under `path`.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Configures the log file rotation strategy.
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Configures the maximum number of log files to keep.
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Writes the log file as JSON lines instead of plain text.
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. The handle owns the non-blocking worker guard
    /// and must be kept alive for the duration of the program so file logs
    /// are flushed correctly.
    ///
    /// # Errors
    /// [`LoggerError::Subscriber`] if a global subscriber is already set,
    /// [`LoggerError::InvalidConfiguration`] for bad builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
            });
        }
        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
            });
        }

        let env_filter = self.build_env_filter()?;
        let mut layers = Vec::new();

        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = if let Some(path) = self.path {
            fs::create_dir_all(&path)?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.rotation)
                .filename_prefix(&self.name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.max_files)
                .build(path)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = layer().with_writer(non_blocking).with_ansi(false);
            layers.push(if self.json { file_layer.json().boxed() } else { file_layer.boxed() });
            Some(guard)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        self.env_filter.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |filter| {
                builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{filter}': {e}").into(),
                })
            },
        )
    }
}

/// A handle to the initialized logging system.
///
/// Holds the background worker guard; drop it only when the application is
/// shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// The `name` identifies the application in logs and prefixes rolling
    /// log files (e.g., `my-app.2026-08-24.log`).
    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            console: true,
            level: LevelFilter::INFO,
            env_filter: None,
            path: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }

    /// Best-effort synchronization point before shutdown; flushing also
    /// happens when the handle is dropped.
    pub fn flush(&self) {
        tracing::debug!("Logger flushed");
    }

    /// Returns the underlying worker guard, if file logging is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
