//! Logger configuration
//!
//! [`LoggerConfig`] describes one named logger: a console sink, an optional
//! file sink with its own threshold, an optional queue sink feeding a
//! listener, and an optional message prefix. It can be built fluently or
//! deserialized from JSON; the queue is attached in code since it is a live
//! handle.

use crate::aggregation::AggregationQueue;
use crate::appenders::{ConsoleAppender, ConsoleTarget, FileAppender, FileMode, QueueAppender};
use crate::core::{LogLevel, Logger, LoggerError, Result, TimestampFormat, ROOT_LOGGER_NAME};
use serde::Deserialize;
use std::path::PathBuf;

/// Threshold applied to the file sink when none is given
pub const DEFAULT_FILE_LEVEL: LogLevel = LogLevel::Warning;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerConfig {
    pub name: String,
    /// Console threshold, also used for the queue sink
    pub level: LogLevel,
    pub file: Option<PathBuf>,
    pub file_mode: FileMode,
    pub file_level: LogLevel,
    #[serde(skip)]
    pub queue: Option<AggregationQueue>,
    pub prefix: Option<String>,
    pub console: ConsoleTarget,
    pub colors: bool,
    pub timestamp_format: TimestampFormat,
}

impl LoggerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parse the serializable part of a configuration
    ///
    /// # Example
    ///
    /// ```
    /// use rust_queue_logger::{LoggerConfig, LogLevel};
    ///
    /// let config = LoggerConfig::from_json(
    ///     r#"{ "name": "app", "level": "INFO", "file_mode": "truncate" }"#,
    /// ).unwrap();
    /// assert_eq!(config.level, LogLevel::Info);
    /// assert_eq!(config.file_level, LogLevel::Warning);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoggerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_mode(mut self, mode: FileMode) -> Self {
        self.file_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_level(mut self, level: LogLevel) -> Self {
        self.file_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue(mut self, queue: AggregationQueue) -> Self {
        self.queue = Some(queue);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console(mut self, target: ConsoleTarget) -> Self {
        self.console = target;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "logger name is empty"));
        }
        if let Some(ref path) = self.file {
            if path.as_os_str().is_empty() {
                return Err(LoggerError::config("LoggerConfig", "log file path is empty"));
            }
        }
        Ok(())
    }

    /// Open every sink and assemble the logger
    ///
    /// The logger's own level is the lowest sink threshold so each sink
    /// filters independently.
    pub fn build_logger(&self) -> Result<Logger> {
        self.validate()?;

        let mut min_level = self.level;
        let mut builder = Logger::builder(self.name.clone());

        if !matches!(self.console, ConsoleTarget::Disabled) {
            builder = builder.appender(
                ConsoleAppender::new()
                    .with_target(self.console.clone())
                    .with_threshold(self.level)
                    .with_colors(self.colors)
                    .with_timestamp_format(self.timestamp_format.clone()),
            );
        }

        if let Some(ref path) = self.file {
            let appender = FileAppender::open(path, self.file_mode)?
                .with_threshold(self.file_level)
                .with_timestamp_format(self.timestamp_format.clone());
            builder = builder.appender(appender);
            min_level = min_level.min(self.file_level);
        }

        if let Some(ref queue) = self.queue {
            builder = builder.appender(QueueAppender::new(queue.clone())?.with_threshold(self.level));
        }

        Ok(builder.min_level(min_level).build())
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            name: ROOT_LOGGER_NAME.to_string(),
            level: LogLevel::Debug,
            file: None,
            file_mode: FileMode::Append,
            file_level: DEFAULT_FILE_LEVEL,
            queue: None,
            prefix: None,
            console: ConsoleTarget::Stderr,
            colors: false,
            timestamp_format: TimestampFormat::Classic,
        }
    }
}
