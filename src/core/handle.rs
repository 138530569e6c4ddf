//! Explicit logging handle returned by configuration

use super::{log_level::LogLevel, logger::Logger};
use std::sync::Arc;

/// Separator placed between a handle's prefix and the message
pub const PREFIX_SEPARATOR: &str = " ";

/// Cheap, cloneable handle to a configured [`Logger`]
///
/// A handle optionally carries a prefix that is prepended to every message
/// it emits, at every level, before any sink sees it. Handles are passed to
/// call sites explicitly; there is no process-wide default logger.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    logger: Arc<Logger>,
    prefix: Option<String>,
}

impl LoggerHandle {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self {
            logger,
            prefix: None,
        }
    }

    /// Wrap this handle so every message starts with `prefix`
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn name(&self) -> &str {
        self.logger.name()
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.logger.is_enabled(level)
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if !self.logger.is_enabled(level) {
            return;
        }
        match &self.prefix {
            Some(prefix) => self.logger.log(
                level,
                format!("{}{}{}", prefix, PREFIX_SEPARATOR, message.as_ref()),
            ),
            None => self.logger.log(level, message),
        }
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Critical, message);
    }
}

impl From<Arc<Logger>> for LoggerHandle {
    fn from(logger: Arc<Logger>) -> Self {
        Self::new(logger)
    }
}
