//! Main logger implementation

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::any::Any;
use std::sync::Arc;

/// Name used when no logger name is given
pub const ROOT_LOGGER_NAME: &str = "root";

/// A named logger dispatching entries to its appenders
///
/// Loggers are shared as `Arc<Logger>`: the registry, every handle, and a
/// listener loop may all hold the same instance. Appenders are isolated from
/// each other, so one failing or panicking appender never keeps an entry
/// from the rest.
pub struct Logger {
    name: String,
    min_level: RwLock<LogLevel>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LogLevel::Debug),
            appenders: RwLock::new(Vec::new()),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Build an entry tagged with this logger's name and dispatch it
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if !self.is_enabled(level) {
            return;
        }

        let entry = LogEntry::new(level, message).with_source(self.name.as_str());
        // Failures are already reported per appender and counted in metrics
        let _ = self.handle(&entry);
    }

    /// Dispatch an already built entry
    ///
    /// Re-applies this logger's level and every appender's own threshold.
    /// Returns [`LoggerError::Dispatch`] when at least one accepting
    /// appender failed or panicked; the others still received the entry.
    pub fn handle(&self, entry: &LogEntry) -> Result<()> {
        if !self.is_enabled(entry.level) {
            return Ok(());
        }

        let mut appenders = self.appenders.write();
        let total = appenders.len();
        let mut failed = 0;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            if !appender.accepts(entry.level) {
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)?;
                appender.flush()
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    failed += 1;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} ({}) panicked: {}. \
                         Other appenders continue to function.",
                        idx,
                        appender.name(),
                        panic_message(panic_info.as_ref())
                    );
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            self.metrics.record_dropped();
            Err(LoggerError::Dispatch { failed, total })
        } else {
            self.metrics.record_logged();
            Ok(())
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics.dropped_count()
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
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

    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(ROOT_LOGGER_NAME)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("min_level", &self.min_level())
            .field("appenders", &self.appender_count())
            .finish()
    }
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```
/// use rust_queue_logger::prelude::*;
///
/// let logger = Logger::builder("app")
///     .min_level(LogLevel::Info)
///     .appender(ConsoleAppender::new())
///     .build();
/// assert_eq!(logger.appender_count(), 1);
/// ```
pub struct LoggerBuilder {
    name: String,
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LogLevel::Debug,
            appenders: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn boxed_appender(mut self, appender: Box<dyn Appender>) -> Self {
        self.appenders.push(appender);
        self
    }

    pub fn build(self) -> Logger {
        let logger = Logger::new(self.name);
        logger.set_min_level(self.min_level);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}
