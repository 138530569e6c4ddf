//! Console appender implementation

use crate::core::{Appender, LineFormatter, LogEntry, LogLevel, Result, TimestampFormat};
use colored::Colorize;
use parking_lot::Mutex;
use serde::Deserialize;
use std::io::Write;
use std::sync::Arc;

/// In-memory capture target, mostly useful for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(String::from).collect()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Where console output goes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
    /// No console output; used by producers that only forward to a queue
    Disabled,
    #[serde(skip)]
    Capture(SharedBuffer),
}

pub struct ConsoleAppender {
    threshold: LogLevel,
    use_colors: bool,
    formatter: LineFormatter,
    target: ConsoleTarget,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            threshold: LogLevel::Debug,
            use_colors: false,
            formatter: LineFormatter::default(),
            target: ConsoleTarget::Stderr,
        }
    }

    /// Console appender writing into an in-memory buffer
    pub fn with_writer(buffer: SharedBuffer) -> Self {
        Self::new().with_target(ConsoleTarget::Capture(buffer))
    }

    #[must_use]
    pub fn with_target(mut self, target: ConsoleTarget) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_queue_logger::appenders::ConsoleAppender;
    /// use rust_queue_logger::TimestampFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter = LineFormatter::new(format);
        self
    }

    fn format_text(&self, entry: &LogEntry) -> String {
        if self.use_colors {
            let level = entry
                .level
                .to_str()
                .color(entry.level.color_code())
                .to_string();
            self.formatter
                .format_parts(&entry.timestamp, &level, &entry.message)
        } else {
            self.formatter.format(entry)
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_text(entry);

        match &mut self.target {
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", output)?,
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", output)?,
            ConsoleTarget::Disabled => {}
            ConsoleTarget::Capture(buffer) => writeln!(buffer, "{}", output)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match &mut self.target {
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Disabled | ConsoleTarget::Capture(_) => {}
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }

    fn threshold(&self) -> LogLevel {
        self.threshold
    }
}
