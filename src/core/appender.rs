//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Lowest level this appender accepts
    fn threshold(&self) -> LogLevel {
        LogLevel::Debug
    }

    fn accepts(&self, level: LogLevel) -> bool {
        level >= self.threshold()
    }
}
