//! Core logger types and traits

pub mod appender;
pub mod error;
pub mod handle;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use appender::Appender;
pub use error::{LoggerError, Result};
pub use handle::{LoggerHandle, PREFIX_SEPARATOR};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, ROOT_LOGGER_NAME};
pub use metrics::LoggerMetrics;
pub use timestamp::{LineFormatter, TimestampFormat, CLASSIC_TIMESTAMP};
