//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes the logger or handle explicitly, followed by
//! `format!`-style arguments.
//!
//! # Examples
//!
//! ```
//! use rust_queue_logger::prelude::*;
//! use rust_queue_logger::info;
//!
//! let logger = Logger::new("app");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_queue_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_queue_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_queue_logger::prelude::*;
/// # let logger = Logger::new("app");
/// use rust_queue_logger::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::{ConsoleAppender, SharedBuffer};
    use crate::core::{LogLevel, Logger, LoggerHandle};
    use std::sync::Arc;

    fn capture() -> (LoggerHandle, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder("macros")
            .appender(ConsoleAppender::with_writer(buffer.clone()))
            .build();
        (LoggerHandle::new(Arc::new(logger)), buffer)
    }

    #[test]
    fn test_level_macros() {
        let (handle, buffer) = capture();

        debug!(handle, "Count: {}", 5);
        info!(handle, "Items: {}", 100);
        warning!(handle, "Retry {} of {}", 1, 3);
        error!(handle, "Code: {}", 500);
        critical!(handle, "Failure: {}", "system");

        let lines = buffer.lines();
        assert!(lines[0].ends_with("DEBUG: Count: 5"));
        assert!(lines[1].ends_with("INFO: Items: 100"));
        assert!(lines[2].ends_with("WARNING: Retry 1 of 3"));
        assert!(lines[3].ends_with("ERROR: Code: 500"));
        assert!(lines[4].ends_with("CRITICAL: Failure: system"));
    }

    #[test]
    fn test_log_macro_on_logger() {
        let logger = Logger::new("plain");
        log!(logger, LogLevel::Info, "Formatted: {}", 42);
        assert_eq!(logger.metrics().total_logged(), 1);
    }
}
