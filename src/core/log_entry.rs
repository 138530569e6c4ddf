//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// One leveled, timestamped log record.
///
/// Entries are immutable once built: every field is set at capture time on
/// the producing thread, and the listener only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Name of the logger that produced this entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub thread_id: String,
    pub thread_name: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: message.as_ref().to_string(),
            timestamp: Utc::now(),
            source_name: None,
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
        }
    }

    pub fn with_source(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_kept_verbatim() {
        let entry = LogEntry::new(LogLevel::Info, "a\nb\tc\r");
        assert_eq!(entry.message, "a\nb\tc\r");
    }

    #[test]
    fn test_source_and_thread() {
        let entry = LogEntry::new(LogLevel::Debug, "hello").with_source("worker-1");
        assert_eq!(entry.source_name.as_deref(), Some("worker-1"));
        assert!(!entry.thread_id.is_empty());
    }
}
