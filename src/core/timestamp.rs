//! Timestamp and line formatting
//!
//! Every sink renders an entry as `<timestamp> <LEVEL>: <message>`. The
//! timestamp defaults to the short `08-Jan-25 10:30:45` form.

use super::log_entry::LogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// strftime pattern for [`TimestampFormat::Classic`]
pub const CLASSIC_TIMESTAMP: &str = "%d-%b-%y %H:%M:%S";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_queue_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let ts = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Classic.format(&ts), "08-Jan-25 10:30:45");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Day, abbreviated month, two-digit year, 24-hour time: `08-Jan-25 10:30:45`
    #[default]
    Classic,

    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Classic => datetime.format(CLASSIC_TIMESTAMP).to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Renders entries into display lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFormatter {
    timestamp_format: TimestampFormat,
}

impl LineFormatter {
    pub fn new(timestamp_format: TimestampFormat) -> Self {
        Self { timestamp_format }
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }

    /// Format an entry without a trailing newline
    #[must_use]
    pub fn format(&self, entry: &LogEntry) -> String {
        self.format_parts(&entry.timestamp, entry.level.to_str(), &entry.message)
    }

    /// Format from already rendered pieces, used when the level text is colored
    #[must_use]
    pub fn format_parts(&self, timestamp: &DateTime<Utc>, level: &str, message: &str) -> String {
        format!(
            "{} {}: {}",
            self.timestamp_format.format(timestamp),
            level,
            message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::milliseconds(123)
    }

    #[test]
    fn test_classic_format() {
        assert_eq!(
            TimestampFormat::Classic.format(&fixed_datetime()),
            "08-Jan-25 10:30:45"
        );
    }

    #[test]
    fn test_classic_is_24_hour() {
        let evening = Utc.with_ymd_and_hms(2024, 11, 30, 21, 5, 9).unwrap();
        assert_eq!(TimestampFormat::Classic.format(&evening), "30-Nov-24 21:05:09");
    }

    #[test]
    fn test_iso8601_format() {
        assert_eq!(
            TimestampFormat::Iso8601.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123Z"
        );
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_line_format() {
        let entry = LogEntry::new(LogLevel::Warning, "disk almost full")
            .with_timestamp(fixed_datetime());
        let line = LineFormatter::default().format(&entry);
        assert_eq!(line, "08-Jan-25 10:30:45 WARNING: disk almost full");
    }
}
