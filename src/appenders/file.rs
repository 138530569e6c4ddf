//! File appender implementation

use crate::core::{Appender, LineFormatter, LogEntry, LogLevel, LoggerError, Result, TimestampFormat};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How an existing log file is treated when the appender opens it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileMode {
    #[default]
    Append,
    Truncate,
}

impl FileMode {
    fn open_options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.create(true);
        match self {
            FileMode::Append => options.append(true),
            FileMode::Truncate => options.write(true).truncate(true),
        };
        options
    }
}

pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    threshold: LogLevel,
    formatter: LineFormatter,
}

impl FileAppender {
    /// Open `path` for appending
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(path, FileMode::Append)
    }

    pub fn open(path: impl Into<PathBuf>, mode: FileMode) -> Result<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(LoggerError::config("FileAppender", "log file path is empty"));
        }
        if path.is_dir() {
            return Err(LoggerError::file_appender(
                path.display().to_string(),
                "path is a directory",
            ));
        }

        let file = mode
            .open_options()
            .open(&path)
            .map_err(|e| LoggerError::file_appender(path.display().to_string(), e.to_string()))?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            threshold: LogLevel::Debug,
            formatter: LineFormatter::default(),
        })
    }

    #[must_use]
    pub fn with_threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rust_queue_logger::appenders::FileAppender;
    /// use rust_queue_logger::TimestampFormat;
    ///
    /// let appender = FileAppender::new("/var/log/app.log")
    ///     .unwrap()
    ///     .with_timestamp_format(TimestampFormat::Rfc3339);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.formatter = LineFormatter::new(format);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::writer("File writer not initialized"))?;

        let mut output = self.formatter.format(entry);
        output.push('\n');

        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn threshold(&self) -> LogLevel {
        self.threshold
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
