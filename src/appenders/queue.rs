//! Appender forwarding entries onto an aggregation queue

use crate::aggregation::AggregationQueue;
use crate::core::{Appender, LogEntry, LogLevel, LoggerError, Result};

/// Sends every accepted entry to a listener's queue
///
/// Producers configure one of these instead of writing output themselves;
/// the listener on the other end formats and writes on their behalf.
pub struct QueueAppender {
    queue: AggregationQueue,
    threshold: LogLevel,
}

impl QueueAppender {
    /// Fails with [`LoggerError::QueueUnavailable`] when the queue's listener
    /// is no longer draining it
    pub fn new(queue: AggregationQueue) -> Result<Self> {
        if !queue.is_open() {
            return Err(LoggerError::queue_unavailable(
                "cannot forward to a queue whose listener has stopped",
            ));
        }
        Ok(Self {
            queue,
            threshold: LogLevel::Debug,
        })
    }

    #[must_use]
    pub fn with_threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    pub fn queue(&self) -> &AggregationQueue {
        &self.queue
    }
}

impl Appender for QueueAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.queue.push(entry.clone())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "queue"
    }

    fn threshold(&self) -> LogLevel {
        self.threshold
    }
}
