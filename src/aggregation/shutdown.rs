//! Listener shutdown requests

use super::queue::{AggregationQueue, QueueMessage};
use crate::appenders::QueueAppender;
use crate::core::{LogEntry, LogLevel, Logger, Result};

/// Message text of the in-band stop record
pub const LISTENER_KILL_MESSAGE: &str = "$____KILL_SERVER____$";

const KILLER_LOGGER_NAME: &str = "__listener_killer__";

/// Ask the listener draining `queue` to stop.
///
/// The request is ordered after everything the calling thread enqueued
/// before it. Entries pushed concurrently by other producers may land on
/// either side of it, so join producers first when none may be lost. This
/// returns as soon as the request is queued; join the listener to wait for
/// it to actually stop.
pub fn request_shutdown(queue: &AggregationQueue) -> Result<()> {
    queue.send(QueueMessage::Shutdown)
}

/// Stop a listener using the in-band INFO record carrying
/// [`LISTENER_KILL_MESSAGE`].
///
/// Every listener treats this record as a stop signal and never forwards
/// it, so an INFO message with exactly this text cannot be logged through
/// a queue. Same ordering guarantees as [`request_shutdown`].
pub fn request_shutdown_record(queue: &AggregationQueue) -> Result<()> {
    let killer = Logger::builder(KILLER_LOGGER_NAME)
        .appender(QueueAppender::new(queue.clone())?)
        .build();
    let entry = LogEntry::new(LogLevel::Info, LISTENER_KILL_MESSAGE).with_source(KILLER_LOGGER_NAME);
    killer.handle(&entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shutdown_enqueues_control_message() {
        let (queue, receiver) = AggregationQueue::unbounded();
        request_shutdown(&queue).expect("queue open");
        assert_eq!(receiver.try_pop_all(), vec![QueueMessage::Shutdown]);
    }

    #[test]
    fn test_shutdown_record_enqueues_token_record() {
        let (queue, receiver) = AggregationQueue::unbounded();
        request_shutdown_record(&queue).expect("queue open");

        let drained = receiver.try_pop_all();
        assert_eq!(drained.len(), 1);
        match &drained[0] {
            QueueMessage::Data(entry) => {
                assert_eq!(entry.level, LogLevel::Info);
                assert_eq!(entry.message, LISTENER_KILL_MESSAGE);
            }
            QueueMessage::Shutdown => panic!("expected an in-band record"),
        }
    }

    #[test]
    fn test_shutdown_on_closed_queue_fails() {
        let (queue, receiver) = AggregationQueue::unbounded();
        drop(receiver);
        assert!(request_shutdown(&queue).is_err());
        assert!(request_shutdown_record(&queue).is_err());
    }
}
