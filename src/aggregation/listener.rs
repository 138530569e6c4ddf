//! Background listener draining the aggregation queue
//!
//! The listener owns the consumer side of an [`AggregationQueue`] and runs
//! on its own thread. Each wake it drains everything available and hands
//! every entry, in arrival order, to a target [`Logger`], which re-applies
//! its own level and appender thresholds. A shutdown request, either the
//! typed [`QueueMessage::Shutdown`] or the in-band INFO record carrying
//! [`LISTENER_KILL_MESSAGE`], ends the loop and is never forwarded.

use super::queue::{AggregationQueue, QueueMessage, QueueReceiver};
use super::shutdown::{request_shutdown, LISTENER_KILL_MESSAGE};
use crate::core::logger::panic_message;
use crate::core::{LogEntry, LogLevel, Logger, LoggerError, LoggerMetrics, Result};
use std::backtrace::Backtrace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default time the listener waits for new messages before polling again
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// How long dropping a running listener waits for it to stop
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const LISTENER_THREAD_NAME: &str = "log-listener";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    poll_interval: Duration,
}

impl ListenerConfig {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(LoggerError::config(
                "ListenerConfig",
                "poll interval must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// The in-band stop record: INFO level carrying [`LISTENER_KILL_MESSAGE`]
fn is_stop_record(entry: &LogEntry) -> bool {
    entry.level == LogLevel::Info && entry.message == LISTENER_KILL_MESSAGE
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerState {
    Running,
    Stopped,
}

/// Final accounting returned by [`LogListener::join`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerReport {
    /// Entries handed to the target logger without error
    pub forwarded: u64,
    /// Entries whose dispatch failed or panicked
    pub failed: u64,
    /// Entries left on the queue behind the stop signal
    pub discarded: u64,
    /// False when the loop ended because every producer handle was dropped
    pub shutdown_requested: bool,
}

#[derive(Debug, Default)]
struct ListenerShared {
    stopped: AtomicBool,
    metrics: LoggerMetrics,
}

/// Handle to a running listener thread
///
/// # Example
///
/// ```
/// use rust_queue_logger::prelude::*;
/// use std::sync::Arc;
///
/// let buffer = SharedBuffer::new();
/// let target = Arc::new(
///     Logger::builder("main")
///         .appender(ConsoleAppender::with_writer(buffer.clone()))
///         .build(),
/// );
///
/// let listener = LogListener::start(target).unwrap();
/// let queue = listener.queue();
/// queue.push(LogEntry::new(LogLevel::Info, "from a worker")).unwrap();
///
/// let report = listener.stop().unwrap();
/// assert_eq!(report.forwarded, 1);
/// assert!(buffer.contents().contains("INFO: from a worker"));
/// ```
pub struct LogListener {
    queue: AggregationQueue,
    shared: Arc<ListenerShared>,
    handle: Option<thread::JoinHandle<ListenerReport>>,
}

impl LogListener {
    /// Create a queue and start draining it into `target`
    pub fn start(target: Arc<Logger>) -> Result<Self> {
        Self::start_with_config(target, ListenerConfig::default())
    }

    pub fn start_with_config(target: Arc<Logger>, config: ListenerConfig) -> Result<Self> {
        config.validate()?;

        let (queue, receiver) = AggregationQueue::unbounded();
        let shared = Arc::new(ListenerShared::default());
        let shared_clone = Arc::clone(&shared);

        let handle = thread::Builder::new()
            .name(LISTENER_THREAD_NAME.to_string())
            .spawn(move || run(receiver, &target, &config, &shared_clone))
            .map_err(|e| LoggerError::io_operation("spawning listener", "thread spawn failed", e))?;

        Ok(Self {
            queue,
            shared,
            handle: Some(handle),
        })
    }

    /// Producer handle for this listener's queue
    pub fn queue(&self) -> AggregationQueue {
        self.queue.clone()
    }

    pub fn state(&self) -> ListenerState {
        if self.shared.stopped.load(Ordering::Acquire) {
            ListenerState::Stopped
        } else {
            ListenerState::Running
        }
    }

    /// Live forwarded/failed counters
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Wait for the loop to end on its own
    ///
    /// Blocks until some producer requests shutdown.
    pub fn join(mut self) -> Result<ListenerReport> {
        self.join_inner()
    }

    /// Request shutdown from this thread and wait for the loop to end
    pub fn stop(mut self) -> Result<ListenerReport> {
        if self.state() == ListenerState::Running {
            // Fails only if the loop closed the queue in the meantime
            let _ = request_shutdown(&self.queue);
        }
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<ListenerReport> {
        let handle = self.handle.take().ok_or(LoggerError::ListenerStopped)?;
        handle.join().map_err(|panic_info| {
            LoggerError::other(format!(
                "listener thread panicked: {}",
                panic_message(panic_info.as_ref())
            ))
        })
    }
}

impl Drop for LogListener {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if self.state() == ListenerState::Running {
            let _ = request_shutdown(&self.queue);
        }

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Listener thread panicked during shutdown: {:?}", e);
                }
                break;
            }

            if start.elapsed() >= DEFAULT_SHUTDOWN_TIMEOUT {
                eprintln!(
                    "[LOGGER WARNING] Listener did not stop within {:?}. \
                     Queued records may be lost.",
                    DEFAULT_SHUTDOWN_TIMEOUT
                );
                break;
            }

            thread::sleep(Duration::from_millis(10));
        }
    }
}

fn run(
    receiver: QueueReceiver,
    target: &Logger,
    config: &ListenerConfig,
    shared: &ListenerShared,
) -> ListenerReport {
    let mut report = ListenerReport::default();

    'outer: loop {
        let first = match receiver.pop_timeout(config.poll_interval) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(_) => break,
        };

        let mut batch = vec![first];
        batch.extend(receiver.try_pop_all());

        let mut pending = batch.into_iter();
        while let Some(message) = pending.next() {
            let entry = match message {
                QueueMessage::Shutdown => None,
                QueueMessage::Data(entry) if is_stop_record(&entry) => None,
                QueueMessage::Data(entry) => Some(entry),
            };

            match entry {
                Some(entry) => dispatch(target, &entry, &mut report, shared),
                None => {
                    report.shutdown_requested = true;
                    report.discarded = count_records(pending.by_ref());
                    break 'outer;
                }
            }
        }
    }

    // Sends that passed the open check before close() are discarded too
    receiver.close();
    report.discarded += count_records(receiver.try_pop_all().into_iter());
    drop(receiver);

    if report.discarded > 0 {
        eprintln!(
            "[LOGGER WARNING] Listener discarded {} records queued after shutdown",
            report.discarded
        );
    }
    shared.stopped.store(true, Ordering::Release);
    report
}

fn count_records(messages: impl Iterator<Item = QueueMessage>) -> u64 {
    messages
        .filter(|message| matches!(message, QueueMessage::Data(_)))
        .count() as u64
}

fn dispatch(target: &Logger, entry: &LogEntry, report: &mut ListenerReport, shared: &ListenerShared) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| target.handle(entry)));

    let failure = match result {
        Ok(Ok(())) => {
            report.forwarded += 1;
            shared.metrics.record_logged();
            return;
        }
        Ok(Err(e)) => e.to_string(),
        Err(panic_info) => format!("panic: {}", panic_message(panic_info.as_ref())),
    };

    report.failed += 1;
    shared.metrics.record_dropped();
    eprintln!(
        "[LOGGER ERROR] Listener failed to dispatch {} record from {}: {}\n{}",
        entry.level,
        entry.source_name.as_deref().unwrap_or("<unknown>"),
        failure,
        Backtrace::force_capture()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::shutdown::request_shutdown_record;
    use crate::appenders::{ConsoleAppender, SharedBuffer};

    fn capturing_target() -> (Arc<Logger>, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = Logger::builder("target")
            .appender(ConsoleAppender::with_writer(buffer.clone()))
            .build();
        (Arc::new(logger), buffer)
    }

    #[test]
    fn test_shutdown_is_not_forwarded() {
        let (target, buffer) = capturing_target();
        let listener = LogListener::start(target).expect("start listener");
        let queue = listener.queue();

        queue.push(LogEntry::new(LogLevel::Warning, "before")).expect("push");
        request_shutdown(&queue).expect("request shutdown");

        let report = listener.join().expect("join listener");
        assert_eq!(report.forwarded, 1);
        assert!(report.shutdown_requested);
        assert_eq!(buffer.lines().len(), 1);
        assert!(!queue.is_open());
    }

    #[test]
    fn test_stop_record_stops_default_listener() {
        let (target, buffer) = capturing_target();
        let listener = LogListener::start(target).expect("start listener");
        let queue = listener.queue();

        queue.push(LogEntry::new(LogLevel::Info, "before")).expect("push");
        request_shutdown_record(&queue).expect("send stop record");

        let report = listener.join().expect("join listener");
        assert_eq!(report.forwarded, 1);
        assert!(report.shutdown_requested);
        assert!(!buffer.contents().contains(LISTENER_KILL_MESSAGE));
    }

    #[test]
    fn test_records_left_behind_stop_are_counted() {
        let (target, buffer) = capturing_target();
        let (queue, receiver) = AggregationQueue::unbounded();
        let shared = ListenerShared::default();

        queue.push(LogEntry::new(LogLevel::Info, "kept")).expect("push");
        request_shutdown(&queue).expect("request shutdown");
        queue.push(LogEntry::new(LogLevel::Info, "late 1")).expect("push");
        request_shutdown(&queue).expect("second request");
        queue.push(LogEntry::new(LogLevel::Info, "late 2")).expect("push");

        let report = run(receiver, &target, &ListenerConfig::default(), &shared);
        assert_eq!(report.forwarded, 1);
        assert_eq!(report.discarded, 2);
        assert!(!buffer.contents().contains("late"));
        assert!(!queue.is_open());
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let (target, _) = capturing_target();
        let result = LogListener::start_with_config(
            target,
            ListenerConfig::new().poll_interval(Duration::ZERO),
        );
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_drop_stops_running_listener() {
        let (target, _) = capturing_target();
        let listener = LogListener::start(target).expect("start listener");
        let queue = listener.queue();
        drop(listener);
        assert!(!queue.is_open());
    }
}
