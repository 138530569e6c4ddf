//! Shared record queue between producers and the listener
//!
//! Inside one process the queue is an unbounded channel. A producer running
//! in a child process instead holds a stream-backed handle from
//! [`AggregationQueue::stdout`] that writes every message as one line of
//! JSON; the parent relays those lines onto its channel (see
//! [`ProducerProcess`](super::ProducerProcess)).

use crate::core::{LogEntry, LoggerError, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// What travels on the aggregation queue
///
/// Control and data share one channel so a shutdown request is ordered
/// after everything its sender enqueued before it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueueMessage {
    Data(LogEntry),
    Shutdown,
}

impl QueueMessage {
    /// One line of the stream encoding, newline included
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line.trim_end())?)
    }
}

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
enum Transport {
    Channel(Sender<QueueMessage>),
    Stream(SharedWriter),
}

/// Producer side of the aggregation queue
///
/// Unbounded, so [`push`](Self::push) never blocks. Clone it freely and hand
/// one copy to every producer thread.
#[derive(Clone)]
pub struct AggregationQueue {
    transport: Transport,
    open: Arc<AtomicBool>,
}

/// Consumer side, owned by exactly one listener
#[derive(Debug)]
pub struct QueueReceiver {
    receiver: Receiver<QueueMessage>,
    open: Arc<AtomicBool>,
}

impl AggregationQueue {
    pub fn unbounded() -> (AggregationQueue, QueueReceiver) {
        let (sender, receiver) = unbounded();
        let open = Arc::new(AtomicBool::new(true));
        (
            AggregationQueue {
                transport: Transport::Channel(sender),
                open: Arc::clone(&open),
            },
            QueueReceiver { receiver, open },
        )
    }

    /// Queue handle that encodes messages onto `writer`, one JSON line each
    ///
    /// The handle closes itself on the first write error, which is how a
    /// child notices its parent stopped relaying.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            transport: Transport::Stream(Arc::new(Mutex::new(Box::new(writer)))),
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Queue handle for a producer process spawned by [`ProducerProcess`](super::ProducerProcess)
    pub fn stdout() -> Self {
        Self::from_writer(std::io::stdout())
    }

    /// Whether a consumer is still draining this queue
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn push(&self, entry: LogEntry) -> Result<()> {
        self.send(QueueMessage::Data(entry))
    }

    pub(crate) fn send(&self, message: QueueMessage) -> Result<()> {
        if !self.is_open() {
            return Err(LoggerError::queue_unavailable("listener has stopped"));
        }
        match &self.transport {
            Transport::Channel(sender) => sender
                .send(message)
                .map_err(|_| LoggerError::queue_unavailable("receiver dropped")),
            Transport::Stream(writer) => {
                let line = message.to_line()?;
                let mut writer = writer.lock();
                writer
                    .write_all(&line)
                    .and_then(|()| writer.flush())
                    .map_err(|e| {
                        self.open.store(false, Ordering::Release);
                        LoggerError::queue_unavailable(format!("relay stream closed: {}", e))
                    })
            }
        }
    }

    /// Number of messages waiting to be drained
    ///
    /// Always zero for a stream-backed handle, which buffers nothing.
    pub fn len(&self) -> usize {
        match &self.transport {
            Transport::Channel(sender) => sender.len(),
            Transport::Stream(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn same_queue(&self, other: &AggregationQueue) -> bool {
        match (&self.transport, &other.transport) {
            (Transport::Channel(a), Transport::Channel(b)) => a.same_channel(b),
            (Transport::Stream(a), Transport::Stream(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for AggregationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let transport = match self.transport {
            Transport::Channel(_) => "channel",
            Transport::Stream(_) => "stream",
        };
        f.debug_struct("AggregationQueue")
            .field("transport", &transport)
            .field("open", &self.is_open())
            .field("len", &self.len())
            .finish()
    }
}

impl QueueReceiver {
    /// Everything currently available, in arrival order, without blocking
    pub fn try_pop_all(&self) -> Vec<QueueMessage> {
        self.receiver.try_iter().collect()
    }

    /// Wait up to `timeout` for the next message
    ///
    /// `Ok(None)` on timeout; `Err` once every producer handle is gone and
    /// the queue is drained.
    pub fn pop_timeout(&self, timeout: Duration) -> Result<Option<QueueMessage>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(LoggerError::ListenerStopped),
        }
    }

    /// Mark the queue closed so new producers fail fast
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }
}

impl Drop for QueueReceiver {
    fn drop(&mut self) {
        self.close();
    }
}
