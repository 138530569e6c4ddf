//! Producers running in child processes
//!
//! A child process logs through [`AggregationQueue::stdout`], which writes
//! every queue message to its stdout as one JSON line. The parent spawns the
//! child through [`ProducerProcess`]; a relay thread reads those lines and
//! pushes each message onto the listener's queue, so records from any
//! number of processes end up in one ordered stream. Stdout lines that do
//! not decode as queue messages are skipped, so children can still print.

use super::queue::{AggregationQueue, QueueMessage};
use crate::core::logger::panic_message;
use crate::core::{LoggerError, Result};
use std::env;
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

/// Set on every child started by [`ProducerProcess::spawn`]
pub const PRODUCER_ENV: &str = "RUST_QUEUE_LOGGER_PRODUCER";

const RELAY_THREAD_NAME: &str = "log-relay";

/// Whether this process was started as a producer by [`ProducerProcess`]
pub fn is_producer_process() -> bool {
    env::var_os(PRODUCER_ENV).is_some()
}

/// Line counts for one relayed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Messages decoded and pushed onto the queue
    pub relayed: u64,
    /// Non-empty lines that were not queue messages
    pub skipped: u64,
}

/// Copy every queue message on `reader` onto `queue` until end of stream
///
/// Stops early with [`LoggerError::QueueUnavailable`] once the queue's
/// listener has stopped; the writer then sees a closed pipe.
pub fn relay(reader: impl BufRead, queue: &AggregationQueue) -> Result<RelayReport> {
    let mut report = RelayReport::default();

    for line in reader.lines() {
        let line = line.map_err(|e| {
            LoggerError::io_operation("relaying producer output", "read failed", e)
        })?;
        if line.trim().is_empty() {
            continue;
        }

        match QueueMessage::from_line(&line) {
            Ok(message) => {
                queue.send(message)?;
                report.relayed += 1;
            }
            Err(_) => report.skipped += 1,
        }
    }

    Ok(report)
}

/// How a producer process ended
#[derive(Debug, Clone, Copy)]
pub struct ProducerExit {
    pub status: ExitStatus,
    pub relay: RelayReport,
}

/// A child process whose stdout feeds an aggregation queue
///
/// # Example
///
/// ```no_run
/// use rust_queue_logger::prelude::*;
/// use rust_queue_logger::aggregation::ProducerProcess;
/// use std::process::Command;
/// use std::sync::Arc;
///
/// let listener = LogListener::start(Arc::new(Logger::new("main"))).unwrap();
/// let child = ProducerProcess::spawn(Command::new("worker-binary"), &listener.queue()).unwrap();
///
/// let exit = child.wait().unwrap();
/// println!("{} records relayed", exit.relay.relayed);
/// listener.stop().unwrap();
/// ```
#[derive(Debug)]
pub struct ProducerProcess {
    child: Child,
    relay: Option<thread::JoinHandle<Result<RelayReport>>>,
}

impl ProducerProcess {
    /// Start `command` with a piped stdout relayed onto `queue`
    ///
    /// The child gets [`PRODUCER_ENV`] set so it can tell it should log
    /// through [`AggregationQueue::stdout`].
    pub fn spawn(mut command: Command, queue: &AggregationQueue) -> Result<Self> {
        if !queue.is_open() {
            return Err(LoggerError::queue_unavailable(
                "cannot relay onto a queue whose listener has stopped",
            ));
        }

        command.env(PRODUCER_ENV, "1").stdout(Stdio::piped());
        let mut child = command.spawn().map_err(|e| {
            LoggerError::io_operation("spawning producer", "process spawn failed", e)
        })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(LoggerError::other("producer stdout was not captured"));
        };

        match spawn_relay(stdout, queue.clone()) {
            Ok(relay) => Ok(Self {
                child,
                relay: Some(relay),
            }),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(e)
            }
        }
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Wait for the child to exit and for its output to be fully relayed
    pub fn wait(mut self) -> Result<ProducerExit> {
        let status = self.child.wait().map_err(|e| {
            LoggerError::io_operation("waiting for producer", "wait failed", e)
        })?;
        let relay = self.join_relay()?;
        Ok(ProducerExit { status, relay })
    }

    fn join_relay(&mut self) -> Result<RelayReport> {
        let handle = self
            .relay
            .take()
            .ok_or_else(|| LoggerError::other("producer relay already joined"))?;
        handle.join().map_err(|panic_info| {
            LoggerError::other(format!(
                "relay thread panicked: {}",
                panic_message(panic_info.as_ref())
            ))
        })?
    }
}

impl Drop for ProducerProcess {
    fn drop(&mut self) {
        if self.relay.is_none() {
            return;
        }

        // Not waited for: kill the child so its pipe closes and the relay ends
        let _ = self.child.kill();
        let _ = self.child.wait();
        if let Err(e) = self.join_relay() {
            eprintln!("[LOGGER ERROR] Producer relay failed: {}", e);
        }
    }
}

fn spawn_relay(
    stdout: impl Read + Send + 'static,
    queue: AggregationQueue,
) -> Result<thread::JoinHandle<Result<RelayReport>>> {
    thread::Builder::new()
        .name(RELAY_THREAD_NAME.to_string())
        .spawn(move || relay(BufReader::new(stdout), &queue))
        .map_err(|e| LoggerError::io_operation("spawning relay", "thread spawn failed", e))
}
