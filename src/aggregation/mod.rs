//! Funnelling records from many producers into one listener
//!
//! A parent starts a [`LogListener`] around its target logger and hands the
//! returned [`AggregationQueue`] to each producer. Producer threads get a
//! clone of the queue; producer processes are started with
//! [`ProducerProcess`] and log through [`AggregationQueue::stdout`].
//! Producers configure a queue sink, emit as usual, and when they are done
//! the parent calls [`request_shutdown`] and joins the listener.

pub mod listener;
pub mod process;
pub mod queue;
pub mod shutdown;

pub use listener::{
    ListenerConfig, ListenerReport, ListenerState, LogListener, DEFAULT_POLL_INTERVAL,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use process::{
    is_producer_process, relay, ProducerExit, ProducerProcess, RelayReport, PRODUCER_ENV,
};
pub use queue::{AggregationQueue, QueueMessage, QueueReceiver};
pub use shutdown::{request_shutdown, request_shutdown_record, LISTENER_KILL_MESSAGE};
