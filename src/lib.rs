//! # Rust Queue Logger
//!
//! Leveled logging for a single process, plus a shared queue that lets many
//! producers funnel their records into one listener so console and file
//! output stay coherent.
//!
//! ## Features
//!
//! - **Leveled Sinks**: Console, file and queue sinks, each with its own threshold
//! - **Aggregation**: One background listener drains a queue fed by threads or child processes
//! - **Explicit Shutdown**: A typed stop message travels behind queued records
//! - **Prefixed Handles**: Tag every message from a producer with a fixed prefix
//!
//! ## Example
//!
//! ```
//! use rust_queue_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = LoggerRegistry::new();
//! let buffer = SharedBuffer::new();
//! let main = registry
//!     .configure(LoggerConfig::new("main").console(ConsoleTarget::Capture(buffer.clone())))
//!     .unwrap();
//!
//! let listener = LogListener::start(Arc::clone(main.logger())).unwrap();
//! let queue = listener.queue();
//!
//! let worker = std::thread::spawn(move || {
//!     let producer = Logger::builder("worker")
//!         .appender(QueueAppender::new(queue).unwrap())
//!         .build();
//!     LoggerHandle::new(Arc::new(producer)).with_prefix("Worker 0").warning("disk low");
//! });
//! worker.join().unwrap();
//!
//! request_shutdown(&listener.queue()).unwrap();
//! listener.join().unwrap();
//! assert!(buffer.contents().contains("WARNING: Worker 0 disk low"));
//! ```

pub mod aggregation;
pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;
pub mod registry;

pub mod prelude {
    pub use crate::aggregation::{
        is_producer_process, request_shutdown, AggregationQueue, ListenerConfig, ListenerReport,
        ListenerState, LogListener, ProducerProcess,
    };
    pub use crate::appenders::{
        ConsoleAppender, ConsoleTarget, FileAppender, FileMode, QueueAppender, SharedBuffer,
    };
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        Appender, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerHandle,
        LoggerMetrics, Result, TimestampFormat,
    };
    pub use crate::registry::{configure, LoggerRegistry};
}

pub use aggregation::{
    is_producer_process, request_shutdown, request_shutdown_record, AggregationQueue,
    ListenerConfig, ListenerReport, ListenerState, LogListener, ProducerProcess, QueueMessage,
    LISTENER_KILL_MESSAGE,
};
pub use appenders::{ConsoleAppender, ConsoleTarget, FileAppender, FileMode, QueueAppender, SharedBuffer};
pub use config::LoggerConfig;
pub use core::{
    Appender, LineFormatter, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerHandle,
    LoggerMetrics, Result, TimestampFormat,
};
pub use registry::{configure, LoggerRegistry};
