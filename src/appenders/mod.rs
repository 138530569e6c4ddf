//! Appender implementations

pub mod console;
pub mod file;
pub mod queue;

pub use console::{ConsoleAppender, ConsoleTarget, SharedBuffer};
pub use file::{FileAppender, FileMode};
pub use queue::QueueAppender;

pub use crate::core::Appender;
