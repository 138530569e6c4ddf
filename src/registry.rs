//! Process-wide mapping from logger name to configured logger

use crate::config::LoggerConfig;
use crate::core::{Logger, LoggerHandle, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<LoggerRegistry> = OnceLock::new();

/// Named loggers, configured at most once each
///
/// Configuring a name that already exists returns a handle to the existing
/// logger and opens no new sinks, so repeated configuration never causes
/// duplicate delivery. The returned handle still takes the prefix from the
/// new configuration, since prefixes belong to handles and not to loggers.
#[derive(Debug, Default)]
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by the whole process
    pub fn global() -> &'static LoggerRegistry {
        GLOBAL_REGISTRY.get_or_init(LoggerRegistry::new)
    }

    pub fn configure(&self, config: LoggerConfig) -> Result<LoggerHandle> {
        let mut loggers = self.loggers.lock();

        let logger = match loggers.get(&config.name).cloned() {
            Some(existing) => existing,
            None => {
                let logger = Arc::new(config.build_logger()?);
                loggers.insert(config.name.clone(), Arc::clone(&logger));
                logger
            }
        };

        let handle = LoggerHandle::new(logger);
        Ok(match config.prefix {
            Some(prefix) => handle.with_prefix(prefix),
            None => handle,
        })
    }

    pub fn get(&self, name: &str) -> Option<LoggerHandle> {
        self.loggers.lock().get(name).cloned().map(LoggerHandle::new)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.lock().contains_key(name)
    }

    /// Forget a logger so its name can be configured afresh
    pub fn remove(&self, name: &str) -> Option<Arc<Logger>> {
        self.loggers.lock().remove(name)
    }

    pub fn len(&self) -> usize {
        self.loggers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.lock().is_empty()
    }
}

/// Configure a logger in the process-wide registry
pub fn configure(config: LoggerConfig) -> Result<LoggerHandle> {
    LoggerRegistry::global().configure(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::{ConsoleTarget, SharedBuffer};

    #[test]
    fn test_reconfigure_reuses_logger() {
        let registry = LoggerRegistry::new();
        let buffer = SharedBuffer::new();

        let first = registry
            .configure(LoggerConfig::new("dup").console(ConsoleTarget::Capture(buffer.clone())))
            .expect("first configure");
        let second = registry
            .configure(LoggerConfig::new("dup").console(ConsoleTarget::Capture(buffer.clone())))
            .expect("second configure");

        assert!(Arc::ptr_eq(first.logger(), second.logger()));
        assert_eq!(second.logger().appender_count(), 1);

        second.info("once");
        assert_eq!(buffer.lines().len(), 1);
    }

    #[test]
    fn test_remove_allows_fresh_configuration() {
        let registry = LoggerRegistry::new();
        registry.configure(LoggerConfig::new("temp")).expect("configure");
        assert!(registry.contains("temp"));

        assert!(registry.remove("temp").is_some());
        assert!(registry.get("temp").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_configuration_registers_nothing() {
        let registry = LoggerRegistry::new();
        let dir = tempfile::TempDir::new().expect("temp dir");

        let result = registry.configure(LoggerConfig::new("broken").file(dir.path()));
        assert!(result.is_err());
        assert!(!registry.contains("broken"));
    }
}
