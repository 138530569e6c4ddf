//! Integration tests for logger configuration
//!
//! These tests verify:
//! - Console threshold filtering
//! - File sink filtering independent of the console
//! - Append and truncate file modes
//! - Prefixed handles
//! - Re-configuration of an existing logger name
//! - Configuration-time errors

use rust_queue_logger::appenders::{ConsoleTarget, FileMode, SharedBuffer};
use rust_queue_logger::config::LoggerConfig;
use rust_queue_logger::core::{LogLevel, LoggerError, LoggerHandle};
use rust_queue_logger::registry::LoggerRegistry;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn emit_all(handle: &LoggerHandle) {
    handle.debug("Debug message");
    handle.info("Info message");
    handle.warning("Warning message");
    handle.error("Error message");
    handle.critical("Critical message");
}

fn captured(registry: &LoggerRegistry, config: LoggerConfig) -> (LoggerHandle, SharedBuffer) {
    let buffer = SharedBuffer::new();
    let handle = registry
        .configure(config.console(ConsoleTarget::Capture(buffer.clone())))
        .expect("Failed to configure logger");
    (handle, buffer)
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_console_threshold_for_every_level() {
    let registry = LoggerRegistry::new();

    for (idx, threshold) in LogLevel::ALL.iter().enumerate() {
        let (handle, buffer) = captured(
            &registry,
            LoggerConfig::new(format!("threshold-{}", threshold)).level(*threshold),
        );
        emit_all(&handle);

        let lines = buffer.lines();
        assert_eq!(lines.len(), LogLevel::ALL.len() - idx, "threshold {}", threshold);
        for (line, level) in lines.iter().zip(&LogLevel::ALL[idx..]) {
            assert!(
                line.contains(&format!(" {}: ", level)),
                "line {:?} should be at {}",
                line,
                level
            );
        }
    }
}

#[test]
fn test_line_format() {
    let registry = LoggerRegistry::new();
    let (handle, buffer) = captured(&registry, LoggerConfig::new("format"));

    handle.warning("disk almost full");

    let line = buffer.lines().pop().expect("one line");
    // "08-Jan-25 10:30:45 WARNING: disk almost full"
    let (timestamp, rest) = line.split_at(18);
    assert_eq!(rest, " WARNING: disk almost full");
    assert_eq!(timestamp.as_bytes()[2], b'-');
    assert_eq!(timestamp.as_bytes()[6], b'-');
    assert_eq!(timestamp.as_bytes()[9], b' ');
    assert_eq!(timestamp.matches(':').count(), 2);
}

#[test]
fn test_file_filters_independently_of_console() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("independent.log");
    let registry = LoggerRegistry::new();

    let (handle, buffer) = captured(
        &registry,
        LoggerConfig::new("independent")
            .level(LogLevel::Debug)
            .file(&log_file)
            .file_level(LogLevel::Warning),
    );
    emit_all(&handle);

    let console = buffer.contents();
    assert!(console.contains("DEBUG: Debug message"));

    let file_lines = read_lines(&log_file);
    assert_eq!(file_lines.len(), 3);
    assert!(!file_lines.iter().any(|l| l.contains("Debug message")));
    assert!(!file_lines.iter().any(|l| l.contains("Info message")));
    assert!(file_lines[0].ends_with("WARNING: Warning message"));
}

#[test]
fn test_file_more_verbose_than_console() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("verbose_file.log");
    let registry = LoggerRegistry::new();

    let (handle, buffer) = captured(
        &registry,
        LoggerConfig::new("verbose-file")
            .level(LogLevel::Error)
            .file(&log_file)
            .file_level(LogLevel::Debug),
    );
    emit_all(&handle);

    assert_eq!(buffer.lines().len(), 2);
    assert_eq!(read_lines(&log_file).len(), 5);
}

#[test]
fn test_file_modes() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("modes.log");
    fs::write(&log_file, "existing line\n").expect("seed log file");

    let registry = LoggerRegistry::new();
    let (appending, _) = captured(
        &registry,
        LoggerConfig::new("append").file(&log_file).file_mode(FileMode::Append),
    );
    appending.error("appended");
    assert_eq!(read_lines(&log_file).len(), 2);

    let (truncating, _) = captured(
        &registry,
        LoggerConfig::new("truncate").file(&log_file).file_mode(FileMode::Truncate),
    );
    truncating.error("fresh");

    let lines = read_lines(&log_file);
    assert!(!lines.iter().any(|l| l == "existing line"));
    assert!(lines.iter().any(|l| l.ends_with("ERROR: fresh")));
}

#[test]
fn test_prefix_on_every_emission() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("prefix.log");
    let registry = LoggerRegistry::new();

    let (handle, buffer) = captured(
        &registry,
        LoggerConfig::new("prefixed")
            .prefix("PREPEND")
            .file(&log_file)
            .file_level(LogLevel::Debug),
    );
    emit_all(&handle);

    let console = buffer.lines();
    assert_eq!(console.len(), 5);
    for line in console.iter().chain(read_lines(&log_file).iter()) {
        let message = line.split_once(": ").map(|(_, m)| m).unwrap_or_default();
        assert!(message.starts_with("PREPEND "), "unprefixed line: {}", line);
    }
}

/// Configuring the same name twice returns the first logger unchanged, so
/// every emission is delivered exactly once.
#[test]
fn test_reconfiguration_delivers_once() {
    let registry = LoggerRegistry::new();
    let buffer = SharedBuffer::new();
    let config = || LoggerConfig::new("twice").console(ConsoleTarget::Capture(buffer.clone()));

    registry.configure(config()).expect("first configure");
    let handle = registry.configure(config()).expect("second configure");

    handle.info("only once");
    assert_eq!(buffer.lines().len(), 1);
    assert_eq!(handle.logger().appender_count(), 1);
}

#[test]
fn test_reconfiguration_can_change_prefix() {
    let registry = LoggerRegistry::new();
    let (plain, buffer) = captured(&registry, LoggerConfig::new("reprefix"));
    let prefixed = registry
        .configure(LoggerConfig::new("reprefix").prefix("P"))
        .expect("second configure");

    plain.info("a");
    prefixed.info("b");

    let lines = buffer.lines();
    assert!(lines[0].ends_with("INFO: a"));
    assert!(lines[1].ends_with("INFO: P b"));
}

#[test]
fn test_invalid_file_path_aborts_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = LoggerRegistry::new();

    let err = registry
        .configure(LoggerConfig::new("bad-file").file(temp_dir.path().join("missing/dir/x.log")))
        .expect_err("missing parent directory");

    assert!(matches!(err, LoggerError::FileAppenderError { .. }));
    assert!(err.is_configuration_error());
    assert!(!registry.contains("bad-file"));
}

#[test]
fn test_message_text_is_delivered_unchanged() {
    let registry = LoggerRegistry::new();
    let (handle, buffer) = captured(&registry, LoggerConfig::new("verbatim").prefix("P"));

    handle.info("a\tb");
    handle.warning("first\nsecond");

    let contents = buffer.contents();
    assert!(contents.contains("INFO: P a\tb\n"));
    assert!(contents.contains("WARNING: P first\nsecond\n"));
}

#[test]
fn test_json_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("json.log");
    let json = format!(
        r#"{{ "name": "from-json", "level": "INFO", "file": {:?}, "file_level": "ERROR", "prefix": "J" }}"#,
        log_file.to_str().expect("utf-8 temp path")
    );

    let config = LoggerConfig::from_json(&json).expect("valid json config");
    let (handle, buffer) = captured(&LoggerRegistry::new(), config);
    emit_all(&handle);

    assert_eq!(buffer.lines().len(), 4);
    let file_lines = read_lines(&log_file);
    assert_eq!(file_lines.len(), 2);
    assert!(file_lines[0].ends_with("ERROR: J Error message"));
}

#[test]
fn test_global_configure() {
    let buffer = SharedBuffer::new();
    let handle = rust_queue_logger::configure(
        LoggerConfig::new("integration-global").console(ConsoleTarget::Capture(buffer.clone())),
    )
    .expect("configure global");

    handle.critical("global");
    assert!(LoggerRegistry::global().contains("integration-global"));
    assert_eq!(buffer.lines().len(), 1);
}
