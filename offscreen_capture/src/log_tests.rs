//! Unit tests for log.rs
//!
//! Tests LogSeverity, LogEntry, format_entry, and DefaultLogger.

use crate::log::{format_entry, DefaultLogger, LogEntry, LogSeverity, Logger};
use std::time::SystemTime;

fn entry(severity: LogSeverity, message: &str) -> LogEntry {
    LogEntry {
        severity,
        timestamp: SystemTime::now(),
        source: "offscreen::RenderTexture".to_string(),
        message: message.to_string(),
        file: None,
        line: None,
    }
}

// ============================================================================
// LOG SEVERITY TESTS
// ============================================================================

#[test]
fn test_log_severity_ordering() {
    assert!(LogSeverity::Trace < LogSeverity::Debug);
    assert!(LogSeverity::Debug < LogSeverity::Info);
    assert!(LogSeverity::Info < LogSeverity::Warn);
    assert!(LogSeverity::Warn < LogSeverity::Error);
}

#[test]
fn test_log_severity_labels_are_fixed_width() {
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        assert_eq!(severity.label().len(), 5);
    }
    assert_eq!(LogSeverity::Error.label(), "ERROR");
}

// ============================================================================
// FORMAT TESTS
// ============================================================================

#[test]
fn test_format_entry_without_location() {
    let line = format_entry(&entry(LogSeverity::Debug, "created framebuffer 3"));
    assert!(line.contains("[DEBUG]"));
    assert!(line.contains("[offscreen::RenderTexture]"));
    assert!(line.ends_with("created framebuffer 3"));
}

#[test]
fn test_format_entry_with_location() {
    let mut e = entry(LogSeverity::Error, "begin() called while active");
    e.file = Some("render_texture.rs");
    e.line = Some(42);

    let line = format_entry(&e);
    assert!(line.contains("[ERROR]"));
    assert!(line.ends_with("begin() called while active (render_texture.rs:42)"));
}

#[test]
fn test_format_entry_ignores_partial_location() {
    let mut e = entry(LogSeverity::Warn, "no line");
    e.file = Some("render_texture.rs");

    let line = format_entry(&e);
    assert!(line.ends_with("no line"));
}

// ============================================================================
// DEFAULT LOGGER TESTS
// ============================================================================

#[test]
fn test_default_logger_all_severities() {
    let logger = DefaultLogger;
    for severity in [
        LogSeverity::Trace,
        LogSeverity::Debug,
        LogSeverity::Info,
        LogSeverity::Warn,
        LogSeverity::Error,
    ] {
        let mut e = entry(severity, "message");
        logger.log(&e);
        e.file = Some("test.rs");
        e.line = Some(7);
        logger.log(&e);
    }
}

#[test]
fn test_logger_trait_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DefaultLogger>();
}
