/// Offscreen capture engine - process-wide logging hub
///
/// GPU state (device, viewport context) is always passed explicitly to the
/// render texture. The only process-wide state is the active logger and its
/// severity filter, stored in thread-safe static storage.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger state (initialized with DefaultLogger, Debug filter)
static LOG_STATE: OnceLock<LogState> = OnceLock::new();

struct LogState {
    logger: RwLock<Box<dyn Logger>>,
    min_severity: RwLock<LogSeverity>,
}

impl LogState {
    fn new() -> Self {
        Self {
            logger: RwLock::new(Box::new(DefaultLogger)),
            min_severity: RwLock::new(LogSeverity::Debug),
        }
    }
}

fn log_state() -> &'static LogState {
    LOG_STATE.get_or_init(LogState::new)
}

// ===== PUBLIC API =====

/// Process-wide entry point for capture logging
///
/// # Example
///
/// ```no_run
/// use offscreen_capture::capture::{Engine, log::{Logger, LogEntry, LogSeverity}};
///
/// struct GameConsole;
/// impl Logger for GameConsole {
///     fn log(&self, entry: &LogEntry) {
///         // Forward to the host's console...
///     }
/// }
///
/// Engine::set_logger(GameConsole);
/// Engine::set_min_severity(LogSeverity::Info);
/// ```
pub struct Engine;

impl Engine {
    /// Replace the active logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = log_state().logger.write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to DefaultLogger and the filter to Debug
    pub fn reset_logger() {
        let state = log_state();
        if let Ok(mut lock) = state.logger.write() {
            *lock = Box::new(DefaultLogger);
        }
        if let Ok(mut lock) = state.min_severity.write() {
            *lock = LogSeverity::Debug;
        }
    }

    /// Drop every entry below `severity`
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut lock) = log_state().min_severity.write() {
            *lock = severity;
        }
    }

    /// Current severity filter
    pub fn min_severity() -> LogSeverity {
        log_state()
            .min_severity
            .read()
            .map(|lock| *lock)
            .unwrap_or(LogSeverity::Debug)
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like capture_info!, capture_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(severity, source, message, None, None);
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// Used by capture_error! and capture_bail! to include source location.
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(severity, source, message, Some(file), Some(line));
    }

    fn dispatch(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: Option<&'static str>,
        line: Option<u32>,
    ) {
        if severity < Self::min_severity() {
            return;
        }
        if let Ok(lock) = log_state().logger.read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file,
                line,
            });
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
