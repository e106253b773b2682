//! Error types for offscreen capture
//!
//! This module defines the error types used throughout the crate,
//! including GPU resource allocation, framebuffer setup, and
//! begin/end pairing misuse.

use std::fmt;
use crate::device::FramebufferStatus;

/// Result type for offscreen capture operations
pub type Result<T> = std::result::Result<T, Error>;

/// Offscreen capture errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (OpenGL, mock device, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (zero-sized target, unknown handle, etc.)
    InvalidResource(String),

    /// Initialization failed (device, logger, subsystems)
    InitializationFailed(String),

    /// Operation called in the wrong lifecycle state
    /// (begin while active, end without begin, texture already released)
    InvalidState(String),

    /// Framebuffer attachments did not form a complete framebuffer
    IncompleteFramebuffer(FramebufferStatus),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::IncompleteFramebuffer(status) => {
                write!(f, "Incomplete framebuffer: {:?}", status)
            }
        }
    }
}

impl std::error::Error for Error {}

/// Log an ERROR (with file:line) and return early with an error
///
/// Without a variant prefix the error is an `Error::BackendError` carrying
/// the formatted message. With a `Variant:` prefix the message is wrapped
/// in that string-carrying variant instead.
///
/// # Example
///
/// ```ignore
/// capture_bail!("offscreen::RenderTexture", "framebuffer {} missing", id);
/// capture_bail!(InvalidState: "offscreen::RenderTexture", "begin() called twice");
/// ```
#[macro_export]
macro_rules! capture_bail {
    ($variant:ident : $source:expr, $($arg:tt)+) => {{
        let message = format!($($arg)+);
        $crate::capture_error!($source, "{}", message);
        return Err($crate::capture::Error::$variant(message));
    }};
    ($source:expr, $($arg:tt)+) => {{
        let message = format!($($arg)+);
        $crate::capture_error!($source, "{}", message);
        return Err($crate::capture::Error::BackendError(message));
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
