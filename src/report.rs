//! Failure event reporting.
//!
//! Failures that concern the surrounding environment (unreadable source
//! files, destination directories that cannot be created, gzip streams that
//! do not start with a gzip header) are handed to an [`ErrorSink`] before
//! they propagate to the caller. The sink is injected per call, so the
//! extraction logic never touches a process-global logger and runs unchanged
//! without a logging backend.

use anyhow::Error;

/// Sink for structured failure events emitted during dispatch and extraction.
pub trait ErrorSink {
    /// Record a failure. `message` names the operation and the path it
    /// concerned; `error` is the underlying cause.
    fn error(&self, message: &str, error: &Error);
}

/// Sink that forwards events to the [`log`] facade.
pub struct LogSink;

impl ErrorSink for LogSink {
    fn error(&self, message: &str, error: &Error) {
        log::error!("{message}: {error:#}");
    }
}

/// Sink that discards every event.
///
/// For callers that want extraction without any logging, and for tests.
pub struct NullSink;

impl ErrorSink for NullSink {
    fn error(&self, _message: &str, _error: &Error) {}
}
