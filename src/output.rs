//! Status and error reporting
//!
//! The database reports user-facing messages through an injected
//! [`StatusHandler`] rather than a process-wide dialog singleton, so the
//! host application can route them to its output pane and tests can
//! substitute a capturing sink.

use parking_lot::Mutex;

/// Sink for user-facing status and error messages
pub trait StatusHandler: Send + Sync {
    /// Report routine progress
    fn status(&self, msg: &str);

    /// Report a failure the user should see
    fn error(&self, msg: &str);
}

/// Handler that forwards messages to the `log` facade
#[derive(Debug, Default)]
pub struct LogHandler;

impl StatusHandler for LogHandler {
    fn status(&self, msg: &str) {
        log::info!("{}", msg);
    }

    fn error(&self, msg: &str) {
        log::error!("{}", msg);
    }
}

/// Handler that records every message for later assertion
#[derive(Debug, Default)]
pub struct CapturingHandler {
    status: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl CapturingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status messages received so far
    pub fn status_messages(&self) -> Vec<String> {
        self.status.lock().clone()
    }

    /// Error messages received so far
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

impl StatusHandler for CapturingHandler {
    fn status(&self, msg: &str) {
        self.status.lock().push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        self.errors.lock().push(msg.to_string());
    }
}
