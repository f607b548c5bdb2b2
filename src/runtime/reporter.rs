//! Error reporting channel between kernels and their host

use parking_lot::Mutex;
use std::sync::Arc;

/// Sink for descriptive kernel failure messages
///
/// Kernels report through their [`Context`](super::Context); the graph owns
/// the reporter and decides where messages go.
pub trait ErrorReporter: Send {
    /// Record a failure message raised by operator `op`
    fn report(&mut self, op: &str, message: &str);
}

/// Forwards messages to `tracing` at error level
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&mut self, op: &str, message: &str) {
        tracing::error!(op, "{message}");
    }
}

/// Keeps every message in memory
///
/// Clones share the same message list, so a host can hand one clone to a
/// graph and read messages back through another.
#[derive(Clone, Debug, Default)]
pub struct CollectingReporter {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingReporter {
    /// Create an empty reporter
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the messages reported so far, formatted as `OP: message`
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Drop all collected messages
    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl ErrorReporter for CollectingReporter {
    fn report(&mut self, op: &str, message: &str) {
        self.messages.lock().push(format!("{op}: {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_messages() {
        let reader = CollectingReporter::new();
        let mut writer = reader.clone();
        writer.report("ABS", "bad input");
        assert_eq!(reader.messages(), vec!["ABS: bad input".to_string()]);

        reader.clear();
        assert!(writer.messages().is_empty());
    }

    #[test]
    fn test_tracing_reporter_does_not_panic() {
        TracingReporter.report("ABS", "no subscriber installed");
    }
}
