//! Diagnostic sink.
//!
//! Verbose diagnostics are off by default and routed through a sink trait so
//! the embedder can redirect them (console, alert box). Sink calls are
//! best-effort: nothing a sink does may stop or slow a watcher tick.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

/// Destination for diagnostic messages.
pub trait DiagnosticSink: Send + Sync {
    /// Verbose-mode diagnostic.
    fn debug(&self, message: &str);

    /// Operator-facing notice (the blocking-alert channel). Still
    /// best-effort.
    fn alert(&self, message: &str);
}

/// Default sink: routes to `tracing`.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, message: &str) {
        debug!(target: "pagepilot", "{message}");
    }

    fn alert(&self, message: &str) {
        warn!(target: "pagepilot", "{message}");
    }
}

/// Diagnostic reporting with a runtime verbosity toggle.
pub struct Diagnostics {
    enabled: AtomicBool,
    sink: Box<dyn DiagnosticSink>,
}

impl Diagnostics {
    pub fn new(sink: Box<dyn DiagnosticSink>) -> Self {
        Self {
            enabled: AtomicBool::new(false),
            sink,
        }
    }

    /// Toggle verbose diagnostics. Confirms the change through the alert
    /// channel.
    pub fn set_debug(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        self.sink.alert(if enabled {
            "Debug diagnostics ENABLED"
        } else {
            "Debug diagnostics disabled"
        });
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Emit a verbose-mode diagnostic. No-op unless enabled.
    pub fn dbg(&self, message: &str) {
        if self.is_enabled() {
            self.sink.debug(message);
        }
    }

    /// Emit an operator-facing notice regardless of verbosity.
    pub fn alert(&self, message: &str) {
        self.sink.alert(message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Box::new(TracingSink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct RecordingSink(Arc<Mutex<Vec<String>>>);

    impl DiagnosticSink for RecordingSink {
        fn debug(&self, message: &str) {
            self.0.lock().push(format!("debug:{message}"));
        }

        fn alert(&self, message: &str) {
            self.0.lock().push(format!("alert:{message}"));
        }
    }

    #[test]
    fn dbg_is_gated_on_the_toggle() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let diag = Diagnostics::new(Box::new(RecordingSink(log.clone())));

        diag.dbg("hidden");
        assert!(log.lock().is_empty());

        diag.set_debug(true);
        diag.dbg("shown");
        let entries = log.lock().clone();
        assert_eq!(entries, vec!["alert:Debug diagnostics ENABLED", "debug:shown"]);
    }
}
