//! Singleton toast notifier.
//!
//! At most one toast is visible at any instant. Showing a new one removes the
//! previous toast immediately (no fade, no queue) and orphans its auto-dismiss
//! timer via a generation counter. Every Dom call here is best-effort; the
//! notifier must never take a watcher down with it.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::sleep;
use tracing::trace;

use pagepilot_dom::{Dom, NodeId, ToastSeverity};

use crate::config::ToastConfig;

#[derive(Default)]
struct LiveSlot {
    /// Bumped on every `show`; a dismiss timer only removes the toast it was
    /// spawned for.
    generation: u64,
    node: Option<NodeId>,
}

struct Inner {
    dom: Arc<dyn Dom>,
    config: ToastConfig,
    live: Mutex<LiveSlot>,
}

/// Handle to the one toast slot. Cheap to clone; all clones share the slot.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<Inner>,
}

impl Notifier {
    pub fn new(dom: Arc<dyn Dom>, config: ToastConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                dom,
                config,
                live: Mutex::new(LiveSlot::default()),
            }),
        }
    }

    /// Show a normal toast for the default duration.
    pub fn show(&self, message: &str) {
        self.show_with(message, self.inner.config.duration(), ToastSeverity::Normal);
    }

    /// Show a normal toast for an explicit duration.
    pub fn show_for(&self, message: &str, duration: std::time::Duration) {
        self.show_with(message, duration, ToastSeverity::Normal);
    }

    /// Show an error-severity toast. Held longer so a fatal condition is not
    /// missed.
    pub fn show_error(&self, message: &str) {
        self.show_with(
            message,
            self.inner.config.error_duration(),
            ToastSeverity::Error,
        );
    }

    fn show_with(&self, message: &str, duration: std::time::Duration, severity: ToastSeverity) {
        trace!(target: "pagepilot", %message, "toast");
        let generation;
        {
            let mut slot = self.inner.live.lock();
            if let Some(prev) = slot.node.take() {
                self.inner.dom.remove_node(prev);
            }
            slot.generation += 1;
            generation = slot.generation;
            slot.node = Some(self.inner.dom.mount_toast(message, severity));
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            sleep(duration).await;
            let mut slot = inner.live.lock();
            // A newer toast owns the slot now; leave it alone.
            if slot.generation == generation {
                if let Some(node) = slot.node.take() {
                    inner.dom.remove_node(node);
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
