//! The preview-then-click interaction primitive.
//!
//! Every corrective action goes through here: highlight the target, wait,
//! click, and clear the highlight later. The wait is the point — a human
//! watching the page sees what is about to be clicked before it happens, which
//! keeps the automation auditable.

use std::sync::Arc;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use pagepilot_dom::{Dom, NodeId};

use crate::config::PreviewConfig;

/// Handle to an in-flight preview-click. Cancelling prevents both the pending
/// click and the pending highlight-removal from firing.
pub struct CancelHandle {
    token: CancellationToken,
    armed: bool,
}

impl CancelHandle {
    /// A handle for a preview that never started (target absent or hidden).
    pub fn inert() -> Self {
        Self {
            token: CancellationToken::new(),
            armed: false,
        }
    }

    /// Whether a click is actually pending behind this handle.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Stop the pending click and pending highlight-removal. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Preview-click runner bound to one Dom and one timing config.
#[derive(Clone)]
pub struct Preview {
    dom: Arc<dyn Dom>,
    config: PreviewConfig,
}

impl Preview {
    pub fn new(dom: Arc<dyn Dom>, config: PreviewConfig) -> Self {
        Self { dom, config }
    }

    /// Highlight `target`, invoke `action` after the configured delay, and
    /// clear the highlight after the configured highlight window (measured
    /// from now, independent of the click timer).
    ///
    /// If `target` is absent or not visible this is a no-op returning an inert
    /// handle. `action` runs exactly once even if the target has been removed
    /// in the meantime; callers that care must re-check inside `action`.
    pub fn run<F>(&self, target: NodeId, action: F) -> CancelHandle
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.dom.is_attached(target) || !self.dom.is_visible(target) {
            return CancelHandle::inert();
        }

        debug!(target: "pagepilot", node = %target, "preview armed");
        self.dom.set_highlight(target, true);
        let token = CancellationToken::new();

        let click_token = token.clone();
        let delay = self.config.delay_before();
        tokio::spawn(async move {
            tokio::select! {
                _ = click_token.cancelled() => {}
                _ = sleep(delay) => action(),
            }
        });

        let clear_token = token.clone();
        let dom = Arc::clone(&self.dom);
        let highlight = self.config.highlight();
        tokio::spawn(async move {
            tokio::select! {
                _ = clear_token.cancelled() => {}
                _ = sleep(highlight) => {
                    if dom.is_attached(target) {
                        dom.set_highlight(target, false);
                    }
                }
            }
        });

        CancelHandle { token, armed: true }
    }
}

#[cfg(test)]
#[path = "preview_tests.rs"]
mod tests;
