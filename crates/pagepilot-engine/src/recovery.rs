//! Connection-recovery watchers.
//!
//! Two pieces share one exponential back-off tracker:
//!
//! - [`RecoveryWatcher`]: the "Connection failed" banner, handled by an
//!   explicit "Try again" button when one exists, falling back to the most
//!   recent icon-style action element otherwise.
//! - [`ResumeButtonWatcher`]: the alternate failure presentation that is just
//!   a single "resume" button. Own busy lock, same eligibility clock.
//!
//! The absence of both failure presentations on an eligible tick is itself
//! the signal that the connection recovered, and resets the back-off to its
//! floor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::info;

use pagepilot_dom::{Dom, NodeId, NodeKind};

use crate::backoff::Backoff;
use crate::config::PreviewConfig;
use crate::diag::Diagnostics;
use crate::notify::Notifier;
use crate::preview::Preview;
use crate::scope::ScopeResolver;
use crate::text::{
    matches_normalized, normalize, CONNECTION_FAILURE_PREFIX, RESUME_BUTTON_TEXT, TRY_AGAIN_TEXT,
};

/// Shared plumbing of the two recovery watchers.
struct RecoveryBase {
    dom: Arc<dyn Dom>,
    scope: Arc<ScopeResolver>,
    preview: Preview,
    notifier: Notifier,
    diag: Arc<Diagnostics>,
    backoff: Arc<Backoff>,
    settle: std::time::Duration,
    busy: Arc<AtomicBool>,
}

impl RecoveryBase {
    fn new(
        dom: Arc<dyn Dom>,
        scope: Arc<ScopeResolver>,
        notifier: Notifier,
        diag: Arc<Diagnostics>,
        backoff: Arc<Backoff>,
        preview_config: &PreviewConfig,
    ) -> Self {
        Self {
            preview: Preview::new(Arc::clone(&dom), preview_config.clone()),
            dom,
            scope,
            notifier,
            diag,
            backoff,
            settle: preview_config.settle(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set the busy lock and trigger a preview-click on `target`.
    ///
    /// The back-off advances and the notice shows only when the click is
    /// actually performed; a target that vanished during the preview delay is
    /// a silent no-op. The busy lock releases on its settle timer either way.
    fn trigger(&self, target: NodeId, description: &'static str) {
        self.busy.store(true, Ordering::SeqCst);
        self.diag
            .dbg(&format!("clicking \"{description}\" recovery control"));

        let busy = Arc::clone(&self.busy);
        let settle = self.settle;
        tokio::spawn(async move {
            sleep(settle).await;
            busy.store(false, Ordering::SeqCst);
        });

        let dom = Arc::clone(&self.dom);
        let notifier = self.notifier.clone();
        let backoff = Arc::clone(&self.backoff);
        self.preview.run(target, move || {
            if !dom.is_attached(target) || !dom.is_visible(target) {
                return;
            }
            dom.click(target);
            let delay = backoff.advance(Instant::now());
            info!(
                target: "pagepilot",
                next_secs = delay.as_secs(),
                "clicked {description} recovery control"
            );
            notifier.show(&format!(
                "Clicked \"{description}\" (next {}s)",
                delay.as_secs()
            ));
        });
    }

    /// First visible element whose normalized text is exactly "resume": the
    /// single-button failure presentation.
    fn resume_control(&self, scope: NodeId) -> Option<NodeId> {
        self.dom.descendants(scope).into_iter().find(|&n| {
            self.dom.is_visible(n) && normalize(&self.dom.text(n)) == RESUME_BUTTON_TEXT
        })
    }

    fn reset_busy(&self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Watcher for the "Connection failed" banner (explicit button + icon
/// fallback).
pub struct RecoveryWatcher {
    base: RecoveryBase,
}

impl RecoveryWatcher {
    pub fn new(
        dom: Arc<dyn Dom>,
        scope: Arc<ScopeResolver>,
        notifier: Notifier,
        diag: Arc<Diagnostics>,
        backoff: Arc<Backoff>,
        preview_config: &PreviewConfig,
    ) -> Self {
        Self {
            base: RecoveryBase::new(dom, scope, notifier, diag, backoff, preview_config),
        }
    }

    /// One polling tick.
    pub fn tick(&self) {
        let base = &self.base;
        if base.busy.load(Ordering::SeqCst) {
            return;
        }
        if !base.backoff.eligible(Instant::now()) {
            return;
        }
        let Some(scope) = base.scope.resolve() else {
            return;
        };

        let Some(anchor) = self.failure_anchor(scope) else {
            // No failure text, but a lone "resume" control is a failure
            // presentation too; only reset once both are gone.
            if base.resume_control(scope).is_none() {
                base.backoff.reset();
            }
            return;
        };

        if let Some(button) = self.explicit_button(scope, anchor) {
            base.trigger(button, "Try again");
        } else if let Some(icon) = self.icon_fallback(scope) {
            base.trigger(icon, "retry icon");
        } else {
            base.diag
                .dbg("connection failure present but no actionable element found");
        }
    }

    /// Deepest element whose trimmed text starts with the failure phrase, so
    /// the ancestor search starts from the most specific node.
    fn failure_anchor(&self, scope: NodeId) -> Option<NodeId> {
        let dom = &self.base.dom;
        dom.descendants(scope)
            .into_iter()
            .filter(|&n| dom.text(n).trim().starts_with(CONNECTION_FAILURE_PREFIX))
            .next_back()
    }

    /// Visible "try again" control under the anchor's nearest block-level
    /// ancestor.
    fn explicit_button(&self, scope: NodeId, anchor: NodeId) -> Option<NodeId> {
        let dom = &self.base.dom;
        let mut block = anchor;
        while let Some(parent) = dom.parent(block) {
            block = parent;
            if dom.kind(block).is_some_and(|k| k.is_block()) {
                break;
            }
            if block == scope {
                break;
            }
        }

        dom.descendants(block).into_iter().find(|&n| {
            dom.kind(n).is_some_and(|k| k.is_actionable())
                && dom.is_visible(n)
                && matches_normalized(&dom.text(n), TRY_AGAIN_TEXT)
        })
    }

    /// Last (most recent) visible icon-style action element in scope, never
    /// one inside the message-composition area.
    fn icon_fallback(&self, scope: NodeId) -> Option<NodeId> {
        let dom = &self.base.dom;
        dom.descendants(scope)
            .into_iter()
            .filter(|&n| {
                dom.kind(n) == Some(NodeKind::IconButton)
                    && dom.is_visible(n)
                    && !self.inside_composer(n)
            })
            .next_back()
    }

    fn inside_composer(&self, node: NodeId) -> bool {
        let dom = &self.base.dom;
        let mut cur = dom.parent(node);
        while let Some(id) = cur {
            if dom.kind(id) == Some(NodeKind::Composer) {
                return true;
            }
            cur = dom.parent(id);
        }
        false
    }

    /// Clear the busy lock.
    pub fn reset(&self) {
        self.base.reset_busy();
    }
}

/// Watcher for the single-button "resume" failure presentation.
pub struct ResumeButtonWatcher {
    base: RecoveryBase,
}

impl ResumeButtonWatcher {
    pub fn new(
        dom: Arc<dyn Dom>,
        scope: Arc<ScopeResolver>,
        notifier: Notifier,
        diag: Arc<Diagnostics>,
        backoff: Arc<Backoff>,
        preview_config: &PreviewConfig,
    ) -> Self {
        Self {
            base: RecoveryBase::new(dom, scope, notifier, diag, backoff, preview_config),
        }
    }

    /// One polling tick.
    pub fn tick(&self) {
        let base = &self.base;
        if base.busy.load(Ordering::SeqCst) {
            return;
        }
        if !base.backoff.eligible(Instant::now()) {
            return;
        }
        let Some(scope) = base.scope.resolve() else {
            return;
        };

        if let Some(button) = base.resume_control(scope) {
            base.trigger(button, "Resume");
        }
    }

    /// Clear the busy lock.
    pub fn reset(&self) {
        self.base.reset_busy();
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
