//! Resume-banner watcher.
//!
//! When the host hits its tool-call ceiling it renders a banner with a
//! "resume the conversation" link. This watcher finds that link within the
//! conversation scope and clicks it, with a 3 s debounce so a banner that has
//! not yet disappeared is not double-clicked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::time::{sleep, Instant};
use tracing::info;

use pagepilot_dom::{Dom, NodeId, NodeKind};

use crate::config::{PreviewConfig, ResumeConfig};
use crate::diag::Diagnostics;
use crate::notify::Notifier;
use crate::preview::Preview;
use crate::scope::ScopeResolver;
use crate::text::{RESUME_LIMIT_PHRASES, RESUME_LINK_TEXT};

/// Watcher for the tool-call-ceiling banner.
pub struct ResumeWatcher {
    dom: Arc<dyn Dom>,
    scope: Arc<ScopeResolver>,
    preview: Preview,
    notifier: Notifier,
    diag: Arc<Diagnostics>,
    config: ResumeConfig,
    settle: std::time::Duration,
    busy: Arc<AtomicBool>,
    last_click: Arc<Mutex<Option<Instant>>>,
}

impl ResumeWatcher {
    pub fn new(
        dom: Arc<dyn Dom>,
        scope: Arc<ScopeResolver>,
        notifier: Notifier,
        diag: Arc<Diagnostics>,
        config: ResumeConfig,
        preview_config: PreviewConfig,
    ) -> Self {
        Self {
            preview: Preview::new(Arc::clone(&dom), preview_config.clone()),
            dom,
            scope,
            notifier,
            diag,
            config,
            settle: preview_config.settle(),
            busy: Arc::new(AtomicBool::new(false)),
            last_click: Arc::new(Mutex::new(None)),
        }
    }

    /// One polling tick. At most one banner is acted on per tick; first match
    /// in tree order wins.
    pub fn tick(&self) {
        if self.busy.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        if let Some(last) = *self.last_click.lock() {
            if now.duration_since(last) < self.config.debounce() {
                return;
            }
        }
        let Some(scope) = self.scope.resolve() else {
            return;
        };

        for banner in self.dom.descendants(scope) {
            let text = self.dom.text(banner);
            if !RESUME_LIMIT_PHRASES.iter().any(|p| text.contains(p)) {
                continue;
            }
            if let Some(link) = self.find_resume_link(banner) {
                self.trigger(link);
                break;
            }
        }
    }

    fn find_resume_link(&self, banner: NodeId) -> Option<NodeId> {
        self.dom.descendants(banner).into_iter().find(|&n| {
            self.dom.kind(n) == Some(NodeKind::Link)
                && self.dom.is_visible(n)
                && self.dom.text(n).trim() == RESUME_LINK_TEXT
        })
    }

    fn trigger(&self, link: NodeId) {
        self.busy.store(true, Ordering::SeqCst);
        self.diag.dbg("clicking \"resume the conversation\"");

        // The lock releases on its own timer, not on click completion: a UI
        // click gives no completion signal.
        let busy = Arc::clone(&self.busy);
        let settle = self.settle;
        tokio::spawn(async move {
            sleep(settle).await;
            busy.store(false, Ordering::SeqCst);
        });

        let dom = Arc::clone(&self.dom);
        let notifier = self.notifier.clone();
        let last_click = Arc::clone(&self.last_click);
        self.preview.run(link, move || {
            // A link that vanished during the preview delay is a silent no-op;
            // the settle timer still releases the lock.
            if !dom.is_attached(link) || !dom.is_visible(link) {
                return;
            }
            dom.click(link);
            *last_click.lock() = Some(Instant::now());
            info!(target: "pagepilot", "resumed conversation");
            notifier.show("Resumed conversation");
        });
    }

    /// Clear the busy lock and debounce timestamp.
    pub fn reset(&self) {
        self.busy.store(false, Ordering::SeqCst);
        *self.last_click.lock() = None;
    }
}

#[cfg(test)]
#[path = "resume_tests.rs"]
mod tests;
