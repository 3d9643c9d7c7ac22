//! Idle-and-cycle watcher.
//!
//! Tracks the last *trusted* user input and escalates through
//! `Active -> IdleNoticed -> PreCycleWarned -> Cycling`. The trusted/synthetic
//! distinction is load-bearing: the watchdog's own corrective clicks are
//! synthetic and must never reset the idle clock, or the escalation could
//! never fire.
//!
//! Cycling walks the visible tabs of the tab strip, preview-clicking each and
//! dwelling between steps. Any trusted input cancels the whole remaining
//! sequence at once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pagepilot_dom::{Dom, NodeId, NodeKind};

use crate::config::{IdleConfig, PreviewConfig};
use crate::diag::Diagnostics;
use crate::notify::Notifier;
use crate::preview::Preview;
use crate::registry;
use crate::scope::ScopeResolver;

/// Escalation phase of the idle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdlePhase {
    Active,
    IdleNoticed,
    PreCycleWarned,
    Cycling,
}

/// Handle to an in-flight tab-cycle sequence.
pub struct CycleController {
    token: CancellationToken,
    cancelled: AtomicBool,
}

impl CycleController {
    fn new(token: CancellationToken) -> Self {
        Self {
            token,
            cancelled: AtomicBool::new(false),
        }
    }

    /// Cancel every pending step of the sequence. Returns true the first
    /// time, so a cancellation is acted on exactly once.
    pub fn cancel(&self) -> bool {
        let first = !self.cancelled.swap(true, Ordering::SeqCst);
        self.token.cancel();
        first
    }
}

struct IdleState {
    last_activity: Instant,
    phase: IdlePhase,
}

struct IdleInner {
    dom: Arc<dyn Dom>,
    scope: Arc<ScopeResolver>,
    preview: Preview,
    notifier: Notifier,
    diag: Arc<Diagnostics>,
    config: IdleConfig,
    state: Mutex<IdleState>,
    cycle: Mutex<Option<CycleController>>,
}

/// The idle watcher. Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct IdleWatcher {
    inner: Arc<IdleInner>,
}

impl IdleWatcher {
    pub fn new(
        dom: Arc<dyn Dom>,
        scope: Arc<ScopeResolver>,
        notifier: Notifier,
        diag: Arc<Diagnostics>,
        config: IdleConfig,
        preview_config: &PreviewConfig,
    ) -> Self {
        Self {
            inner: Arc::new(IdleInner {
                preview: Preview::new(Arc::clone(&dom), preview_config.clone()),
                dom,
                scope,
                notifier,
                diag,
                config,
                state: Mutex::new(IdleState {
                    last_activity: Instant::now(),
                    phase: IdlePhase::Active,
                }),
                cycle: Mutex::new(None),
            }),
        }
    }

    /// Current escalation phase.
    pub fn phase(&self) -> IdlePhase {
        self.inner.state.lock().phase
    }

    /// One coarse polling tick. A no-op while a cycle is running or while the
    /// conversation scope cannot be resolved.
    pub fn tick(&self) {
        let now = Instant::now();
        let (idle, phase) = {
            let state = self.inner.state.lock();
            if state.phase == IdlePhase::Cycling {
                return;
            }
            (now.duration_since(state.last_activity), state.phase)
        };
        if self.inner.scope.resolve().is_none() {
            return;
        }
        let config = &self.inner.config;

        if idle >= config.idle_timeout() {
            self.begin_cycle();
        } else if idle >= config.pre_cycle_at() && phase != IdlePhase::PreCycleWarned {
            self.inner.state.lock().phase = IdlePhase::PreCycleWarned;
            info!(target: "pagepilot", idle_secs = idle.as_secs(), "pre-cycle warning");
            self.inner
                .notifier
                .show("Still idle, tab cycling starts soon");
            self.highlight_tab_strip();
        } else if idle >= config.notice_after() && phase == IdlePhase::Active {
            self.inner.state.lock().phase = IdlePhase::IdleNoticed;
            debug!(target: "pagepilot", idle_secs = idle.as_secs(), "idle notice");
            self.inner.notifier.show("No recent activity detected");
        }
    }

    /// Record a genuine user input. Resets the idle clock, clears any notice,
    /// and cancels an in-flight cycle.
    pub fn note_trusted_input(&self) {
        let had_notice;
        {
            let mut state = self.inner.state.lock();
            state.last_activity = Instant::now();
            had_notice = matches!(
                state.phase,
                IdlePhase::IdleNoticed | IdlePhase::PreCycleWarned
            );
            if had_notice {
                state.phase = IdlePhase::Active;
            }
        }

        let cancelled = self
            .inner
            .cycle
            .lock()
            .as_ref()
            .is_some_and(CycleController::cancel);
        if cancelled {
            info!(target: "pagepilot", "tab cycling cancelled by user input");
            self.inner.notifier.show("Tab cycling cancelled");
        } else if had_notice {
            self.inner.notifier.show("Activity detected, idle timers reset");
        }
    }

    /// Subscribe to the page's input stream and feed trusted events into the
    /// idle clock until `stop` is cancelled. Registered once per session so
    /// listeners never leak across restarts.
    pub fn spawn_input_listener(&self, stop: CancellationToken) {
        let watcher = self.clone();
        let mut rx = self.inner.dom.watch_input();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    event = rx.recv() => match event {
                        Ok(ev) if ev.trusted => watcher.note_trusted_input(),
                        Ok(_) => {}
                        Err(broadcast::error::RecvError::Lagged(_)) => {}
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
        });
        registry::register(handle.abort_handle());
    }

    /// Reset to `Active` with a fresh idle clock, cancelling any cycle.
    pub fn reset(&self) {
        if let Some(ctrl) = self.inner.cycle.lock().take() {
            ctrl.cancel();
        }
        let mut state = self.inner.state.lock();
        state.last_activity = Instant::now();
        state.phase = IdlePhase::Active;
    }

    fn find_tab_strip(&self) -> Option<NodeId> {
        let scope = self.inner.scope.current()?;
        self.inner
            .dom
            .descendants(scope)
            .into_iter()
            .find(|&n| self.inner.dom.kind(n) == Some(NodeKind::TabStrip))
    }

    /// Non-blocking visual cue on the strip that is about to be cycled.
    fn highlight_tab_strip(&self) {
        let Some(strip) = self.find_tab_strip() else {
            return;
        };
        let dom = Arc::clone(&self.inner.dom);
        let duration = self.inner.config.strip_highlight();
        dom.set_highlight(strip, true);
        tokio::spawn(async move {
            sleep(duration).await;
            if dom.is_attached(strip) {
                dom.set_highlight(strip, false);
            }
        });
    }

    fn begin_cycle(&self) {
        let tabs: Vec<NodeId> = self
            .find_tab_strip()
            .map(|strip| {
                self.inner
                    .dom
                    .children(strip)
                    .into_iter()
                    .filter(|&n| {
                        self.inner.dom.kind(n) == Some(NodeKind::Tab)
                            && self.inner.dom.is_visible(n)
                    })
                    .collect()
            })
            .unwrap_or_default();

        if tabs.is_empty() {
            self.inner.diag.dbg("tab cycle aborted: no visible tabs");
            self.inner.notifier.show("No tabs found to cycle");
            // Restart the idle clock so the coarse tick does not re-toast
            // this every period.
            let mut state = self.inner.state.lock();
            state.last_activity = Instant::now();
            state.phase = IdlePhase::Active;
            return;
        }

        info!(target: "pagepilot", tabs = tabs.len(), "starting tab cycle");
        self.inner.state.lock().phase = IdlePhase::Cycling;
        let token = CancellationToken::new();
        *self.inner.cycle.lock() = Some(CycleController::new(token.clone()));

        let watcher = self.clone();
        let handle = tokio::spawn(async move {
            watcher.run_cycle(tabs, token).await;
        });
        registry::register(handle.abort_handle());
    }

    async fn run_cycle(self, tabs: Vec<NodeId>, token: CancellationToken) {
        let dwell = self.inner.config.tab_dwell();
        let mut completed = true;

        for tab in tabs {
            if token.is_cancelled() {
                completed = false;
                break;
            }
            let label = self.inner.dom.text(tab).trim().to_string();
            self.inner.notifier.show(&format!("Cycling to tab: {label}"));

            let dom = Arc::clone(&self.inner.dom);
            let preview = self.inner.preview.run(tab, move || {
                dom.click(tab);
            });

            tokio::select! {
                _ = token.cancelled() => {
                    preview.cancel();
                    completed = false;
                    break;
                }
                _ = sleep(dwell) => {}
            }
        }

        {
            let mut state = self.inner.state.lock();
            state.phase = IdlePhase::Active;
            if completed {
                state.last_activity = Instant::now();
            }
        }
        *self.inner.cycle.lock() = None;
        if completed {
            info!(target: "pagepilot", "tab cycle complete");
            self.inner.notifier.show("Tab cycle complete");
        }
    }
}

#[cfg(test)]
#[path = "idle_tests.rs"]
mod tests;
