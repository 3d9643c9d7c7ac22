//! Session lifecycle and the polling scheduler.
//!
//! A `Session` owns everything: the scope resolver, the shared back-off, the
//! three recovery-side watchers, the idle watcher, and the interval loops that
//! drive them. `start` arms it all atomically; `stop` cancels every loop and
//! resets every piece of transient state, so a stopped session leaves nothing
//! behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, trace};

use pagepilot_dom::Dom;

use crate::backoff::Backoff;
use crate::config::EngineConfig;
use crate::diag::{DiagnosticSink, Diagnostics, TracingSink};
use crate::error::{EngineError, EngineResult};
use crate::idle::IdleWatcher;
use crate::notify::Notifier;
use crate::recovery::{RecoveryWatcher, ResumeButtonWatcher};
use crate::registry;
use crate::resume::ResumeWatcher;
use crate::scope::ScopeResolver;

/// One watchdog session.
pub struct Session {
    notifier: Notifier,
    diag: Arc<Diagnostics>,
    backoff: Arc<Backoff>,
    resume: Arc<ResumeWatcher>,
    recovery: Arc<RecoveryWatcher>,
    resume_button: Arc<ResumeButtonWatcher>,
    idle: IdleWatcher,
    token: CancellationToken,
    running: AtomicBool,
}

impl Session {
    /// Arm a session over `dom` with the default diagnostic sink.
    pub fn start(
        dom: Arc<dyn Dom>,
        config: EngineConfig,
        silent: bool,
    ) -> EngineResult<Arc<Self>> {
        Self::start_with_sink(dom, config, silent, Box::new(TracingSink))
    }

    /// Arm a session over `dom`.
    ///
    /// Resolves the conversation scope exactly once up front. If that fails
    /// the whole session is aborted: a persistent error notice is shown, no
    /// watcher is armed, and `EngineError::ScopeNotFound` is returned.
    ///
    /// On success each watcher also runs once immediately, so corrective
    /// effects are not delayed by the first polling interval.
    pub fn start_with_sink(
        dom: Arc<dyn Dom>,
        config: EngineConfig,
        silent: bool,
        sink: Box<dyn DiagnosticSink>,
    ) -> EngineResult<Arc<Self>> {
        let diag = Arc::new(Diagnostics::new(sink));
        let notifier = Notifier::new(Arc::clone(&dom), config.toast.clone());
        let scope = Arc::new(ScopeResolver::new(Arc::clone(&dom)));

        if scope.resolve().is_none() {
            notifier.show_error("Conversation pane not found, watchdog not started");
            return Err(EngineError::ScopeNotFound);
        }

        let backoff = Arc::new(Backoff::new(&config.backoff));
        let resume = Arc::new(ResumeWatcher::new(
            Arc::clone(&dom),
            Arc::clone(&scope),
            notifier.clone(),
            Arc::clone(&diag),
            config.resume.clone(),
            config.preview.clone(),
        ));
        let recovery = Arc::new(RecoveryWatcher::new(
            Arc::clone(&dom),
            Arc::clone(&scope),
            notifier.clone(),
            Arc::clone(&diag),
            Arc::clone(&backoff),
            &config.preview,
        ));
        let resume_button = Arc::new(ResumeButtonWatcher::new(
            Arc::clone(&dom),
            Arc::clone(&scope),
            notifier.clone(),
            Arc::clone(&diag),
            Arc::clone(&backoff),
            &config.preview,
        ));
        let idle = IdleWatcher::new(
            Arc::clone(&dom),
            Arc::clone(&scope),
            notifier.clone(),
            Arc::clone(&diag),
            config.idle.clone(),
            &config.preview,
        );

        let token = CancellationToken::new();
        let tick_period = config.poll.watcher_interval();
        {
            let w = Arc::clone(&resume);
            spawn_interval("resume", tick_period, token.clone(), move || w.tick());
        }
        {
            let w = Arc::clone(&recovery);
            spawn_interval("recovery", tick_period, token.clone(), move || w.tick());
        }
        {
            let w = Arc::clone(&resume_button);
            spawn_interval("resume-button", tick_period, token.clone(), move || {
                w.tick()
            });
        }
        {
            let w = idle.clone();
            spawn_interval("idle", config.poll.idle_interval(), token.clone(), move || {
                w.tick()
            });
        }
        idle.spawn_input_listener(token.clone());

        info!(target: "pagepilot", "watchdog session started");
        if !silent {
            notifier.show("PagePilot started");
        }

        Ok(Arc::new(Self {
            notifier,
            diag,
            backoff,
            resume,
            recovery,
            resume_button,
            idle,
            token,
            running: AtomicBool::new(true),
        }))
    }

    /// Tear the session down: cancel every polling loop and any in-flight
    /// cycle, and reset all transient state to initial values. Idempotent.
    pub fn stop(&self, silent: bool) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.token.cancel();
        self.idle.reset();
        self.resume.reset();
        self.recovery.reset();
        self.resume_button.reset();
        self.backoff.reset();

        info!(target: "pagepilot", "watchdog session stopped");
        if !silent {
            self.notifier.show("PagePilot stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Manual toast, for diagnostics and testing.
    pub fn show_toast(&self, message: &str, duration_ms: Option<u64>) {
        match duration_ms {
            Some(ms) => self
                .notifier
                .show_for(message, Duration::from_millis(ms)),
            None => self.notifier.show(message),
        }
    }

    /// Toggle verbose diagnostic reporting.
    pub fn set_debug(&self, enabled: bool) {
        self.diag.set_debug(enabled);
    }

    /// Emergency purge: abort every engine task in the process, including
    /// other sessions'. Last resort for when `stop` cannot clean up.
    pub fn clear_all_intervals(&self) -> usize {
        let count = registry::clear_all();
        self.running.store(false, Ordering::SeqCst);
        self.diag
            .alert(&format!("Aborted {count} engine tasks; re-install to restart"));
        count
    }
}

/// Run `tick` every `period` until `token` is cancelled. The first tick fires
/// immediately.
fn spawn_interval<F>(name: &'static str, period: Duration, token: CancellationToken, tick: F)
where
    F: Fn() + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = timer.tick() => tick(),
            }
        }
        trace!(target: "pagepilot", name, "watcher loop stopped");
    });
    registry::register(handle.abort_handle());
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
