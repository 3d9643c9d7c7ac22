//! # PagePilot
//!
//! A UI watchdog for single-page applications: it polls the rendered tree for
//! a small set of transient conditions (a "resume the conversation" banner, a
//! "Connection failed" banner, sustained user idleness) and performs
//! corrective clicks on the operator's behalf, previewing every click with a
//! highlight first and rate-limiting retries with exponential back-off.
//!
//! This crate is the embedding surface. The engine lives in
//! `pagepilot-engine`; the host page is abstracted behind the `Dom` trait in
//! `pagepilot-dom`.
//!
//! ## Bootstrap semantics
//!
//! Re-running the bootstrap replaces the previous session wholesale:
//! [`install`] tears down whatever session is current before arming the new
//! one, so there is always exactly one active session per process.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pagepilot::{install, EngineConfig, MemoryDom, NodeKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     let dom = Arc::new(MemoryDom::new());
//!     let root = dom.add_root(NodeKind::Block);
//!     dom.add(root, NodeKind::ConversationPane, "");
//!
//!     let session = install(dom, EngineConfig::default(), false).unwrap();
//!     session.show_toast("hello", None);
//! }
//! ```

use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

pub use pagepilot_dom::{
    Dom, InputEvent, InputKind, MemoryDom, NodeId, NodeKind, ToastSeverity,
};
pub use pagepilot_engine::{
    clear_all, Backoff, BackoffConfig, CancelHandle, CancellationToken, CycleController,
    DiagnosticSink, Diagnostics, EngineConfig, EngineError, EngineResult, IdleConfig, IdlePhase,
    IdleWatcher, Notifier, PollConfig, Preview, PreviewConfig, RecoveryWatcher, ResumeButtonWatcher,
    ResumeConfig, ResumeWatcher, ScopeResolver, Session, TaskRegistry, ToastConfig, TracingSink,
};

static CURRENT: Lazy<Mutex<Option<Arc<Session>>>> = Lazy::new(|| Mutex::new(None));

/// Arm a watchdog session over `dom`, tearing down any previous session
/// first. The teardown is silent; the new session's startup notice is shown
/// unless `silent`.
///
/// On failure (conversation pane not found) the previous session is still
/// gone — a broken page gets a persistent error notice, not a half-alive
/// watchdog.
pub fn install(
    dom: Arc<dyn Dom>,
    config: EngineConfig,
    silent: bool,
) -> EngineResult<Arc<Session>> {
    let mut current = CURRENT.lock();
    if let Some(previous) = current.take() {
        previous.stop(true);
    }
    let session = Session::start(dom, config, silent)?;
    *current = Some(Arc::clone(&session));
    Ok(session)
}

/// Stop and drop the current session, if any. Returns whether one existed.
pub fn uninstall(silent: bool) -> bool {
    match CURRENT.lock().take() {
        Some(session) => {
            session.stop(silent);
            true
        }
        None => false,
    }
}

/// The currently installed session, if any.
pub fn current() -> Option<Arc<Session>> {
    CURRENT.lock().clone()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
