//! # PagePilot Engine
//!
//! Watcher/scheduler engine for the PagePilot UI watchdog: a browser-side
//! automation agent that watches a single-page application for transient
//! failure conditions and performs corrective clicks on the operator's
//! behalf, with visual feedback and rate limiting.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Session                             │
//! │  owns: ScopeResolver · Backoff · CancellationToken           │
//! │  arms: four interval loops + one input listener              │
//! │                                                              │
//! │   ResumeWatcher ──┐                                          │
//! │   RecoveryWatcher ┼──► Preview (highlight → delay → click)   │
//! │   ResumeButton ───┤          │                               │
//! │   IdleWatcher ────┘          ▼                               │
//! │        │              Notifier (singleton toast)             │
//! │        └── CycleController (cancellable tab sequence)        │
//! └──────────────────────────────────────────────────────────────┘
//!                          Arc<dyn Dom>
//!                    (the host page, opaque)
//! ```
//!
//! Concurrency is cooperative: every watcher runs on its own periodic tick,
//! no tick blocks beyond tree-search cost, and every wait (preview delay,
//! tab dwell, toast dismissal, busy settle) is a deferred task, never a
//! sleep on the polling path. Busy locks prevent re-entrancy within one
//! watcher only; cross-watcher ordering is deliberately unconstrained.
//!
//! ## Key components
//!
//! - [`Session`]: lifecycle owner; `start` / `stop` / `show_toast` /
//!   `set_debug` / `clear_all_intervals`
//! - [`Notifier`]: one visible toast at a time
//! - [`Preview`]: the auditable highlight-then-click primitive
//! - [`Backoff`]: shared exponential back-off (1 s floor, 5 min ceiling)
//! - [`ResumeWatcher`] / [`RecoveryWatcher`] / [`ResumeButtonWatcher`] /
//!   [`IdleWatcher`]: the four condition state machines

pub mod backoff;
pub mod config;
pub mod diag;
pub mod error;
pub mod idle;
pub mod notify;
pub mod preview;
pub mod recovery;
pub mod registry;
pub mod resume;
pub mod scope;
pub mod session;
pub mod text;

pub use backoff::Backoff;
pub use config::{
    BackoffConfig, EngineConfig, IdleConfig, PollConfig, PreviewConfig, ResumeConfig, ToastConfig,
};
pub use diag::{DiagnosticSink, Diagnostics, TracingSink};
pub use error::{EngineError, EngineResult};
pub use idle::{CycleController, IdlePhase, IdleWatcher};
pub use notify::Notifier;
pub use preview::{CancelHandle, Preview};
pub use recovery::{RecoveryWatcher, ResumeButtonWatcher};
pub use registry::{clear_all, TaskRegistry};
pub use resume::ResumeWatcher;
pub use scope::ScopeResolver;
pub use session::Session;
// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;
