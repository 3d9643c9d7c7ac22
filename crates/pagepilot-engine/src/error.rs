//! Error types for the engine.
//!
//! Watcher ticks are infallible by design: a tick that finds nothing to do, or
//! whose click target vanished, is a silent no-op re-evaluated on the next
//! tick. Errors only exist at the session boundary.

use thiserror::Error;

/// Errors that can occur when managing a watchdog session.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The conversation pane could not be located. Fatal to the session: no
    /// watchers are armed.
    #[error("conversation pane not found in the document")]
    ScopeNotFound,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
