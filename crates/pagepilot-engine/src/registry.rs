//! Process-wide registry of the engine's spawned tasks.
//!
//! Exists for one reason: `clear_all_intervals`, the last-resort purge used
//! when a stuck session cannot be stopped through its own handle. Aborting
//! everything registered here kills the loops of *every* session in the
//! process, so it is documented as unsafe to anything else still relying on
//! them.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tokio::task::AbortHandle;
use tracing::warn;

/// A set of abortable task handles.
pub struct TaskRegistry {
    tasks: Mutex<Vec<AbortHandle>>,
}

impl TaskRegistry {
    pub const fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Track a handle. Finished handles are pruned opportunistically.
    pub fn register(&self, handle: AbortHandle) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    /// Abort every tracked handle. Returns how many were aborted.
    pub fn clear(&self) -> usize {
        let mut tasks = self.tasks.lock();
        let count = tasks.len();
        for handle in tasks.drain(..) {
            handle.abort();
        }
        count
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Lazy<TaskRegistry> = Lazy::new(TaskRegistry::new);

/// Track a spawned engine task in the process-wide registry.
pub(crate) fn register(handle: AbortHandle) {
    GLOBAL.register(handle);
}

/// Abort every registered engine task in the process. Returns how many
/// handles were aborted.
///
/// Last resort only: this tears down the loops of all sessions at once, and
/// the affected sessions are left in whatever state they were in. Re-run the
/// bootstrap afterwards to get a working session back.
pub fn clear_all() -> usize {
    let count = GLOBAL.clear();
    if count > 0 {
        warn!(target: "pagepilot", count, "aborted all registered engine tasks");
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clear_aborts_registered_tasks() {
        let registry = TaskRegistry::new();
        let task = tokio::spawn(async {
            std::future::pending::<()>().await;
        });
        registry.register(task.abort_handle());

        assert_eq!(registry.clear(), 1);
        let err = task.await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn finished_tasks_are_pruned_on_register() {
        let registry = TaskRegistry::new();
        let done = tokio::spawn(async {});
        let handle = done.abort_handle();
        let _ = done.await;
        registry.register(handle);

        let task = tokio::spawn(async {
            std::future::pending::<()>().await;
        });
        registry.register(task.abort_handle());
        assert_eq!(registry.clear(), 1, "the finished handle was pruned");
        task.abort();
    }
}
