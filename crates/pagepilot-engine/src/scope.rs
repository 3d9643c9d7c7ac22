//! Conversation-scope resolver.
//!
//! All watcher searches are confined to the one region holding the active
//! conversation. The resolver caches that handle and re-resolves only when the
//! cached element has been detached from the document.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use pagepilot_dom::{Dom, NodeId, NodeKind};

/// Locates and caches the active conversation pane.
pub struct ScopeResolver {
    dom: Arc<dyn Dom>,
    cached: Mutex<Option<NodeId>>,
}

impl ScopeResolver {
    pub fn new(dom: Arc<dyn Dom>) -> Self {
        Self {
            dom,
            cached: Mutex::new(None),
        }
    }

    /// The cached handle (still-attached or not), without touching the tree.
    pub fn current(&self) -> Option<NodeId> {
        *self.cached.lock()
    }

    /// Return the conversation pane, re-resolving if the cached element is no
    /// longer attached. First pane in document order wins.
    pub fn resolve(&self) -> Option<NodeId> {
        let mut cached = self.cached.lock();
        if let Some(node) = *cached {
            if self.dom.is_attached(node) {
                return Some(node);
            }
            debug!(target: "pagepilot", node = %node, "conversation pane detached, re-resolving");
            *cached = None;
        }

        let root = self.dom.root()?;
        let found = std::iter::once(root)
            .chain(self.dom.descendants(root))
            .find(|&n| self.dom.kind(n) == Some(NodeKind::ConversationPane));
        *cached = found;
        found
    }

    /// Forget the cached handle.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
