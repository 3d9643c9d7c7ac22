//! The `Dom` trait — the seam between the watchdog and the host page.
//!
//! The engine never touches a real document; it holds an `Arc<dyn Dom>` and
//! treats the page as an opaque, queryable, clickable tree. Every method is
//! infallible by contract: implementations absorb their own failures (an
//! unknown or detached handle is a no-op / empty answer), because nothing a
//! cosmetic overlay or a stale handle does is allowed to stop a watcher tick.

use tokio::sync::broadcast;

use crate::node::{InputEvent, NodeId, NodeKind, ToastSeverity};

/// Queryable, mutable view of the host page.
pub trait Dom: Send + Sync {
    /// Root of the rendered tree, if a document is present.
    fn root(&self) -> Option<NodeId>;

    /// Structural role of `node`, or `None` for an unknown handle.
    fn kind(&self, node: NodeId) -> Option<NodeKind>;

    /// Concatenated text content of `node`'s subtree. Empty for unknown
    /// handles.
    fn text(&self, node: NodeId) -> String;

    /// Direct children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent element, `None` at the root or for detached/unknown handles.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// All descendants, depth-first in document order (`node` excluded).
    fn descendants(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether `node` is still part of the rendered tree.
    fn is_attached(&self, node: NodeId) -> bool;

    /// Whether `node` is attached, not style-hidden anywhere up its ancestor
    /// chain, and has non-zero layout.
    fn is_visible(&self, node: NodeId) -> bool;

    /// Synthetic activation of `node`. Emits an untrusted input event.
    fn click(&self, node: NodeId);

    /// Toggle the preview highlight outline on `node`.
    fn set_highlight(&self, node: NodeId, on: bool);

    /// Mount a toast overlay in the fixed corner and return its handle.
    fn mount_toast(&self, message: &str, severity: ToastSeverity) -> NodeId;

    /// Remove `node` (and its subtree) from the tree. Unknown handles no-op.
    fn remove_node(&self, node: NodeId);

    /// Subscribe to the page's input-event stream. Each subscriber gets every
    /// event from the moment of subscription; the receiver is dropped to
    /// unsubscribe.
    fn watch_input(&self) -> broadcast::Receiver<InputEvent>;
}
