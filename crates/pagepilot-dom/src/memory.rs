//! In-memory `Dom` implementation.
//!
//! `MemoryDom` backs the engine's tests and the demo binary: a plain node
//! arena behind a `parking_lot::RwLock`, with a mutation API for scripting
//! page changes and accessors for everything the watchdog did to the tree
//! (clicks, toasts, highlights).

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::trace;

use crate::dom::Dom;
use crate::node::{InputEvent, InputKind, NodeId, NodeKind, ToastSeverity};

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    /// Own text only; `Dom::text` concatenates the subtree.
    text: String,
    visible: bool,
}

#[derive(Debug, Clone)]
struct ToastData {
    node: NodeId,
    message: String,
    severity: ToastSeverity,
}

#[derive(Default)]
struct Tree {
    next_id: u64,
    nodes: HashMap<NodeId, NodeData>,
    root: Option<NodeId>,
    toasts: Vec<ToastData>,
    highlighted: HashSet<NodeId>,
    clicks: Vec<NodeId>,
}

impl Tree {
    fn alloc(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn attached(&self, node: NodeId) -> bool {
        let Some(root) = self.root else { return false };
        let mut cur = node;
        loop {
            if cur == root {
                return true;
            }
            match self.nodes.get(&cur).and_then(|n| n.parent) {
                Some(p) => cur = p,
                None => return false,
            }
        }
    }

    fn visible(&self, node: NodeId) -> bool {
        if !self.attached(node) {
            return false;
        }
        let mut cur = Some(node);
        while let Some(id) = cur {
            let Some(data) = self.nodes.get(&id) else { return false };
            if !data.visible {
                return false;
            }
            cur = data.parent;
        }
        true
    }

    fn collect_descendants(&self, node: NodeId, out: &mut Vec<NodeId>) {
        if let Some(data) = self.nodes.get(&node) {
            for &child in &data.children {
                out.push(child);
                self.collect_descendants(child, out);
            }
        }
    }

    fn subtree_text(&self, node: NodeId, out: &mut String) {
        if let Some(data) = self.nodes.get(&node) {
            if !data.text.is_empty() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&data.text);
            }
            for &child in &data.children {
                self.subtree_text(child, out);
            }
        }
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(data) = self.nodes.remove(&id) {
                stack.extend(data.children);
            }
            self.highlighted.remove(&id);
            self.toasts.retain(|t| t.node != id);
        }
        if self.root == Some(node) {
            self.root = None;
        }
    }
}

/// In-memory host page.
pub struct MemoryDom {
    tree: RwLock<Tree>,
    input_tx: broadcast::Sender<InputEvent>,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create an empty page (no root yet).
    pub fn new() -> Self {
        let (input_tx, _) = broadcast::channel(64);
        Self {
            tree: RwLock::new(Tree::default()),
            input_tx,
        }
    }

    /// Install the document root. Replaces any existing tree.
    pub fn add_root(&self, kind: NodeKind) -> NodeId {
        let mut tree = self.tree.write();
        let id = tree.alloc();
        tree.nodes.insert(
            id,
            NodeData {
                parent: None,
                children: Vec::new(),
                kind,
                text: String::new(),
                visible: true,
            },
        );
        tree.root = Some(id);
        id
    }

    /// Append a child element under `parent`.
    pub fn add(&self, parent: NodeId, kind: NodeKind, text: &str) -> NodeId {
        let mut tree = self.tree.write();
        let id = tree.alloc();
        tree.nodes.insert(
            id,
            NodeData {
                parent: Some(parent),
                children: Vec::new(),
                kind,
                text: text.to_string(),
                visible: true,
            },
        );
        if let Some(p) = tree.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Replace the own text of `node`.
    pub fn set_text(&self, node: NodeId, text: &str) {
        if let Some(data) = self.tree.write().nodes.get_mut(&node) {
            data.text = text.to_string();
        }
    }

    /// Show or hide `node` (hiding hides its whole subtree).
    pub fn set_visible(&self, node: NodeId, visible: bool) {
        if let Some(data) = self.tree.write().nodes.get_mut(&node) {
            data.visible = visible;
        }
    }

    /// Detach `node` from its parent. The handle stays known but the subtree
    /// is no longer part of the rendered tree.
    pub fn detach(&self, node: NodeId) {
        let mut tree = self.tree.write();
        if let Some(parent) = tree.nodes.get(&node).and_then(|n| n.parent) {
            if let Some(p) = tree.nodes.get_mut(&parent) {
                p.children.retain(|&c| c != node);
            }
        }
        if let Some(data) = tree.nodes.get_mut(&node) {
            data.parent = None;
        }
        if tree.root == Some(node) {
            tree.root = None;
        }
    }

    /// Emit a genuine input-device event.
    pub fn emit_trusted(&self, kind: InputKind) {
        let _ = self.input_tx.send(InputEvent::trusted(kind));
    }

    /// Every synthetic click so far, in order.
    pub fn clicks(&self) -> Vec<NodeId> {
        self.tree.read().clicks.clone()
    }

    /// Currently mounted toasts as `(message, severity)`, oldest first.
    pub fn toasts(&self) -> Vec<(String, ToastSeverity)> {
        self.tree
            .read()
            .toasts
            .iter()
            .map(|t| (t.message.clone(), t.severity))
            .collect()
    }

    /// Nodes currently carrying the preview highlight.
    pub fn highlighted(&self) -> Vec<NodeId> {
        let tree = self.tree.read();
        let mut out: Vec<NodeId> = tree.highlighted.iter().copied().collect();
        out.sort();
        out
    }
}

impl Dom for MemoryDom {
    fn root(&self) -> Option<NodeId> {
        self.tree.read().root
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.tree.read().nodes.get(&node).map(|n| n.kind)
    }

    fn text(&self, node: NodeId) -> String {
        let tree = self.tree.read();
        let mut out = String::new();
        tree.subtree_text(node, &mut out);
        out
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.tree
            .read()
            .nodes
            .get(&node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.read().nodes.get(&node).and_then(|n| n.parent)
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let tree = self.tree.read();
        let mut out = Vec::new();
        tree.collect_descendants(node, &mut out);
        out
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.tree.read().attached(node)
    }

    fn is_visible(&self, node: NodeId) -> bool {
        self.tree.read().visible(node)
    }

    fn click(&self, node: NodeId) {
        trace!(%node, "synthetic click");
        self.tree.write().clicks.push(node);
        let _ = self.input_tx.send(InputEvent::synthetic());
    }

    fn set_highlight(&self, node: NodeId, on: bool) {
        let mut tree = self.tree.write();
        if !tree.nodes.contains_key(&node) {
            return;
        }
        if on {
            tree.highlighted.insert(node);
        } else {
            tree.highlighted.remove(&node);
        }
    }

    fn mount_toast(&self, message: &str, severity: ToastSeverity) -> NodeId {
        let mut tree = self.tree.write();
        let id = tree.alloc();
        tree.toasts.push(ToastData {
            node: id,
            message: message.to_string(),
            severity,
        });
        id
    }

    fn remove_node(&self, node: NodeId) {
        let mut tree = self.tree.write();
        tree.toasts.retain(|t| t.node != node);
        if tree.nodes.contains_key(&node) {
            tree.remove_subtree(node);
        }
    }

    fn watch_input(&self) -> broadcast::Receiver<InputEvent> {
        self.input_tx.subscribe()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
