//! Value types shared by every `Dom` implementation.

use serde::{Deserialize, Serialize};

/// Opaque handle to one element of the host-page tree.
///
/// Handles stay valid after the element is detached from the document;
/// callers are expected to re-check [`crate::Dom::is_attached`] before
/// acting on a handle they have held across time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural role of an element, as far as the watchdog cares.
///
/// The watchdog has no semantic understanding of the page; this enum is the
/// entire vocabulary it uses to tell "clickable" from "container" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The single region holding the active conversation. All watcher
    /// searches are confined to the first one in document order.
    ConversationPane,

    /// Block-level container (div-like). Ancestor anchor for button searches.
    Block,

    /// Link-like element (anchor, markdown link, `role="link"`).
    Link,

    /// Regular button or `role="button"`.
    Button,

    /// Icon-style action element (codicon-like toolbar glyphs).
    IconButton,

    /// The message-composition input area. Icon fallback never clicks here.
    Composer,

    /// Container whose children are the cycle-able tabs.
    TabStrip,

    /// One item of a tab strip.
    Tab,

    /// Inline or otherwise uninteresting element.
    Generic,
}

impl NodeKind {
    /// Whether this kind counts as a block-level container.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            NodeKind::Block | NodeKind::ConversationPane | NodeKind::Composer | NodeKind::TabStrip
        )
    }

    /// Whether this kind is an activation target for the explicit-button
    /// recovery strategy (button, link, or plain clickable span).
    pub fn is_actionable(&self) -> bool {
        matches!(self, NodeKind::Button | NodeKind::Link | NodeKind::Generic)
    }
}

/// Severity of a toast overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastSeverity {
    Normal,
    Error,
}

/// Category of an input-device event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Pointer,
    Key,
    Wheel,
    Touch,
    /// A click the watchdog produced itself. Never trusted.
    Synthetic,
}

/// One observed input event.
///
/// `trusted` mirrors the browser's `isTrusted` flag: true only for genuine
/// input-device events. The idle watcher ignores untrusted events entirely,
/// otherwise the watchdog's own corrective clicks would reset the idle clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub trusted: bool,
}

impl InputEvent {
    /// A genuine input-device event.
    pub fn trusted(kind: InputKind) -> Self {
        Self { kind, trusted: true }
    }

    /// A synthetic (script-originated) event.
    pub fn synthetic() -> Self {
        Self {
            kind: InputKind::Synthetic,
            trusted: false,
        }
    }
}
