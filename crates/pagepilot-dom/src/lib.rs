//! # PagePilot DOM
//!
//! Host-page abstraction for the PagePilot UI watchdog.
//!
//! The watchdog engine treats the page it supervises as an opaque tree it can
//! query, highlight, and click into. This crate defines that seam:
//!
//! - [`Dom`]: the collaborator trait the engine holds as `Arc<dyn Dom>`
//! - [`NodeId`] / [`NodeKind`]: element handles and their structural roles
//! - [`InputEvent`]: trusted vs. synthetic input, for idle tracking
//! - [`MemoryDom`]: an in-memory implementation used by tests and the demo

pub mod dom;
pub mod memory;
pub mod node;

pub use dom::Dom;
pub use memory::MemoryDom;
pub use node::{InputEvent, InputKind, NodeId, NodeKind, ToastSeverity};
