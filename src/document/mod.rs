//! Document capability injected into the engine.
//!
//! The engine never owns a live rendering tree. It receives a handle to any
//! structure satisfying the minimal capability set below: enumerate text
//! leaves in order, read a leaf's content, swap a leaf for a marker, and
//! discover/remove markers by their reserved class. This keeps matching and
//! mutation pure and testable against the bundled in-memory
//! [`TreeDocument`](tree::TreeDocument).

pub mod tree;

use crate::error::Result;
use crate::style::MarkerStyle;
use std::fmt;

pub use tree::TreeDocument;

/// Copyable handle to a node in a document tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Raw index value.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Minimal capability set the engine needs from a host document.
///
/// The engine is the sole mutator of marker-classed nodes; the rest of the
/// tree may be mutated concurrently by the host. Implementations must
/// tolerate handles to removed nodes: read operations return `None`/`false`,
/// mutations return [`Error::MutationFailure`](crate::Error::MutationFailure).
pub trait Document {
    /// All text-bearing leaf nodes, in document order.
    fn text_leaves(&self) -> Vec<NodeId>;

    /// Text content of a leaf, or `None` if the node is not a text leaf.
    fn leaf_text(&self, id: NodeId) -> Option<&str>;

    /// True when the node is a marker element or its parent is one.
    ///
    /// Used to exclude already-wrapped units from matching, preventing
    /// nested or duplicate wrapping.
    fn in_marker(&self, id: NodeId) -> bool;

    /// Atomically replace a text leaf with a marker element holding the
    /// leaf's exact text. Returns the id of the new marker element.
    fn wrap_in_marker(&mut self, id: NodeId, style: &MarkerStyle) -> Result<NodeId>;

    /// All marker-classed elements, in document order.
    fn marker_nodes(&self) -> Vec<NodeId>;

    /// Replace a marker element with a plain text node holding the marker's
    /// current text content. Returns the restored text.
    fn remove_marker(&mut self, id: NodeId) -> Result<String>;

    /// Bring a node into the viewport. Usability hint only; the default
    /// implementation does nothing, which is safe when no scroll container
    /// exists.
    fn scroll_to(&mut self, _id: NodeId) {}
}
