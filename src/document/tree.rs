//! Arena-backed in-memory document tree.
//!
//! `TreeDocument` is the bundled [`Document`](super::Document) implementation:
//! a slab of element/text nodes addressed by [`NodeId`], with parent/children
//! links. It exists so the engine can be exercised without any real rendering
//! engine, and doubles as a fixture for hosts that keep their own shadow tree.
//!
//! # Invariants
//!
//! - Node 0 is the root element and is never removed.
//! - Replaced nodes become tombstones: reads return `None`, mutations fail
//!   with `MutationFailure`. Ids are never reused.
//! - A marker element holds exactly one text child carrying the wrapped
//!   leaf's original content.
//!
//! # Example
//!
//! ```
//! use anchormark::TreeDocument;
//!
//! let mut doc = TreeDocument::new();
//! let p = doc.push_element(doc.root(), "p");
//! doc.push_text(p, "hello world");
//! assert_eq!(doc.visible_text(), "hello world");
//! ```

use super::{Document, NodeId};
use crate::error::{Error, Result};
use crate::style::{MARKER_CLASS, MarkerStyle};

/// Payload of a single arena slot.
#[derive(Clone, Debug)]
enum NodeKind {
    Element {
        tag: String,
        class: Option<String>,
        marker_style: Option<MarkerStyle>,
        children: Vec<NodeId>,
    },
    Text(String),
    /// Tombstone left behind when a node is replaced during wrap/unwrap.
    Removed,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// In-memory document tree satisfying the [`Document`] capability set.
///
/// Not thread-safe; the engine is single-threaded and runs each request to
/// completion, so no synchronization is needed.
#[derive(Clone, Debug)]
pub struct TreeDocument {
    nodes: Vec<Node>,
    root: NodeId,
    scroll_target: Option<NodeId>,
}

impl Default for TreeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeDocument {
    /// Create an empty document with a `body` root element.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                kind: NodeKind::Element {
                    tag: "body".to_string(),
                    class: None,
                    marker_style: None,
                    children: Vec::new(),
                },
            }],
            root: NodeId(0),
            scroll_target: None,
        }
    }

    /// Build a flat document: one paragraph element per string.
    ///
    /// Convenience for hosts and tests that only care about text content.
    #[must_use]
    pub fn from_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Self {
        let mut doc = Self::new();
        for text in paragraphs {
            let p = doc.push_element(doc.root(), "p");
            doc.push_text(p, text.as_ref());
        }
        doc
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Total number of arena slots, tombstones included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The node most recently passed to [`Document::scroll_to`], if any.
    #[must_use]
    pub fn scroll_target(&self) -> Option<NodeId> {
        self.scroll_target
    }

    /// Append a child element under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live element node.
    pub fn push_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.alloc(Node {
            parent: Some(parent),
            kind: NodeKind::Element {
                tag: tag.to_string(),
                class: None,
                marker_style: None,
                children: Vec::new(),
            },
        });
        self.attach(parent, id);
        id
    }

    /// Append a text leaf under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a live element node.
    pub fn push_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(Node {
            parent: Some(parent),
            kind: NodeKind::Text(text.to_string()),
        });
        self.attach(parent, id);
        id
    }

    /// Unlink a node from its parent, simulating concurrent page mutation.
    ///
    /// The node keeps its payload but is no longer reachable from the root;
    /// wrap/unwrap on it fail with `MutationFailure`. Unknown or already
    /// detached ids are a no-op.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(id.index()).and_then(|n| n.parent) else {
            return;
        };
        if let Some(NodeKind::Element { children, .. }) =
            self.nodes.get_mut(parent.index()).map(|n| &mut n.kind)
        {
            children.retain(|&c| c != id);
        }
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.parent = None;
        }
    }

    /// Tag of a live element node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    /// Class of a live element node, if set.
    #[must_use]
    pub fn class(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { class, .. }) => class.as_deref(),
            _ => None,
        }
    }

    /// Marker style carried by a marker element.
    #[must_use]
    pub fn marker_style(&self, id: NodeId) -> Option<&MarkerStyle> {
        match self.nodes.get(id.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { marker_style, .. }) => marker_style.as_ref(),
            _ => None,
        }
    }

    /// Concatenated text of every leaf, in document order.
    #[must_use]
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        for id in self.text_leaves() {
            if let Some(text) = self.leaf_text(id) {
                out.push_str(text);
            }
        }
        out
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        match self.nodes.get_mut(parent.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Element { children, .. }) => children.push(child),
            _ => panic!("parent {parent} is not a live element node"),
        }
    }

    /// Document-order traversal collecting ids for which `pick` is true.
    fn collect<F: Fn(&Node) -> bool>(&self, pick: F) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                continue;
            };
            if pick(node) {
                out.push(id);
            }
            if let NodeKind::Element { children, .. } = &node.kind {
                for &child in children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Verify the node is attached and still listed by a live parent element.
    ///
    /// Checked before allocating replacement nodes so a failed mutation does
    /// not grow the arena.
    fn ensure_attached(&self, id: NodeId) -> Result<()> {
        let parent = self
            .nodes
            .get(id.index())
            .and_then(|n| n.parent)
            .ok_or_else(|| Error::MutationFailure {
                node: id,
                reason: "node is detached".to_string(),
            })?;

        match self.nodes.get(parent.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { children, .. }) if children.contains(&id) => Ok(()),
            Some(NodeKind::Element { .. }) => Err(Error::MutationFailure {
                node: id,
                reason: "parent no longer contains node".to_string(),
            }),
            _ => Err(Error::MutationFailure {
                node: id,
                reason: "parent vanished".to_string(),
            }),
        }
    }

    /// Swap `old` for `new` in the parent's child list.
    ///
    /// Fails when the node is detached or the parent no longer lists it,
    /// which is how concurrent page mutation shows up mid-pass.
    fn replace_child(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let parent = self
            .nodes
            .get(old.index())
            .and_then(|n| n.parent)
            .ok_or_else(|| Error::MutationFailure {
                node: old,
                reason: "node is detached".to_string(),
            })?;

        let Some(NodeKind::Element { children, .. }) =
            self.nodes.get_mut(parent.index()).map(|n| &mut n.kind)
        else {
            return Err(Error::MutationFailure {
                node: old,
                reason: "parent vanished".to_string(),
            });
        };

        let Some(slot) = children.iter_mut().find(|c| **c == old) else {
            return Err(Error::MutationFailure {
                node: old,
                reason: "parent no longer contains node".to_string(),
            });
        };
        *slot = new;

        if let Some(node) = self.nodes.get_mut(new.index()) {
            node.parent = Some(parent);
        }
        self.tombstone(old);
        Ok(())
    }

    fn tombstone(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.parent = None;
            node.kind = NodeKind::Removed;
        }
    }
}

impl Document for TreeDocument {
    fn text_leaves(&self) -> Vec<NodeId> {
        self.collect(|node| matches!(node.kind, NodeKind::Text(_)))
    }

    fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.index()).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    fn in_marker(&self, id: NodeId) -> bool {
        let is_marker = |candidate: NodeId| {
            matches!(
                self.nodes.get(candidate.index()).map(|n| &n.kind),
                Some(NodeKind::Element { class: Some(c), .. }) if c == MARKER_CLASS
            )
        };
        if is_marker(id) {
            return true;
        }
        self.nodes
            .get(id.index())
            .and_then(|n| n.parent)
            .is_some_and(is_marker)
    }

    fn wrap_in_marker(&mut self, id: NodeId, style: &MarkerStyle) -> Result<NodeId> {
        let text = match self.nodes.get(id.index()).map(|n| &n.kind) {
            Some(NodeKind::Text(text)) => text.clone(),
            _ => {
                return Err(Error::MutationFailure {
                    node: id,
                    reason: "not a text leaf".to_string(),
                });
            }
        };
        self.ensure_attached(id)?;

        let marker = self.alloc(Node {
            parent: None,
            kind: NodeKind::Element {
                tag: "mark".to_string(),
                class: Some(MARKER_CLASS.to_string()),
                marker_style: Some(*style),
                children: Vec::new(),
            },
        });
        let content = self.alloc(Node {
            parent: Some(marker),
            kind: NodeKind::Text(text),
        });
        if let Some(NodeKind::Element { children, .. }) =
            self.nodes.get_mut(marker.index()).map(|n| &mut n.kind)
        {
            children.push(content);
        }

        self.replace_child(id, marker)?;
        Ok(marker)
    }

    fn marker_nodes(&self) -> Vec<NodeId> {
        self.collect(|node| {
            matches!(
                &node.kind,
                NodeKind::Element { class: Some(c), .. } if c == MARKER_CLASS
            )
        })
    }

    fn remove_marker(&mut self, id: NodeId) -> Result<String> {
        let children = match self.nodes.get(id.index()).map(|n| &n.kind) {
            Some(NodeKind::Element { class: Some(c), children, .. }) if c == MARKER_CLASS => {
                children.clone()
            }
            _ => {
                return Err(Error::MutationFailure {
                    node: id,
                    reason: "not a marker element".to_string(),
                });
            }
        };
        self.ensure_attached(id)?;

        // The marker's current text content, not what was originally wrapped:
        // the host may have edited it in place.
        let mut text = String::new();
        for child in &children {
            if let Some(t) = self.leaf_text(*child) {
                text.push_str(t);
            }
        }

        let restored = self.alloc(Node {
            parent: None,
            kind: NodeKind::Text(text.clone()),
        });
        self.replace_child(id, restored)?;
        for child in children {
            self.tombstone(child);
        }
        Ok(text)
    }

    fn scroll_to(&mut self, id: NodeId) {
        self.scroll_target = Some(id);
    }
}
