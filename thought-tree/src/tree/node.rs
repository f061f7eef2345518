//! Tree node representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Dense index of a node in its [`Tree`](super::Tree) arena.
///
/// Assigned in insertion order starting at 0 for the root; never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Id of the root node in every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this id.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One reasoning step in the search tree.
///
/// `state` is the caller's opaque payload; the core stores and hands it back to the
/// generator, evaluator and solution check but never inspects it.
#[derive(Debug, Clone, Serialize)]
pub struct TreeNode<S> {
    pub(super) id: NodeId,
    pub(super) thought: String,
    pub(super) state: S,
    pub(super) value: Option<f64>,
    pub(super) depth: usize,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl<S> TreeNode<S> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Label describing the step that produced this node.
    pub fn thought(&self) -> &str {
        &self.thought
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Evaluator score; `None` for the root and for nodes not yet scored.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Distance from the root (root = 0).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order (best-scored first for nodes expanded by the executor).
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_display_and_index() {
        assert_eq!(NodeId(3).to_string(), "#3");
        assert_eq!(NodeId(3).index(), 3);
        assert_eq!(NodeId::ROOT, NodeId(0));
    }

    #[test]
    fn node_id_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&NodeId(12)).unwrap(), "12");
    }
}
