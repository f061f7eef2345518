//! Arena-backed tree store.

use serde::Serialize;

use crate::error::TreeError;

use super::node::{NodeId, TreeNode};

/// Append-only tree of thoughts for one search call.
///
/// Nodes live in a `Vec` indexed by [`NodeId`], so the next id is always the current size.
/// `max_depth` is the deepest depth inserted so far.
#[derive(Debug, Clone, Serialize)]
pub struct Tree<S> {
    nodes: Vec<TreeNode<S>>,
    max_depth: usize,
}

impl<S> Tree<S> {
    /// Creates a tree holding only the root node (depth 0, no value).
    pub fn new(root_thought: impl Into<String>, root_state: S) -> Self {
        Self {
            nodes: vec![TreeNode {
                id: NodeId::ROOT,
                thought: root_thought.into(),
                state: root_state,
                value: None,
                depth: 0,
                parent: None,
                children: Vec::new(),
            }],
            max_depth: 0,
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root(&self) -> &TreeNode<S> {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// Number of nodes, root included.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Deepest depth of any node inserted so far.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Appends a child under `parent` and returns its id.
    ///
    /// The child's depth is the parent's depth plus one; size and `max_depth` update here.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        thought: impl Into<String>,
        state: S,
        value: Option<f64>,
    ) -> Result<NodeId, TreeError> {
        let depth = match self.nodes.get(parent.index()) {
            Some(p) => p.depth + 1,
            None => return Err(TreeError::UnknownParent(parent)),
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(TreeNode {
            id,
            thought: thought.into(),
            state,
            value,
            depth,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        self.max_depth = self.max_depth.max(depth);
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Result<&TreeNode<S>, TreeError> {
        self.nodes.get(id.index()).ok_or(TreeError::NotFound(id))
    }

    /// Attaches a score to a node that has none yet.
    pub fn set_value(&mut self, id: NodeId, value: f64) -> Result<(), TreeError> {
        let node = self
            .nodes
            .get_mut(id.index())
            .ok_or(TreeError::NotFound(id))?;
        if node.value.is_some() {
            return Err(TreeError::ValueAlreadySet(id));
        }
        node.value = Some(value);
        Ok(())
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        self.get(id).map(TreeNode::children)
    }

    /// Ids from the root down to `id`, inclusive.
    pub fn path_ids(&self, id: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let mut ids = vec![id];
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent {
            // A chain longer than the arena can only come from a cycle.
            if ids.len() > self.nodes.len() {
                return Err(TreeError::BrokenPath(id));
            }
            current = self.get(parent).map_err(|_| TreeError::BrokenPath(id))?;
            ids.push(parent);
        }
        if current.id != NodeId::ROOT {
            return Err(TreeError::BrokenPath(id));
        }
        ids.reverse();
        Ok(ids)
    }

    /// Nodes from the root down to `id`, inclusive; length is `depth(id) + 1`.
    pub fn path(&self, id: NodeId) -> Result<Vec<&TreeNode<S>>, TreeError> {
        self.path_ids(id)?
            .into_iter()
            .map(|i| self.get(i))
            .collect()
    }

    /// All nodes in id (insertion) order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode<S>> {
        self.nodes.iter()
    }

    /// Nodes without children, in id order.
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode<S>> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    /// Highest-valued node; ties go to the lowest id. `None` when no node has a value.
    pub fn best_node(&self) -> Option<&TreeNode<S>> {
        let mut best: Option<&TreeNode<S>> = None;
        for node in &self.nodes {
            let Some(v) = node.value else { continue };
            match best.and_then(|b| b.value) {
                Some(bv) if v <= bv => {}
                _ => best = Some(node),
            }
        }
        best
    }
}
