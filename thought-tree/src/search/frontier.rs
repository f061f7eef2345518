//! Frontier: node ids awaiting expansion.
//!
//! The storage is the same ordered list for every strategy; [`SearchStrategy`] only decides
//! which id [`Frontier::select`] removes and where [`Frontier::insert`] puts new children.

use std::collections::VecDeque;

use crate::tree::{NodeId, Tree, TreeNode};

use super::config::SearchStrategy;

/// Ordered collection of unexpanded node ids for one search.
#[derive(Debug, Clone)]
pub(crate) struct Frontier {
    strategy: SearchStrategy,
    ids: VecDeque<NodeId>,
}

impl Frontier {
    /// Creates a frontier holding only `root`.
    pub(crate) fn new(strategy: SearchStrategy, root: NodeId) -> Self {
        Self {
            strategy,
            ids: VecDeque::from([root]),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Removes and returns the next node to expand.
    ///
    /// Breadth-first and depth-first take the front; best-first takes the highest-valued
    /// node, earliest inserted on ties.
    pub(crate) fn select<S>(&mut self, tree: &Tree<S>) -> Option<NodeId> {
        match self.strategy {
            SearchStrategy::BreadthFirst | SearchStrategy::DepthFirst => self.ids.pop_front(),
            SearchStrategy::BestFirst => {
                let pos = self.best_position(tree)?;
                self.ids.remove(pos)
            }
        }
    }

    /// Adds freshly created children, given best-scored first.
    ///
    /// Breadth-first and best-first append to the back. Depth-first pushes them to the front
    /// keeping their order, so the best child is expanded next.
    pub(crate) fn insert(&mut self, children: &[NodeId]) {
        match self.strategy {
            SearchStrategy::BreadthFirst | SearchStrategy::BestFirst => {
                self.ids.extend(children.iter().copied());
            }
            SearchStrategy::DepthFirst => {
                for id in children.iter().rev() {
                    self.ids.push_front(*id);
                }
            }
        }
    }

    /// Highest-valued id without removing it; unvalued nodes rank below valued ones.
    pub(crate) fn best<S>(&self, tree: &Tree<S>) -> Option<NodeId> {
        self.best_position(tree).map(|pos| self.ids[pos])
    }

    fn best_position<S>(&self, tree: &Tree<S>) -> Option<usize> {
        let mut best: Option<(usize, Option<f64>)> = None;
        for (pos, id) in self.ids.iter().enumerate() {
            let value = tree.get(*id).ok().and_then(TreeNode::value);
            match best {
                Some((_, best_value)) if !ranks_above(value, best_value) => {}
                _ => best = Some((pos, value)),
            }
        }
        best.map(|(pos, _)| pos)
    }
}

fn ranks_above(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
