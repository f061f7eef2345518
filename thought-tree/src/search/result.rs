//! Result builder: turns a finished run into a [`SearchOutcome`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::tree::{NodeId, Tree, TreeNode};

use super::config::{SearchConfig, SearchStrategy};

/// Why a search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    SolutionFound,
    BudgetExhausted,
    FrontierExhausted,
    Cancelled,
}

impl TerminationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolutionFound => "solution_found",
            Self::BudgetExhausted => "budget_exhausted",
            Self::FrontierExhausted => "frontier_exhausted",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run statistics reported alongside the answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMetadata {
    pub tree_size: usize,
    pub max_depth_reached: usize,
    pub budget: usize,
    /// Nodes taken off the frontier; equal to `nodes_evaluated`.
    pub budget_used: usize,
    pub strategy: SearchStrategy,
}

/// Final report of one search call.
///
/// `tree` is the full tree built during the run; `solution_path` and `best_node` are ids
/// into it (see [`solution_nodes`](Self::solution_nodes) and [`best`](Self::best)).
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome<S> {
    /// Extracted from the solution node, or from the best-known node when no solution was
    /// found (a partial answer). `None` only when no candidate node exists at all.
    pub answer: Option<String>,
    pub success: bool,
    /// Root-to-solution ids; empty unless `success`.
    pub solution_path: Vec<NodeId>,
    /// Solution node on success; otherwise the best-known fallback node.
    pub best_node: Option<NodeId>,
    pub tree: Tree<S>,
    /// Expansion attempts (nodes that went past the solution check).
    pub search_steps: usize,
    /// Nodes taken off the frontier.
    pub nodes_evaluated: usize,
    pub reason: TerminationReason,
    pub metadata: SearchMetadata,
}

impl<S> SearchOutcome<S> {
    /// Nodes along `solution_path`, root first.
    pub fn solution_nodes(&self) -> Vec<&TreeNode<S>> {
        self.solution_path
            .iter()
            .filter_map(|id| self.tree.get(*id).ok())
            .collect()
    }

    /// The solution node, or the best-known node on failure.
    pub fn best(&self) -> Option<&TreeNode<S>> {
        self.best_node.and_then(|id| self.tree.get(id).ok())
    }

    /// Thought labels along the solution path.
    pub fn solution_thoughts(&self) -> Vec<&str> {
        self.solution_nodes()
            .into_iter()
            .map(TreeNode::thought)
            .collect()
    }
}

/// Counters kept by the executor during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SearchCounters {
    pub nodes_evaluated: usize,
    pub search_steps: usize,
}

/// Builds the outcome for a terminated run.
///
/// `solution` is set only for [`TerminationReason::SolutionFound`]; `fallback` is the
/// best-known node chosen by the executor for every other reason.
pub(crate) fn build_outcome<S>(
    tree: Tree<S>,
    reason: TerminationReason,
    solution: Option<NodeId>,
    fallback: Option<NodeId>,
    counters: SearchCounters,
    config: &SearchConfig,
    extract: &dyn Fn(&TreeNode<S>) -> String,
) -> Result<SearchOutcome<S>, TreeError> {
    let (success, solution_path, best_node) = match solution {
        Some(id) => (true, tree.path_ids(id)?, Some(id)),
        None => (false, Vec::new(), fallback),
    };
    let answer = match best_node {
        Some(id) => Some(extract(tree.get(id)?)),
        None => None,
    };
    let metadata = SearchMetadata {
        tree_size: tree.size(),
        max_depth_reached: tree.max_depth(),
        budget: config.budget,
        budget_used: counters.nodes_evaluated,
        strategy: config.strategy,
    };
    Ok(SearchOutcome {
        answer,
        success,
        solution_path,
        best_node,
        tree,
        search_steps: counters.search_steps,
        nodes_evaluated: counters.nodes_evaluated,
        reason,
        metadata,
    })
}
