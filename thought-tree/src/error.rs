//! Error types for thought-tree searches.
//!
//! Three classes, one per way they are handled:
//! - [`SearchError`]: fatal to one `run` call (configuration, or a structural failure that escaped).
//! - [`TreeError`]: tree invariant violations (unknown ids, broken parent chains).
//! - [`CallbackError`]: generator/evaluator failures; the executor recovers them as dead ends.

use std::time::Duration;

use thiserror::Error;

use crate::tree::NodeId;

/// Fatal search error returned by [`SearchExecutor::run`](crate::SearchExecutor::run).
///
/// Normal exhaustion (budget, frontier, cancellation) is never an error; it is reported
/// through [`SearchOutcome::reason`](crate::SearchOutcome::reason).
#[derive(Debug, Error)]
pub enum SearchError {
    /// A limit or option failed validation before the first iteration.
    #[error("invalid search config: {0}")]
    InvalidConfig(String),

    /// Strategy name did not match any known search strategy.
    #[error("unknown search strategy: {0} (use breadth_first, depth_first or best_first)")]
    UnknownStrategy(String),

    /// Loading env/XDG configuration failed.
    #[error("load config: {0}")]
    Load(#[from] env_config::LoadError),

    /// The tree reported an invariant violation during the search.
    #[error("tree invariant violated: {0}")]
    Tree(#[from] TreeError),
}

/// Structural error from the tree store.
///
/// Any of these reaching the executor means the tree is corrupt, not that the search failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `add_child` was given a parent id the tree does not contain.
    #[error("unknown parent node: {0}")]
    UnknownParent(NodeId),

    /// Lookup of an id the tree does not contain.
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// Walking parent pointers from a node did not reach the root.
    #[error("path from {0} does not reach the root")]
    BrokenPath(NodeId),

    /// A node's value may be attached only once.
    #[error("value already set on node {0}")]
    ValueAlreadySet(NodeId),
}

/// Failure of a generator or evaluator callback.
///
/// Recovered by the executor as "zero candidates produced" for the node being expanded.
#[derive(Debug, Clone, Error)]
pub enum CallbackError {
    /// Candidate generation failed.
    #[error("generation failed: {0}")]
    Generation(String),

    /// Candidate scoring failed.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// A batched evaluator returned a different number of scores than candidates.
    #[error("evaluator returned {got} scores for {expected} candidates")]
    ScoreCountMismatch { expected: usize, got: usize },

    /// The callback did not finish within the configured timeout.
    #[error("callback timed out after {0:?}")]
    Timeout(Duration),
}
