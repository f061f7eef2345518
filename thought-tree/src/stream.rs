//! Search progress events.
//!
//! When a sender is attached with
//! [`SearchExecutor::with_event_sender`](crate::SearchExecutor::with_event_sender), the
//! executor emits one [`SearchEvent`] per state change. Events serialize with a snake_case
//! `type` tag so callers can forward them as JSON lines.

use serde::{Deserialize, Serialize};

use crate::search::{SearchStrategy, TerminationReason};
use crate::tree::NodeId;

/// One observable step of a search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEvent {
    /// Config validated, root created.
    Started {
        strategy: SearchStrategy,
        budget: usize,
        beam_width: usize,
        max_depth: usize,
    },
    /// A node was taken off the frontier (counts against the budget).
    NodeSelected {
        node: NodeId,
        depth: usize,
        value: Option<f64>,
        nodes_evaluated: usize,
        frontier_len: usize,
    },
    /// A node was expanded; children are best-scored first.
    NodeExpanded {
        node: NodeId,
        children: Vec<NodeId>,
        scores: Vec<f64>,
    },
    /// Generator or evaluator failed; the node became a dead end.
    CallbackFailed { node: NodeId, error: String },
    /// The run reached a terminal state.
    Finished {
        reason: TerminationReason,
        success: bool,
        nodes_evaluated: usize,
        tree_size: usize,
    },
}
