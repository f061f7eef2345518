//! Structured logging for search execution.
//!
//! `info` for run start/finish, `debug` per selection and expansion, `warn` for recovered
//! callback failures.

use crate::error::CallbackError;
use crate::tree::NodeId;

use super::config::SearchConfig;
use super::result::TerminationReason;

pub(crate) fn log_search_start(config: &SearchConfig) {
    tracing::info!(
        strategy = %config.strategy,
        budget = config.budget,
        beam_width = config.beam_width,
        max_depth = config.max_depth,
        "Starting search"
    );
}

pub(crate) fn log_node_selected(
    node_id: NodeId,
    depth: usize,
    value: Option<f64>,
    nodes_evaluated: usize,
) {
    tracing::debug!(node_id = %node_id, depth, ?value, nodes_evaluated, "Selected node");
}

pub(crate) fn log_depth_limit(node_id: NodeId, depth: usize) {
    tracing::debug!(node_id = %node_id, depth, "Depth limit reached, not expanding");
}

pub(crate) fn log_expansion(node_id: NodeId, children: &[NodeId], scores: &[f64]) {
    tracing::debug!(node_id = %node_id, children = children.len(), ?scores, "Expanded node");
}

pub(crate) fn log_callback_failed(node_id: NodeId, error: &CallbackError) {
    tracing::warn!(node_id = %node_id, %error, "Callback failed, treating node as dead end");
}

pub(crate) fn log_search_complete(
    reason: TerminationReason,
    nodes_evaluated: usize,
    tree_size: usize,
) {
    tracing::info!(%reason, nodes_evaluated, tree_size, "Search complete");
}
