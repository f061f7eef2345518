//! Append-only thought tree.
//!
//! [`Tree`] is an arena of [`TreeNode`]s indexed by dense [`NodeId`]s; parent/child links are
//! ids, never references. Nodes are only ever added, and each node's value is attached at
//! most once.

mod node;
mod store;

pub use node::{NodeId, TreeNode};
pub use store::Tree;
