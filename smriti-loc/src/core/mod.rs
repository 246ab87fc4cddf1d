//! Core types: graph nodes, node sets and path elements.

mod node;
mod node_set;
mod path;

pub use node::{Node, NodeKey};
pub use node_set::NodeSet;
pub use path::{NodeState, PathElement};
