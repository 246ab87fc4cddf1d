//! Coordinate-keyed node collection.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use super::node::{Node, NodeKey};

/// Set of nodes keyed by `(qu_id, ref_id)`.
///
/// Iteration is sorted by coordinates. Inserting a coordinate that is already
/// present keeps whichever node has the lower `idv_cost`, so the result does
/// not depend on insertion order.
#[derive(Clone, Debug, Default)]
pub struct NodeSet {
    nodes: BTreeMap<NodeKey, Node>,
}

impl NodeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns true if the coordinate was new.
    pub fn insert(&mut self, node: Node) -> bool {
        match self.nodes.entry(node.key()) {
            Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
            Entry::Occupied(mut slot) => {
                if node.idv_cost < slot.get().idv_cost {
                    slot.insert(node);
                }
                false
            }
        }
    }

    /// Whether a node with the same coordinates is present
    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.contains_key(&node.key())
    }

    /// Stored node at the given coordinates
    pub fn get(&self, qu_id: i32, ref_id: i32) -> Option<&Node> {
        self.nodes.get(&NodeKey::new(qu_id, ref_id))
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove all nodes
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Iterate in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Merge another set into this one
    pub fn extend(&mut self, other: NodeSet) {
        for node in other.nodes.into_values() {
            self.insert(node);
        }
    }
}

impl FromIterator<Node> for NodeSet {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut set = NodeSet::new();
        for node in iter {
            set.insert(node);
        }
        set
    }
}

impl IntoIterator for NodeSet {
    type Item = Node;
    type IntoIter = std::collections::btree_map::IntoValues<NodeKey, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_values()
    }
}

impl<'a> IntoIterator for &'a NodeSet {
    type Item = &'a Node;
    type IntoIter = std::collections::btree_map::Values<'a, NodeKey, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.values()
    }
}
