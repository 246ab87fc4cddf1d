//! Search graph vertex.

use std::cmp::Ordering;
use std::fmt;

/// Coordinate key of a node in the query × reference grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    /// Query image index (-1 for the source)
    pub qu_id: i32,
    /// Reference image index
    pub ref_id: i32,
}

impl NodeKey {
    /// Create a new key
    pub const fn new(qu_id: i32, ref_id: i32) -> Self {
        Self { qu_id, ref_id }
    }
}

/// A vertex of the search graph.
///
/// Equality and hashing only look at `(qu_id, ref_id)`: two nodes with the
/// same coordinates and different costs are the same vertex. Ordering is
/// reversed on `acc_cost` so a `BinaryHeap<Node>` pops the cheapest node
/// first; ties fall back to coordinates to keep the search deterministic.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    /// Query image index
    pub qu_id: i32,
    /// Reference image index
    pub ref_id: i32,
    /// Matching cost of this edge (smaller = more similar)
    pub idv_cost: f64,
    /// Accumulated path cost from the source
    pub acc_cost: f64,
}

impl Node {
    /// Sentinel marking "search not yet started".
    pub const SOURCE: Node = Node {
        qu_id: -1,
        ref_id: 0,
        idv_cost: 0.0,
        acc_cost: 0.0,
    };

    /// Create a node whose accumulated cost is not known yet.
    pub fn new(qu_id: i32, ref_id: i32, idv_cost: f64) -> Self {
        Self {
            qu_id,
            ref_id,
            idv_cost,
            acc_cost: f64::INFINITY,
        }
    }

    /// Builder-style accumulated cost
    pub fn with_acc_cost(mut self, acc_cost: f64) -> Self {
        self.acc_cost = acc_cost;
        self
    }

    /// Coordinate key
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.qu_id, self.ref_id)
    }

    /// Whether this is the source sentinel
    pub fn is_source(&self) -> bool {
        *self == Self::SOURCE
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.qu_id == other.qu_id && self.ref_id == other.ref_id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .acc_cost
            .partial_cmp(&self.acc_cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.key().cmp(&self.key()))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) idv={:.5} acc={:.5}",
            self.qu_id, self.ref_id, self.idv_cost, self.acc_cost
        )
    }
}
