//! Successor generation for the localization graph.

use std::sync::Arc;

use log::{debug, warn};

use super::similar_places::SimilarPlaces;
use crate::core::{Node, NodeSet};
use crate::error::{LocError, Result};
use crate::oracle::{CostOracle, Relocalizer};

/// Produces the children of a graph vertex.
///
/// In tracking mode a vertex `(q, r)` connects to every reference image within
/// `fan_out` of `r` on the next query row, plus the same window around each
/// registered alias of `r`. When lost, the relocalizer proposes the children
/// instead.
pub struct SuccessorManager {
    costs: Arc<dyn CostOracle>,
    relocalizer: Option<Arc<dyn Relocalizer>>,
    similar_places: SimilarPlaces,
    fan_out: usize,
}

impl SuccessorManager {
    /// Create a manager over a cost oracle.
    ///
    /// `fan_out` bounds the reference displacement per query step and models
    /// speed differences between the two traversals. Zero only models a
    /// camera standing still in the reference frame.
    pub fn new(costs: Arc<dyn CostOracle>, fan_out: usize) -> Self {
        if fan_out == 0 {
            warn!(
                "[SuccessorManager] Fan-out is 0: only a camera staying at its reference frame can be modeled"
            );
        }
        Self {
            costs,
            relocalizer: None,
            similar_places: SimilarPlaces::new(),
            fan_out,
        }
    }

    /// Attach the relocalizer used when lost
    pub fn with_relocalizer(mut self, relocalizer: Arc<dyn Relocalizer>) -> Self {
        self.relocalizer = Some(relocalizer);
        self
    }

    /// Attach similar places of the reference trajectory
    pub fn with_similar_places(mut self, similar_places: SimilarPlaces) -> Self {
        self.similar_places = similar_places;
        self
    }

    /// Fan-out window half-width
    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// Whether a relocalizer is attached
    pub fn has_relocalizer(&self) -> bool {
        self.relocalizer.is_some()
    }

    /// Number of reference images
    pub fn ref_size(&self) -> usize {
        self.costs.ref_size()
    }

    /// Children of `node` in tracking mode.
    ///
    /// The source node has no tracking-mode children; the first query image
    /// must go through [`successors_if_lost`](Self::successors_if_lost).
    pub fn successors(&self, node: &Node) -> Result<NodeSet> {
        if node.is_source() {
            return Err(LocError::SourceExpansion);
        }
        if node.qu_id < 0 || node.ref_id < 0 {
            return Err(LocError::InvalidNode {
                qu_id: node.qu_id,
                ref_id: node.ref_id,
            });
        }

        let mut children = NodeSet::new();
        self.fan_out_window(node.qu_id, node.ref_id as usize, &mut children)?;

        for alias in self.similar_places.aliases(node.ref_id as usize) {
            self.fan_out_window(node.qu_id, alias, &mut children)?;
        }
        Ok(children)
    }

    /// Children of `node` when the search has lost track.
    ///
    /// Asks the relocalizer about the next query image. Without candidates the
    /// robot may still be at the same place, so the only child keeps `ref_id`.
    pub fn successors_if_lost(&self, node: &Node) -> Result<NodeSet> {
        let relocalizer = self
            .relocalizer
            .as_ref()
            .ok_or(LocError::MissingRelocalizer)?;
        let child_qu = node.qu_id + 1;
        if child_qu < 0 || node.ref_id < 0 {
            return Err(LocError::InvalidNode {
                qu_id: node.qu_id,
                ref_id: node.ref_id,
            });
        }

        let candidates = relocalizer.candidates(child_qu as usize)?;
        let mut children = NodeSet::new();
        if candidates.is_empty() {
            debug!(
                "[SuccessorManager] No candidates for query {}, staying at reference {}",
                child_qu, node.ref_id
            );
            children.insert(self.child(child_qu, node.ref_id as usize)?);
        } else {
            for ref_id in candidates {
                children.insert(self.child(child_qu, ref_id)?);
            }
        }
        Ok(children)
    }

    /// Window `[ref_id - fan_out, ref_id + fan_out]` clamped to the reference
    /// sequence, on row `qu_id + 1`
    fn fan_out_window(&self, qu_id: i32, ref_id: usize, children: &mut NodeSet) -> Result<()> {
        let ref_size = self.costs.ref_size();
        if ref_size == 0 {
            return Ok(());
        }
        let left = ref_id.saturating_sub(self.fan_out);
        let right = ref_id.saturating_add(self.fan_out).min(ref_size - 1);

        for succ_ref in left..=right {
            children.insert(self.child(qu_id + 1, succ_ref)?);
        }
        Ok(())
    }

    fn child(&self, qu_id: i32, ref_id: usize) -> Result<Node> {
        let cost = self.costs.cost(qu_id as usize, ref_id)?;
        Ok(Node::new(qu_id, ref_id as i32, cost))
    }
}
