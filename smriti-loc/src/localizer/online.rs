//! Online sequence-to-sequence localization.
//!
//! Matches every query image against the reference sequence by growing a
//! shortest-path search over the query × reference grid. The search is
//! incremental: each query image extends the graph by one row.
//!
//! # Per-image pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │ State check  │───►│ Match image      │───►│ Loss check   │
//! │ (q=0 → Lost) │    │ (track/relocate) │    │ (last 5 hid.)│
//! └──────────────┘    └──────────────────┘    └──────────────┘
//! ```
//!
//! # Tracking states
//!
//! ```text
//!                    > 80% of the last 5 steps hidden
//!    ┌──────────┐ ───────────────────────────────────► ┌──────────┐
//!    │ Tracking │                                      │   Lost   │
//!    └──────────┘ ◄─────────────────────────────────── └──────────┘
//!                  relocalized path is mostly matched
//! ```
//!
//! While tracking, the frontier is expanded cheapest-first until a node of
//! the previous query row has been expanded. Nodes whose optimistic cost
//! estimate cannot beat the current hypothesis are skipped. While lost, the
//! frontier is discarded and the relocalizer proposes where to continue.

use std::collections::{BinaryHeap, HashMap};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::{debug, info, warn};

use super::config::LocalizerConfig;
use super::observer::LocalizationObserver;
use crate::core::{Node, NodeKey, NodeSet, NodeState, PathElement};
use crate::error::{LocError, Result};
use crate::successor::SuccessorManager;

/// Search state of the localizer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingState {
    /// Following the path through the fan-out windows
    Tracking,
    /// Path quality degraded; the next image triggers relocalization
    Lost,
}

/// Predecessor and accumulated cost of a visited node.
///
/// Kept together so a relaxation updates both at once.
#[derive(Clone, Copy, Debug)]
struct GraphEntry {
    pred: Node,
    acc_cost: f64,
}

/// Online localizer over a query × reference cost grid.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use smriti_loc::localizer::{LocalizerConfig, OnlineLocalizer};
/// use smriti_loc::oracle::{CostMatrix, Relocalizer};
/// use smriti_loc::successor::SuccessorManager;
///
/// struct StartAtZero;
/// impl Relocalizer for StartAtZero {
///     fn candidates(&self, _qu_id: usize) -> smriti_loc::Result<Vec<usize>> {
///         Ok(vec![0])
///     }
/// }
///
/// let costs = CostMatrix::from_rows(vec![
///     vec![1.0, 9.0, 9.0],
///     vec![9.0, 1.0, 9.0],
///     vec![9.0, 9.0, 1.0],
/// ])?;
/// let manager = SuccessorManager::new(Arc::new(costs), 1)
///     .with_relocalizer(Arc::new(StartAtZero));
/// let mut localizer = OnlineLocalizer::new(manager, LocalizerConfig::new(3, 0.0, 5.0))?;
///
/// localizer.run()?;
/// let path = localizer.current_path()?;
/// assert_eq!(path.len(), 3);
/// assert_eq!((path[0].qu_id, path[0].ref_id), (2, 2));
/// # Ok::<(), smriti_loc::LocError>(())
/// ```
pub struct OnlineLocalizer {
    config: LocalizerConfig,
    successors: SuccessorManager,

    /// Min-heap on accumulated cost; may hold stale entries after relaxation
    frontier: BinaryHeap<Node>,
    graph: HashMap<NodeKey, GraphEntry>,
    best: Node,
    state: TrackingState,

    /// Nodes generated while matching the latest image
    expanded_recently: NodeSet,
    expansions: usize,
    observer: Option<Box<dyn LocalizationObserver>>,
}

impl OnlineLocalizer {
    /// Create a localizer seeded with the source node.
    ///
    /// Returns a configuration error for out-of-range parameters.
    pub fn new(successors: SuccessorManager, config: LocalizerConfig) -> Result<Self> {
        config.validate()?;

        let mut graph = HashMap::new();
        graph.insert(
            Node::SOURCE.key(),
            GraphEntry {
                pred: Node::SOURCE,
                acc_cost: 0.0,
            },
        );
        let mut frontier = BinaryHeap::new();
        frontier.push(Node::SOURCE);

        info!(
            "[OnlineLocalizer] Created: fan_out={}, expansion_rate={}, non_match_cost={}",
            successors.fan_out(),
            config.expansion_rate,
            config.non_match_cost
        );

        Ok(Self {
            config,
            successors,
            frontier,
            graph,
            best: Node::SOURCE,
            state: TrackingState::Lost,
            expanded_recently: NodeSet::new(),
            expansions: 0,
            observer: None,
        })
    }

    /// Attach an observer notified after every processed image
    pub fn with_observer(mut self, observer: Box<dyn LocalizationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Process all `query_size` query images in order.
    pub fn run(&mut self) -> Result<()> {
        if self.config.query_size == 0 {
            return Err(LocError::NotReady("query_size is 0".to_string()));
        }
        if !self.successors.has_relocalizer() {
            return Err(LocError::NotReady(
                "successor manager has no relocalizer".to_string(),
            ));
        }

        let start = Instant::now();
        for qu_id in 0..self.config.query_size {
            self.process_image(qu_id)?;
        }
        info!(
            "[OnlineLocalizer] Localized {} images in {:.1}ms",
            self.config.query_size,
            start.elapsed().as_secs_f64() * 1000.0
        );

        if let Some(observer) = self.observer.as_mut() {
            observer.on_finished()?;
        }
        Ok(())
    }

    /// Extend the search by query image `qu_id`.
    ///
    /// Images must be fed in order starting at 0. Image 0 always starts from
    /// relocalization.
    pub fn process_image(&mut self, qu_id: usize) -> Result<()> {
        let start = Instant::now();
        if qu_id == 0 {
            self.state = TrackingState::Lost;
        }

        self.match_image(qu_id)?;
        if self.frontier.is_empty() {
            return Err(LocError::EmptyFrontier { qu_id });
        }

        let lost = self.is_lost(self.config.sliding_window, self.config.lost_ratio)?;
        let next = if lost {
            TrackingState::Lost
        } else {
            TrackingState::Tracking
        };
        if next != self.state {
            info!(
                "[OnlineLocalizer] Query {}: {:?} -> {:?}",
                qu_id, self.state, next
            );
        }
        self.state = next;

        debug!(
            "[OnlineLocalizer] Query {} matched to reference {} in {:.2}ms (expanded={}, frontier={})",
            qu_id,
            self.best.ref_id,
            start.elapsed().as_secs_f64() * 1000.0,
            self.expansions,
            self.frontier.len()
        );

        self.notify(qu_id)
    }

    fn match_image(&mut self, qu_id: usize) -> Result<()> {
        self.expanded_recently.clear();
        self.expansions = 0;
        match self.state {
            TrackingState::Lost => self.relocalize(qu_id),
            TrackingState::Tracking => self.track(qu_id),
        }
    }

    /// Restart the path from the relocalizer's proposal
    fn relocalize(&mut self, qu_id: usize) -> Result<()> {
        debug!("[OnlineLocalizer] Relocalizing query {}", qu_id);
        self.frontier.clear();

        let parent = self.best;
        let parent_acc = self.recorded_acc(&parent);
        let children: NodeSet = self
            .successors
            .successors_if_lost(&parent)?
            .into_iter()
            .map(|child| child.with_acc_cost(parent_acc + child.idv_cost))
            .collect();

        self.update_search(&children);

        let chosen = self.best;
        let single: NodeSet = std::iter::once(chosen).collect();
        let pushed = self.update_graph(&parent, &single);
        let chosen_acc = self.recorded_acc(&chosen);
        if pushed == 0 {
            // Already visited with a cheaper path; continue from there
            self.frontier.push(chosen.with_acc_cost(chosen_acc));
        }
        self.best.acc_cost = chosen_acc;
        self.expanded_recently = single;
        Ok(())
    }

    /// Expand the frontier until the previous query row has been expanded
    fn track(&mut self, qu_id: usize) -> Result<()> {
        let target_row = qu_id as i32 - 1;

        while let Some(node) = self.frontier.pop() {
            if node.qu_id > target_row {
                return Err(LocError::RowOvershoot {
                    node_qu: node.qu_id,
                    node_ref: node.ref_id,
                    qu_id,
                });
            }
            // Stale entry superseded by a relaxation
            if node.acc_cost > self.recorded_acc(&node) {
                continue;
            }
            if !self.node_worth_expanding(&node)? {
                continue;
            }

            self.expansions += 1;
            let children = self.successors.successors(&node)?;
            self.update_graph(&node, &children);
            self.update_search(&children);
            self.expanded_recently.extend(children);

            if node.qu_id == target_row {
                return Ok(());
            }
        }
        Ok(())
    }

    /// Record `children` as successors of `parent`.
    ///
    /// New nodes are added to the graph and frontier. Known nodes are relaxed
    /// when the path through `parent` is cheaper. Returns the number of nodes
    /// pushed to the frontier.
    pub fn update_graph(&mut self, parent: &Node, children: &NodeSet) -> usize {
        if children.is_empty() {
            warn!(
                "[OnlineLocalizer] Node ({}, {}) has no successors",
                parent.qu_id, parent.ref_id
            );
            return 0;
        }

        let parent_acc = self.recorded_acc(parent);
        let parent = parent.with_acc_cost(parent_acc);
        let mut pushed = 0;
        for child in children {
            let acc_cost = parent_acc + child.idv_cost;
            match self.graph.get_mut(&child.key()) {
                Some(entry) => {
                    if acc_cost < entry.acc_cost {
                        debug!(
                            "[OnlineLocalizer] Relaxed ({}, {}): {:.4} -> {:.4}",
                            child.qu_id, child.ref_id, entry.acc_cost, acc_cost
                        );
                        entry.pred = parent;
                        entry.acc_cost = acc_cost;
                        self.frontier.push(child.with_acc_cost(acc_cost));
                        pushed += 1;
                    }
                }
                None => {
                    self.graph.insert(
                        child.key(),
                        GraphEntry {
                            pred: parent,
                            acc_cost,
                        },
                    );
                    self.frontier.push(child.with_acc_cost(acc_cost));
                    pushed += 1;
                }
            }
        }
        pushed
    }

    /// Promote the most prominent of `children` to the best hypothesis.
    ///
    /// A hypothesis on a later query row always wins; on the same row it wins
    /// when its accumulated cost is not higher.
    pub fn update_search(&mut self, children: &NodeSet) {
        let Some(candidate) = Self::prominent_successor(children) else {
            return;
        };
        let candidate = candidate.with_acc_cost(self.recorded_acc(&candidate));

        if candidate.qu_id > self.best.qu_id
            || (candidate.qu_id == self.best.qu_id
                && candidate.acc_cost <= self.recorded_acc(&self.best))
        {
            self.best = candidate;
        }
    }

    /// Child with the smallest individual cost (first one on ties)
    pub fn prominent_successor(children: &NodeSet) -> Option<Node> {
        children.iter().fold(None, |best: Option<Node>, child| match best {
            Some(b) if !(child.idv_cost < b.idv_cost) => Some(b),
            _ => Some(*child),
        })
    }

    /// Whether `node` has been added to the graph
    pub fn pred_exists(&self, node: &Node) -> bool {
        self.graph.contains_key(&node.key())
    }

    /// Recorded predecessor of `node`
    pub fn predecessor(&self, node: &Node) -> Option<Node> {
        self.graph.get(&node.key()).map(|entry| entry.pred)
    }

    /// Recorded accumulated cost of `node`
    pub fn accumulated_cost(&self, node: &Node) -> Option<f64> {
        self.graph.get(&node.key()).map(|entry| entry.acc_cost)
    }

    /// Whether expanding `node` can still lead to a better hypothesis.
    ///
    /// The source and the current hypothesis are always worth expanding.
    /// Otherwise the node's cost is extended by the mean step cost of the
    /// current path over the rows it lags behind, scaled by the expansion
    /// rate, and compared to the hypothesis cost.
    pub fn node_worth_expanding(&self, node: &Node) -> Result<bool> {
        if node.is_source() || *node == self.best {
            return Ok(true);
        }
        let row_dist = self.best.qu_id - node.qu_id;
        if row_dist < 0 {
            return Err(LocError::NodeAheadOfHypothesis {
                node_qu: node.qu_id,
                best_qu: self.best.qu_id,
            });
        }

        let mean_cost = self.average_path_cost()?;
        let potential =
            node.acc_cost + row_dist as f64 * mean_cost * self.config.expansion_rate;
        Ok(potential < self.recorded_acc(&self.best))
    }

    /// Mean individual cost along the current path (0 before the first image)
    pub fn average_path_cost(&self) -> Result<f64> {
        let nodes = self.backtrack(None)?;
        if nodes.is_empty() {
            return Ok(0.0);
        }
        let total: f64 = nodes.iter().map(|n| n.idv_cost).sum();
        Ok(total / nodes.len() as f64)
    }

    /// Best path, newest element first
    pub fn current_path(&self) -> Result<Vec<PathElement>> {
        self.backtrack(None).map(|nodes| self.to_elements(&nodes))
    }

    /// The `n` newest path elements, newest first
    pub fn last_n_matches(&self, n: usize) -> Result<Vec<PathElement>> {
        self.backtrack(Some(n)).map(|nodes| self.to_elements(&nodes))
    }

    /// Whether more than `ratio` of the last `n` path elements are hidden.
    ///
    /// Paths shorter than `n` are never lost.
    pub fn is_lost(&self, n: usize, ratio: f64) -> Result<bool> {
        let matches = self.last_n_matches(n)?;
        if matches.len() < n || matches.is_empty() {
            return Ok(false);
        }
        let hidden = matches.iter().filter(|m| m.is_hidden()).count();
        Ok(hidden as f64 / matches.len() as f64 > ratio)
    }

    /// Write the current path, one `qu_id ref_id state` line per element,
    /// newest first
    pub fn write_path<W: Write>(&self, writer: &mut W) -> Result<()> {
        for element in self.current_path()? {
            writeln!(writer, "{}", element)?;
        }
        Ok(())
    }

    /// Save the current path to a text file
    pub fn save_path(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_path(&mut writer)?;
        writer.flush()?;
        info!("[OnlineLocalizer] Path written to {}", path.display());
        Ok(())
    }

    /// Current best hypothesis
    pub fn best_hypothesis(&self) -> Node {
        self.best
    }

    /// Current tracking state
    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// Nodes generated while matching the latest image
    pub fn expanded_recently(&self) -> &NodeSet {
        &self.expanded_recently
    }

    /// Frontier nodes expanded while tracking the latest image
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    /// Number of frontier entries, stale ones included
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Localizer configuration
    pub fn config(&self) -> &LocalizerConfig {
        &self.config
    }

    fn notify(&mut self, qu_id: usize) -> Result<()> {
        if self.observer.is_none() {
            return Ok(());
        }
        let mut path = self.current_path()?;
        path.reverse();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_image(qu_id, &self.expanded_recently, &path)?;
        }
        Ok(())
    }

    fn recorded_acc(&self, node: &Node) -> f64 {
        self.accumulated_cost(node).unwrap_or(node.acc_cost)
    }

    /// Walk predecessors from the hypothesis back to the source
    fn backtrack(&self, limit: Option<usize>) -> Result<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut current = self.best;
        while !current.is_source() && limit.is_none_or(|n| nodes.len() < n) {
            let entry = self
                .graph
                .get(&current.key())
                .ok_or(LocError::MissingPredecessor {
                    qu_id: current.qu_id,
                    ref_id: current.ref_id,
                })?;
            nodes.push(current);
            current = entry.pred;
        }
        Ok(nodes)
    }

    fn to_elements(&self, nodes: &[Node]) -> Vec<PathElement> {
        nodes
            .iter()
            .map(|n| {
                PathElement::new(
                    n.qu_id,
                    n.ref_id,
                    NodeState::classify(n.idv_cost, self.config.non_match_cost),
                )
            })
            .collect()
    }
}
