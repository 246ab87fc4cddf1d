//! Test utilities for smriti-loc.
//!
//! Synthetic cost matrices, feature sets and relocalizers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use smriti_loc::{
    BinaryFeature, CostMatrix, LocalizationObserver, LocalizerConfig, NodeSet, OnlineLocalizer,
    PathElement, Relocalizer, Result, SuccessorManager,
};

/// Relocalizer returning the same candidates for every query image.
pub struct FixedCandidates(pub Vec<usize>);

impl Relocalizer for FixedCandidates {
    fn candidates(&self, _qu_id: usize) -> Result<Vec<usize>> {
        Ok(self.0.clone())
    }
}

/// 4 × 10 matrix whose cheapest path is (0,0) (1,0) (2,1) (3,2).
///
/// (0,0) costs 6.5 and is hidden under a 6.0 non-match threshold.
pub fn staircase_costs() -> CostMatrix {
    let mut costs = CostMatrix::filled(4, 10, 10.0);
    for (q, r, c) in [
        (0, 0, 6.5),
        (1, 0, 5.0),
        (1, 1, 7.0),
        (2, 0, 8.0),
        (2, 1, 5.5),
        (2, 2, 9.0),
        (3, 0, 9.0),
        (3, 1, 7.5),
        (3, 2, 5.2),
    ] {
        costs.set(q, r, c).unwrap();
    }
    costs
}

/// Features over `n + 1` bits where feature `i` has bits `i` and `i + 1` set.
pub fn sliding_pair_features(n: usize) -> Vec<BinaryFeature> {
    (0..n)
        .map(|i| {
            let mut bits = vec![false; n + 1];
            bits[i] = true;
            bits[i + 1] = true;
            BinaryFeature::new(i, bits)
        })
        .collect()
}

/// Localizer over `costs` with a fixed relocalizer answer
pub fn localizer(
    costs: CostMatrix,
    fan_out: usize,
    candidates: Vec<usize>,
    config: LocalizerConfig,
) -> OnlineLocalizer {
    let manager = SuccessorManager::new(Arc::new(costs), fan_out)
        .with_relocalizer(Arc::new(FixedCandidates(candidates)));
    OnlineLocalizer::new(manager, config).unwrap()
}

/// What a [`Recorder`] saw during a run
#[derive(Default)]
pub struct Recording {
    pub images: Vec<usize>,
    pub expanded: Vec<usize>,
    pub last_path: Vec<PathElement>,
    pub finished: bool,
}

/// Observer keeping every notification in a shared [`Recording`]
pub struct Recorder(pub Rc<RefCell<Recording>>);

impl LocalizationObserver for Recorder {
    fn on_image(&mut self, qu_id: usize, expanded: &NodeSet, path: &[PathElement]) -> Result<()> {
        let mut recording = self.0.borrow_mut();
        recording.images.push(qu_id);
        recording.expanded.push(expanded.len());
        recording.last_path = path.to_vec();
        Ok(())
    }

    fn on_finished(&mut self) -> Result<()> {
        self.0.borrow_mut().finished = true;
        Ok(())
    }
}
