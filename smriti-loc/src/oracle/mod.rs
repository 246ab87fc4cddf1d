//! Capabilities consumed by the search: matching costs and relocalization
//! candidates.
//!
//! The localizer never looks at images or features. It only asks a
//! [`CostOracle`] for the cost of pairing a query image with a reference
//! image, and a [`Relocalizer`] for plausible reference images when it has
//! lost track.

mod cost_matrix;

pub use cost_matrix::CostMatrix;

use crate::error::Result;

/// Source of query × reference matching costs.
///
/// Smaller costs mean more similar images; `f64::INFINITY` means no match.
/// Costs must be deterministic for a given pair within one run.
pub trait CostOracle {
    /// Number of images in the reference sequence
    fn ref_size(&self) -> usize;

    /// Matching cost between query image `qu_id` and reference image `ref_id`
    fn cost(&self, qu_id: usize, ref_id: usize) -> Result<f64>;
}

/// Candidate retrieval used to recover from tracking loss.
///
/// An empty candidate list is a valid "nothing found" answer.
pub trait Relocalizer {
    /// Reference ids that may match query image `qu_id`
    fn candidates(&self, qu_id: usize) -> Result<Vec<usize>>;
}
