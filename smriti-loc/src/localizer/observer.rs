//! Hook for consumers that follow the search as it runs.

use crate::core::{NodeSet, PathElement};
use crate::error::Result;

/// Receives the search state after every processed query image.
pub trait LocalizationObserver {
    /// Called after query image `qu_id` was matched.
    ///
    /// `expanded` holds the nodes generated while matching this image and
    /// `path` is the current best path in chronological order (oldest first).
    fn on_image(&mut self, qu_id: usize, expanded: &NodeSet, path: &[PathElement]) -> Result<()>;

    /// Called once after `run` processed the last query image
    fn on_finished(&mut self) -> Result<()> {
        Ok(())
    }
}
