//! Resolved path steps.

use std::fmt;

/// Whether a path step is a confident match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// Edge cost above the non-match threshold: no reliable match
    Hidden,
    /// Confident match
    Real,
}

impl NodeState {
    /// Classify an edge cost against the non-match threshold
    pub fn classify(idv_cost: f64, non_match_cost: f64) -> Self {
        if idv_cost > non_match_cost {
            NodeState::Hidden
        } else {
            NodeState::Real
        }
    }

    /// Status code used in path files (0 = hidden, 1 = real)
    pub fn code(self) -> u8 {
        match self {
            NodeState::Hidden => 0,
            NodeState::Real => 1,
        }
    }
}

/// One step of the resolved path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathElement {
    /// Query image index
    pub qu_id: i32,
    /// Matched reference image index
    pub ref_id: i32,
    /// Match confidence
    pub state: NodeState,
}

impl PathElement {
    /// Create a new path element
    pub fn new(qu_id: i32, ref_id: i32, state: NodeState) -> Self {
        Self {
            qu_id,
            ref_id,
            state,
        }
    }

    /// Whether the step is hidden
    pub fn is_hidden(&self) -> bool {
        self.state == NodeState::Hidden
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.qu_id, self.ref_id, self.state.code())
    }
}
