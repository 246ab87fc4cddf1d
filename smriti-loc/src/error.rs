//! Error types for smriti-loc

/// Result type alias
pub type Result<T> = std::result::Result<T, LocError>;

/// Localization error types
#[derive(Debug, thiserror::Error)]
pub enum LocError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input file
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Localizer was run without required parameters
    #[error("Localizer not ready: {0}")]
    NotReady(String),

    /// Nothing left to grow the search from
    #[error("Frontier is empty after matching query image {qu_id}")]
    EmptyFrontier {
        /// Query image being processed
        qu_id: usize,
    },

    /// A node beyond the processed query row was popped from the frontier
    #[error("Expanded node ({node_qu}, {node_ref}) lies beyond query image {qu_id}")]
    RowOvershoot {
        /// Row of the popped node
        node_qu: i32,
        /// Column of the popped node
        node_ref: i32,
        /// Query image being processed
        qu_id: usize,
    },

    /// A node lies further in the future than the best hypothesis
    #[error("Node at row {node_qu} is ahead of the best hypothesis at row {best_qu}")]
    NodeAheadOfHypothesis {
        /// Row of the examined node
        node_qu: i32,
        /// Row of the current best hypothesis
        best_qu: i32,
    },

    /// Normal-mode expansion requested for the source node
    #[error("Source node cannot be expanded in tracking mode; relocalize first")]
    SourceExpansion,

    /// Node coordinates outside the cost grid
    #[error("Invalid node coordinates ({qu_id}, {ref_id})")]
    InvalidNode {
        /// Query coordinate
        qu_id: i32,
        /// Reference coordinate
        ref_id: i32,
    },

    /// Lost-mode expansion without a relocalizer
    #[error("Relocalizer is not set")]
    MissingRelocalizer,

    /// Path backtracking hit a node without a recorded predecessor
    #[error("No predecessor recorded for node ({qu_id}, {ref_id})")]
    MissingPredecessor {
        /// Query coordinate
        qu_id: i32,
        /// Reference coordinate
        ref_id: i32,
    },

    /// Cost lookup outside the oracle's grid
    #[error("Cost requested outside the grid at ({qu_id}, {ref_id})")]
    CostOutOfRange {
        /// Query index
        qu_id: usize,
        /// Reference index
        ref_id: usize,
    },

    /// Hash index built from no features
    #[error("Cannot build a hash index from an empty feature set")]
    EmptyFeatureSet,

    /// Hash index has no populated dimension
    #[error("Hash index is empty")]
    EmptyIndex,

    /// Bit vectors of different lengths in one feature set
    #[error("Feature {id} has {found} bits, expected {expected}")]
    FeatureLengthMismatch {
        /// Offending feature id
        id: usize,
        /// Length of the first feature
        expected: usize,
        /// Length of the offending feature
        found: usize,
    },

    /// Formatting a rendered document failed
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),

    /// Query issued before `weight_index`
    #[error("IDF weights were not computed; call weight_index first")]
    WeightsNotComputed,

    /// Relocalizer has no bit vector for the requested query image
    #[error("No query feature for image {0}")]
    MissingQueryFeature(usize),
}

impl From<serde_yaml::Error> for LocError {
    fn from(e: serde_yaml::Error) -> Self {
        LocError::Config(e.to_string())
    }
}
