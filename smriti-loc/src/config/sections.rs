//! Configuration sections.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::localizer::LocalizerConfig;

/// Input data locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataSection {
    /// Query × reference cost matrix (one row per query image)
    #[serde(default = "defaults::costs")]
    pub costs: PathBuf,

    /// Query bit vectors, one per line, used by the hashing relocalizer
    #[serde(default = "defaults::query_features")]
    pub query_features: PathBuf,

    /// Reference bit vectors to build the hash index from
    #[serde(default)]
    pub reference_features: Option<PathBuf>,

    /// Prebuilt hash index (takes precedence over `reference_features`)
    #[serde(default)]
    pub hash_table: Option<PathBuf>,

    /// Similar places of the reference trajectory
    #[serde(default)]
    pub similar_places: Option<PathBuf>,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            costs: defaults::costs(),
            query_features: defaults::query_features(),
            reference_features: None,
            hash_table: None,
            similar_places: None,
        }
    }
}

/// Search parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchSection {
    /// Reference displacement allowed per query step
    #[serde(default = "defaults::fan_out")]
    pub fan_out: usize,

    /// Frontier pruning aggressiveness (0 = exhaustive)
    #[serde(default = "defaults::expansion_rate")]
    pub expansion_rate: f64,

    /// Cost above which a match is considered hidden
    #[serde(default = "defaults::non_match_cost")]
    pub non_match_cost: f64,

    /// Path steps inspected by the loss heuristic
    #[serde(default = "defaults::sliding_window")]
    pub sliding_window: usize,

    /// Hidden fraction above which tracking is lost
    #[serde(default = "defaults::lost_ratio")]
    pub lost_ratio: f64,

    /// Number of query images to process (0 = all rows of the cost matrix)
    #[serde(default)]
    pub query_size: usize,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            fan_out: defaults::fan_out(),
            expansion_rate: defaults::expansion_rate(),
            non_match_cost: defaults::non_match_cost(),
            sliding_window: defaults::sliding_window(),
            lost_ratio: defaults::lost_ratio(),
            query_size: 0,
        }
    }
}

impl SearchSection {
    /// Localizer config, falling back to `available_queries` when
    /// `query_size` is unset
    pub fn to_localizer_config(&self, available_queries: usize) -> LocalizerConfig {
        let query_size = if self.query_size == 0 {
            available_queries
        } else {
            self.query_size
        };
        LocalizerConfig {
            query_size,
            expansion_rate: self.expansion_rate,
            non_match_cost: self.non_match_cost,
            sliding_window: self.sliding_window,
            lost_ratio: self.lost_ratio,
        }
    }
}

/// Output locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputSection {
    /// Matched path, one `qu_id ref_id state` line per query image
    #[serde(default = "defaults::path_file")]
    pub path_file: PathBuf,

    /// Optional SVG rendering of the search
    #[serde(default)]
    pub svg_file: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path_file: defaults::path_file(),
            svg_file: None,
        }
    }
}
