//! Application configuration for the matching tools.
//!
//! Loads everything from a single YAML file with sensible defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smriti_loc::config::SmritiConfig;
//!
//! // Load from default path (configs/smriti.yaml)
//! let config = SmritiConfig::load_default()?;
//!
//! // Localizer parameters for a cost matrix with 500 query rows
//! let localizer_config = config.search.to_localizer_config(500);
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`DataSection`] | Cost matrix, bit vectors, hash index, similar places |
//! | [`SearchSection`] | Fan-out, expansion rate, non-match cost, loss detection |
//! | [`OutputSection`] | Path file and optional SVG |
//!
//! ## Example YAML
//!
//! ```yaml
//! data:
//!   costs: data/costs.txt
//!   query_features: data/query_bits.txt
//!   hash_table: data/hash_table.txt
//!   similar_places: data/similar_places.txt   # optional
//!
//! search:
//!   fan_out: 2
//!   expansion_rate: 0.3     # 0 = exhaustive
//!   non_match_cost: 3.0
//!
//! output:
//!   path_file: matched_path.txt
//!   svg_file: search.svg    # optional
//! ```

mod defaults;
mod sections;
mod smriti;

pub use sections::{DataSection, OutputSection, SearchSection};
pub use smriti::SmritiConfig;
