//! # Smriti
//!
//! Online sequence-to-sequence visual localization across seasonal change.
//!
//! ## Overview
//!
//! A robot driving a route again (the query sequence) is matched image by
//! image against an earlier drive of the same route (the reference
//! sequence). Matching is a shortest-path search over the query × reference
//! grid where each cell costs the dissimilarity of the two images:
//!
//! - **Tracking** - the path advances one query row at a time within a
//!   fan-out window around the previous reference match
//! - **Loss detection** - a path whose recent steps are mostly hidden
//!   (above the non-match cost) is declared lost
//! - **Relocalization** - when lost, an inverted index over binary feature
//!   dimensions proposes where the path continues
//!
//! ## Features
//!
//! - **Incremental search**: one query row per call, cheapest-first with pruning
//! - **Similar places**: reference loops branch the search to every revisit
//! - **Dimensions hashing**: IDF-weighted inverted index for candidate retrieval
//! - **Visualization**: SVG rendering of the explored grid and final path
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use smriti_loc::{CostMatrix, DimensionsHashing, LocalizerConfig, OnlineLocalizer, SuccessorManager};
//!
//! let costs = Arc::new(CostMatrix::load(Path::new("costs.txt"))?);
//! let mut hashing = DimensionsHashing::build(&reference_features)?
//!     .with_query_features(query_features);
//!
//! let manager = SuccessorManager::new(costs.clone(), 2)
//!     .with_relocalizer(Arc::new(hashing));
//! let config = LocalizerConfig::new(costs.query_size(), 0.3, 3.0);
//! let mut localizer = OnlineLocalizer::new(manager, config)?;
//!
//! localizer.run()?;
//! localizer.save_path(Path::new("matched_path.txt"))?;
//! ```
//!
//! ## Grid Convention
//!
//! - Rows: query image ids, starting at 0
//! - Columns: reference image ids, starting at 0
//! - The source node sits at row -1 and precedes every path

#![warn(missing_docs)]

// Graph nodes, node sets and path elements
pub mod core;

// Cost and relocalization capabilities
pub mod oracle;

// Binary feature vectors
pub mod features;

// Relocalization strategies
pub mod relocalization;

// Successor generation
pub mod successor;

// Online search
pub mod localizer;

// Application configuration
pub mod config;

// Path files and visualization
pub mod io;

mod error;

// Re-export commonly used types
pub use core::{Node, NodeKey, NodeSet, NodeState, PathElement};
pub use error::{LocError, Result};
pub use features::{BinaryFeature, load_bit_vectors};
pub use localizer::{LocalizationObserver, LocalizerConfig, OnlineLocalizer, TrackingState};
pub use oracle::{CostMatrix, CostOracle, Relocalizer};
pub use relocalization::DimensionsHashing;
pub use successor::{SimilarPlaces, SuccessorManager};
