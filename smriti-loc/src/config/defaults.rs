//! Default value functions for serde deserialization.

use std::path::PathBuf;

pub fn costs() -> PathBuf {
    PathBuf::from("data/costs.txt")
}

pub fn query_features() -> PathBuf {
    PathBuf::from("data/query_bits.txt")
}

pub fn fan_out() -> usize {
    2
}

pub fn expansion_rate() -> f64 {
    0.3
}

pub fn non_match_cost() -> f64 {
    3.0
}

pub fn sliding_window() -> usize {
    5
}

pub fn lost_ratio() -> f64 {
    0.8
}

pub fn path_file() -> PathBuf {
    PathBuf::from("matched_path.txt")
}
