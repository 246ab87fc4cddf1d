//! Localizer parameters.

use serde::{Deserialize, Serialize};

use crate::error::{LocError, Result};

/// Configuration for the online localizer.
///
/// # Example
///
/// ```rust
/// use smriti_loc::localizer::LocalizerConfig;
///
/// let config = LocalizerConfig {
///     sliding_window: 8,        // look further back before declaring loss
///     ..LocalizerConfig::new(120, 0.3, 3.5)
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalizerConfig {
    /// Number of query images processed by `run`.
    ///
    /// Zero is allowed when images are fed manually through `process_image`.
    #[serde(default)]
    pub query_size: usize,

    /// Pruning aggressiveness of the frontier expansion, in `[0, ∞)`.
    ///
    /// 0 expands everything reachable; larger values prune harder and run
    /// faster.
    pub expansion_rate: f64,

    /// Matching cost above which a step is considered hidden (no match).
    pub non_match_cost: f64,

    /// Number of most recent path steps inspected by the loss heuristic.
    /// Default: 5
    #[serde(default = "default_sliding_window")]
    pub sliding_window: usize,

    /// Fraction of hidden steps in the window above which tracking is lost.
    /// Default: 0.8
    #[serde(default = "default_lost_ratio")]
    pub lost_ratio: f64,
}

fn default_sliding_window() -> usize {
    5
}
fn default_lost_ratio() -> f64 {
    0.8
}

impl LocalizerConfig {
    /// Create a config with default loss detection parameters
    pub fn new(query_size: usize, expansion_rate: f64, non_match_cost: f64) -> Self {
        Self {
            query_size,
            expansion_rate,
            non_match_cost,
            sliding_window: default_sliding_window(),
            lost_ratio: default_lost_ratio(),
        }
    }

    /// Check parameter ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.expansion_rate >= 0.0) {
            return Err(LocError::Config(format!(
                "expansion_rate must be >= 0, got {}",
                self.expansion_rate
            )));
        }
        if !(self.non_match_cost >= 0.0) {
            return Err(LocError::Config(format!(
                "non_match_cost must be >= 0, got {}",
                self.non_match_cost
            )));
        }
        if self.sliding_window == 0 {
            return Err(LocError::Config("sliding_window must be > 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.lost_ratio) {
            return Err(LocError::Config(format!(
                "lost_ratio must be in [0, 1], got {}",
                self.lost_ratio
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_loss_defaults() {
        let config = LocalizerConfig::new(4, 0.0, 6.0);
        assert_eq!(config.sliding_window, 5);
        assert_eq!(config.lost_ratio, 0.8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_values() {
        assert!(LocalizerConfig::new(4, -0.1, 6.0).validate().is_err());
        assert!(LocalizerConfig::new(4, 0.1, -1.0).validate().is_err());
        assert!(LocalizerConfig::new(4, f64::NAN, 1.0).validate().is_err());

        let config = LocalizerConfig {
            lost_ratio: 1.5,
            ..LocalizerConfig::new(4, 0.1, 1.0)
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_defaults() {
        let config: LocalizerConfig =
            serde_yaml::from_str("expansion_rate: 0.3\nnon_match_cost: 3.5\n").unwrap();
        assert_eq!(config.query_size, 0);
        assert_eq!(config.sliding_window, 5);
        assert_eq!(config.lost_ratio, 0.8);
    }
}
