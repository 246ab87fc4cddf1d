//! Main SmritiConfig and conversion methods.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::sections::{DataSection, OutputSection, SearchSection};
use crate::error::{LocError, Result};

/// Full application configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SmritiConfig {
    /// Input data
    #[serde(default)]
    pub data: DataSection,

    /// Search parameters
    #[serde(default)]
    pub search: SearchSection,

    /// Outputs
    #[serde(default)]
    pub output: OutputSection,
}

impl SmritiConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&contents)?;
        info!("[SmritiConfig] Loaded {}", path.display());
        Ok(config)
    }

    /// Load from default config path (configs/smriti.yaml)
    pub fn load_default() -> Result<Self> {
        let path = Path::new("configs/smriti.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-section consistency
    pub fn validate(&self) -> Result<()> {
        if self.data.hash_table.is_none() && self.data.reference_features.is_none() {
            return Err(LocError::Config(
                "data.hash_table or data.reference_features is required".to_string(),
            ));
        }
        self.search.to_localizer_config(0).validate()
    }
}
