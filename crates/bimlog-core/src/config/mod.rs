pub mod observability_config;
pub mod patch_config;
pub mod storage_config;

use serde::{Deserialize, Serialize};

pub use observability_config::ObservabilityConfig;
pub use patch_config::PatchConfig;
pub use storage_config::StorageConfig;

use crate::errors::{BimLogError, BimLogResult};

/// Top-level configuration aggregating all subsystem configs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BimLogConfig {
    pub storage: StorageConfig,
    pub patch: PatchConfig,
    pub observability: ObservabilityConfig,
}

impl BimLogConfig {
    /// Load config from a TOML string, falling back to defaults for missing fields.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load config from a TOML file on disk.
    pub fn from_file(path: &std::path::Path) -> BimLogResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw).map_err(|e| BimLogError::ConfigError(e.to_string()))
    }
}
