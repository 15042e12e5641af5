//! Session store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the SQLite session store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file. `None` keeps the store in memory.
    pub db_path: Option<PathBuf>,
    /// zstd level used for persisted payload sections.
    pub compression_level: i32,
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            compression_level: 3,
            busy_timeout_ms: 5_000,
        }
    }
}
