use serde::{Deserialize, Serialize};

/// Logging configuration. `RUST_LOG` takes precedence over `log_filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_filter: String,
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            json_logs: false,
        }
    }
}
