//! Inverse-log and replay configuration.

use serde::{Deserialize, Serialize};

/// Configuration for inverse-log building, window selection and replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    /// Drop hosted-element modifications that only follow their host's move.
    pub suppress_derivative_changes: bool,

    /// Parameter keys never written back to the live model.
    pub skipped_parameter_keys: Vec<String>,

    /// Case-insensitive name fragments of host-managed parameters
    /// (identity data, IFC export fields, phasing) that are never replayed.
    pub skipped_parameter_keywords: Vec<String>,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            suppress_derivative_changes: true,
            skipped_parameter_keys: vec!["Level_1".to_string(), "Category_1".to_string()],
            skipped_parameter_keywords: ["IFC", "PHASE", "IMAGE", "MARK", "DESIGN_OPTION"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PatchConfig {
    /// Whether a parameter key must be left alone during replay.
    pub fn is_parameter_skipped(&self, key: &str) -> bool {
        if self.skipped_parameter_keys.iter().any(|k| k == key) {
            return true;
        }
        let upper = key.to_ascii_uppercase();
        self.skipped_parameter_keywords
            .iter()
            .any(|kw| upper.contains(&kw.to_ascii_uppercase()))
    }
}
