use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::inverse_entry::InverseLogEntry;
use super::log_entry::LogEntry;

/// One modeling session: the unit that owns a forward log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_key: Uuid,
    pub document_name: String,
    pub started_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn new(document_name: impl Into<String>) -> Self {
        Self {
            session_key: Uuid::new_v4(),
            document_name: document_name.into(),
            started_at: Utc::now(),
        }
    }
}

/// Portable export of a session: `{ session, forward, inverse }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    pub session: SessionInfo,
    #[serde(default)]
    pub forward: Vec<LogEntry>,
    #[serde(default)]
    pub inverse: Vec<InverseLogEntry>,
}
