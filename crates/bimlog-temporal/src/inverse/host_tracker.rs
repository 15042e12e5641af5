//! Derivative-change detection for hosted elements.

use chrono::{DateTime, Utc};
use serde_json::Value;

use bimlog_core::models::{CommandType, ElementId, LogEntry, SlotId};

/// Geometry key holding a hosted element's host id.
pub const HOST_ID_KEY: &str = "HostId";

/// Tracks the most recent host Modify.
///
/// A hosted Modify is derivative when its `HostId` names the tracked host or
/// its timestamp equals the host's. The tracker stays armed across a run of
/// hosted modifies and disarms at the first entry that is not one.
#[derive(Debug, Default)]
pub struct HostTracker {
    armed: Option<(ElementId, DateTime<Utc>)>,
}

impl HostTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next forward entry; returns whether it is derivative.
    pub fn observe(&mut self, entry: &LogEntry) -> bool {
        let is_modify = entry.command_type == CommandType::Modify;

        if is_modify && entry.category.is_host() {
            self.armed = Some((entry.element_id().clone(), entry.timestamp));
            return false;
        }

        if is_modify && entry.category.is_hosted() {
            return match &self.armed {
                Some((host, at)) => {
                    host_id_of(entry).as_ref() == Some(host) || entry.timestamp == *at
                }
                None => false,
            };
        }

        self.armed = None;
        false
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}

/// Host id recorded in the entry's geometry, slot suffix stripped.
pub fn host_id_of(entry: &LogEntry) -> Option<ElementId> {
    let raw = entry.info.as_ref()?.geometry.get(HOST_ID_KEY)?;
    host_id_from_value(raw)
}

pub fn host_id_from_value(raw: &Value) -> Option<ElementId> {
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    SlotId::parse(&text).ok().map(|slot| slot.element_id)
}
