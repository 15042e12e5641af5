//! Forward-log recorder: turns capture events into slot-addressed LogEntries.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use bimlog_core::errors::PatchError;
use bimlog_core::models::{CommandType, ElementCategory, ElementId, EntryInfo, LogEntry, SlotId};

/// One mutation observed on the live model.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureEvent {
    pub element_id: ElementId,
    pub category: ElementCategory,
    pub command: CommandType,
    pub timestamp: DateTime<Utc>,
    /// Full snapshot after the mutation. Required for Create and Modify.
    pub snapshot: Option<EntryInfo>,
}

/// Append-only forward log plus slot bookkeeping.
///
/// Each create opens a new slot `<id>_<n>`; modifies and deletes address the
/// currently live slot of their id; a delete retires it.
#[derive(Debug, Default)]
pub struct ForwardLogRecorder {
    entries: Vec<LogEntry>,
    live_slots: HashMap<ElementId, u32>,
    last_version: HashMap<ElementId, u32>,
}

impl ForwardLogRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild recorder state from a persisted forward log.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let mut recorder = Self::new();
        for entry in &entries {
            recorder.track(entry);
        }
        recorder.entries = entries;
        recorder
    }

    /// Record one capture event and return the appended entry.
    pub fn record(&mut self, event: CaptureEvent) -> Result<&LogEntry, PatchError> {
        let CaptureEvent {
            element_id,
            category,
            command,
            timestamp,
            snapshot,
        } = event;

        let info = match (command, snapshot) {
            (CommandType::Delete, _) => None,
            (_, Some(info)) => Some(info),
            (_, None) => {
                return Err(PatchError::MalformedEntry {
                    element_id: element_id.to_string(),
                    reason: format!("{command} event without snapshot"),
                })
            }
        };

        let version = match command {
            CommandType::Create => {
                if let Some(open) = self.live_slots.get(&element_id) {
                    warn!(element_id = %element_id, slot = open, "create over a live slot, opening a new one");
                }
                self.next_version(&element_id)
            }
            CommandType::Modify => match self.live_slots.get(&element_id) {
                Some(v) => *v,
                // Element predates capture: open its first slot implicitly.
                None => self.next_version(&element_id),
            },
            CommandType::Delete => match self.live_slots.get(&element_id) {
                Some(v) => *v,
                None => self.last_version.get(&element_id).copied().unwrap_or(1),
            },
        };

        let entry = LogEntry {
            slot: SlotId::new(element_id, version),
            command_type: command,
            timestamp,
            category,
            info,
        };
        self.track(&entry);
        debug!(slot = %entry.slot, command = %entry.command_type, "recorded capture event");

        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    fn next_version(&self, id: &ElementId) -> u32 {
        self.last_version.get(id).copied().unwrap_or(0) + 1
    }

    fn track(&mut self, entry: &LogEntry) {
        let id = entry.element_id().clone();
        let version = entry.slot.version;
        let last = self.last_version.entry(id.clone()).or_insert(0);
        *last = (*last).max(version);
        match entry.command_type {
            CommandType::Create | CommandType::Modify => {
                self.live_slots.insert(id, version);
            }
            CommandType::Delete => {
                self.live_slots.remove(&id);
            }
        }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }

    /// The slot currently addressed by modifies/deletes of `id`, if live.
    pub fn live_slot(&self, id: &ElementId) -> Option<SlotId> {
        self.live_slots
            .get(id)
            .map(|v| SlotId::new(id.clone(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
