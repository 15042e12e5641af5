//! Per-entry replay results and the aggregated report.

use chrono::{DateTime, Utc};

use bimlog_core::errors::PatchError;
use bimlog_core::models::{CommandType, ElementCategory, ElementId, LiveId, SlotId};

/// What a successfully applied entry did to the live model.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Created(LiveId),
    Patched(LiveId),
    /// Destroyed and rebuilt; the historical id now maps to `live`.
    Recreated { previous: LiveId, live: LiveId },
    Deleted(LiveId),
    /// Category without an apply routine; nothing was done.
    Unsupported,
}

impl Applied {
    pub fn live_id(&self) -> Option<&LiveId> {
        match self {
            Applied::Created(id) | Applied::Patched(id) | Applied::Deleted(id) => Some(id),
            Applied::Recreated { live, .. } => Some(live),
            Applied::Unsupported => None,
        }
    }
}

/// Why an entry was not applied. Never aborts the session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SkipReason {
    #[error("stale reference: {0} has no live counterpart")]
    StaleReference(ElementId),

    #[error("missing geometry: {0}")]
    MissingGeometry(String),

    #[error("unresolved lookup: {0}")]
    UnresolvedLookup(String),

    #[error("unresolved host {0}")]
    UnresolvedHost(ElementId),

    #[error("live model rejected the operation: {0}")]
    ModelRejected(String),
}

impl From<PatchError> for SkipReason {
    fn from(e: PatchError) -> Self {
        SkipReason::ModelRejected(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryOutcome {
    pub slot: SlotId,
    pub category: ElementCategory,
    pub command: CommandType,
    pub timestamp: DateTime<Utc>,
    pub result: Result<Applied, SkipReason>,
}

impl EntryOutcome {
    pub fn element_id(&self) -> &ElementId {
        &self.slot.element_id
    }

    pub fn is_applied(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayReport {
    /// In application order (most recent entry first).
    pub outcomes: Vec<EntryOutcome>,
    /// Entries left in the plan when the session was finished early.
    pub not_attempted: usize,
}

impl ReplayReport {
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.applied_count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&EntryOutcome, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|reason| (o, reason)))
    }

    /// Everything in the plan was attempted and applied.
    pub fn is_clean(&self) -> bool {
        self.not_attempted == 0 && self.skipped_count() == 0
    }
}
