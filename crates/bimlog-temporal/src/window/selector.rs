//! Time-window selection: which inverse entries fire to reach the target.

use std::collections::BTreeSet;

use tracing::debug;

use bimlog_core::config::PatchConfig;
use bimlog_core::models::{ElementId, InverseLogEntry, RollbackRequest};

/// Selected inverse entries, most recent first.
///
/// Reverse-chronological order is the only order the executor accepts, so
/// the plan can only be built by [`select`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayPlan {
    entries: Vec<InverseLogEntry>,
    excluded_derivative: usize,
}

impl ReplayPlan {
    pub fn entries(&self) -> &[InverseLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Derivative entries that were in the window but left out.
    pub fn excluded_derivative(&self) -> usize {
        self.excluded_derivative
    }

    /// Distinct historical ids touched by the plan.
    pub fn element_ids(&self) -> BTreeSet<ElementId> {
        self.entries.iter().map(|e| e.element_id().clone()).collect()
    }
}

/// Pick entries whose slot is in scope and `timestamp > target`.
///
/// `inverse` must be in forward order; the plan reverses it. Derivative
/// entries are dropped when `suppress_derivative_changes` is set.
pub fn select(
    inverse: &[InverseLogEntry],
    request: &RollbackRequest,
    config: &PatchConfig,
) -> ReplayPlan {
    let mut excluded_derivative = 0;
    let mut entries: Vec<InverseLogEntry> = inverse
        .iter()
        .filter(|e| request.scope.contains(&e.slot) && e.timestamp > request.target)
        .filter(|e| {
            if config.suppress_derivative_changes && e.derivative {
                excluded_derivative += 1;
                false
            } else {
                true
            }
        })
        .cloned()
        .collect();
    entries.reverse();

    debug!(
        target = %request.target,
        selected = entries.len(),
        excluded_derivative,
        "selected replay window"
    );

    ReplayPlan {
        entries,
        excluded_derivative,
    }
}
