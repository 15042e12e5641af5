//! Forward log → inverse log, in a single pass.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bimlog_core::models::{CommandType, ElementId, InverseLogEntry, InversePayload, LogEntry};

use super::diff::sparse_diff;
use super::host_tracker::HostTracker;
use super::last_known::LastKnownState;

/// Why a forward entry produced no inverse entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildSkipReason {
    /// Container-panel category; rebuilt by its host.
    ContainerPanel,
    /// Create or Modify without a snapshot.
    MissingSnapshot,
    /// Modify or Delete of an element never seen before in this log.
    NoPriorState,
}

impl fmt::Display for BuildSkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildSkipReason::ContainerPanel => "container panel",
            BuildSkipReason::MissingSnapshot => "missing snapshot",
            BuildSkipReason::NoPriorState => "no prior state",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSkip {
    pub element_id: ElementId,
    pub command: CommandType,
    pub timestamp: DateTime<Utc>,
    pub reason: BuildSkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub processed: usize,
    pub emitted: usize,
    /// Modifies whose snapshots were identical to the prior state.
    pub unchanged: usize,
    pub derivative: usize,
    pub skipped: Vec<BuildSkip>,
}

/// The derived inverse log, in forward order, plus what was left out.
#[derive(Debug, Clone, Default)]
pub struct InverseLog {
    pub entries: Vec<InverseLogEntry>,
    pub report: BuildReport,
}

/// Build the inverse log of `forward`.
///
/// - Create → inverse Delete.
/// - Delete → inverse Create carrying the last known full state and the
///   delete's timestamp.
/// - Modify → sparse patch of old values; identical snapshots emit nothing.
pub fn build_inverse_log(forward: &[LogEntry]) -> InverseLog {
    let mut state = LastKnownState::new();
    let mut tracker = HostTracker::new();
    let mut out = InverseLog::default();

    for entry in forward {
        out.report.processed += 1;

        if entry.category.is_container_panel() {
            skip(&mut out.report, entry, BuildSkipReason::ContainerPanel);
            continue;
        }

        let derivative = tracker.observe(entry);
        let id = entry.element_id();

        let payload = match entry.command_type {
            CommandType::Create => {
                let Some(info) = &entry.info else {
                    skip(&mut out.report, entry, BuildSkipReason::MissingSnapshot);
                    continue;
                };
                state.replace(id.clone(), entry.category.clone(), info.clone());
                InversePayload::Remove
            }
            CommandType::Delete => match state.clear(id) {
                Some(known) => InversePayload::Recreate { info: known.info },
                None => {
                    skip(&mut out.report, entry, BuildSkipReason::NoPriorState);
                    continue;
                }
            },
            CommandType::Modify => {
                let Some(info) = &entry.info else {
                    skip(&mut out.report, entry, BuildSkipReason::MissingSnapshot);
                    continue;
                };
                let previous = state.replace(id.clone(), entry.category.clone(), info.clone());
                let Some(previous) = previous else {
                    skip(&mut out.report, entry, BuildSkipReason::NoPriorState);
                    continue;
                };
                let patch = sparse_diff(&previous.info, info, &entry.category);
                if patch.is_empty() {
                    debug!(slot = %entry.slot, "modify without effective change");
                    out.report.unchanged += 1;
                    continue;
                }
                InversePayload::Patch(patch)
            }
        };

        // Only modifies can be derivative.
        let derivative = derivative && entry.command_type == CommandType::Modify;
        if derivative {
            out.report.derivative += 1;
        }

        out.entries.push(InverseLogEntry {
            slot: entry.slot.clone(),
            category: entry.category.clone(),
            timestamp: entry.timestamp,
            derivative,
            payload,
        });
        out.report.emitted += 1;
    }

    info!(
        processed = out.report.processed,
        emitted = out.report.emitted,
        unchanged = out.report.unchanged,
        skipped = out.report.skipped.len(),
        "built inverse log"
    );
    out
}

fn skip(report: &mut BuildReport, entry: &LogEntry, reason: BuildSkipReason) {
    if reason != BuildSkipReason::ContainerPanel {
        warn!(
            element_id = %entry.element_id(),
            timestamp = %entry.timestamp,
            %reason,
            "skipping forward entry"
        );
    }
    report.skipped.push(BuildSkip {
        element_id: entry.element_id().clone(),
        command: entry.command_type,
        timestamp: entry.timestamp,
        reason,
    });
}
