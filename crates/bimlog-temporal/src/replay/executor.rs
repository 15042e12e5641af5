//! Replay executor: applies a plan to the live model, one entry at a time.

use tracing::{debug, info, warn};

use bimlog_core::config::PatchConfig;
use bimlog_core::models::{InverseLogEntry, InversePayload, LiveId, RemapTable};
use bimlog_core::traits::LiveModel;

use super::handlers::handler_for;
use super::outcome::{Applied, EntryOutcome, ReplayReport, SkipReason};
use super::resolve::ApplyContext;
use crate::window::ReplayPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    Idle,
    Applying { index: usize },
}

/// One rollback run over a live model.
///
/// Owns the remap table for the run; it is dropped with the session. Each
/// entry gets its own host transaction, committed whatever the outcome, so a
/// failed entry never rolls back the ones before it.
pub struct ReplaySession<'m> {
    model: &'m mut dyn LiveModel,
    plan: ReplayPlan,
    remap: RemapTable,
    config: PatchConfig,
    cursor: usize,
    state: ReplayState,
    report: ReplayReport,
}

impl<'m> ReplaySession<'m> {
    /// Historical ids still present in the live model start out mapped to
    /// themselves.
    pub fn new(model: &'m mut dyn LiveModel, plan: ReplayPlan, config: &PatchConfig) -> Self {
        let mut remap = RemapTable::new();
        for id in plan.element_ids() {
            if model.contains(&LiveId::from(&id)) {
                remap.seed_identity(&id);
            }
        }
        debug!(entries = plan.len(), seeded = remap.len(), "replay session opened");

        Self {
            model,
            plan,
            remap,
            config: config.clone(),
            cursor: 0,
            state: ReplayState::Idle,
            report: ReplayReport::default(),
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn remaining(&self) -> usize {
        self.plan.len() - self.cursor
    }

    pub fn remap(&self) -> &RemapTable {
        &self.remap
    }

    pub fn report(&self) -> &ReplayReport {
        &self.report
    }

    /// Apply the next entry. `None` once the plan is exhausted.
    pub fn step(&mut self) -> Option<&EntryOutcome> {
        let entry = self.plan.entries().get(self.cursor)?.clone();
        self.state = ReplayState::Applying { index: self.cursor };

        let tx_name = format!("Rollback {} {}", entry.command_type(), entry.slot);
        let result = match self.model.begin_transaction(&tx_name) {
            Ok(()) => {
                let mut ctx = ApplyContext {
                    model: &mut *self.model,
                    remap: &mut self.remap,
                    config: &self.config,
                };
                let result = apply_entry(&mut ctx, &entry);
                match self.model.commit_transaction() {
                    Ok(()) => result,
                    Err(e) => result.and(Err(SkipReason::from(e))),
                }
            }
            Err(e) => Err(SkipReason::from(e)),
        };

        match &result {
            Ok(applied) => debug!(
                element_id = %entry.element_id(),
                command = %entry.command_type(),
                timestamp = %entry.timestamp,
                ?applied,
                "applied inverse entry"
            ),
            Err(reason) => warn!(
                element_id = %entry.element_id(),
                category = %entry.category,
                timestamp = %entry.timestamp,
                reason = %reason,
                "inverse entry skipped"
            ),
        }

        let command = entry.command_type();
        self.cursor += 1;
        self.state = ReplayState::Idle;
        self.report.outcomes.push(EntryOutcome {
            slot: entry.slot,
            category: entry.category,
            command,
            timestamp: entry.timestamp,
            result,
        });
        self.report.outcomes.last()
    }

    /// Apply every remaining entry and close the session.
    pub fn run(mut self) -> ReplayReport {
        while self.step().is_some() {}
        self.finish()
    }

    /// Close the session. Entries not yet applied are counted, not applied.
    pub fn finish(mut self) -> ReplayReport {
        self.report.not_attempted = self.remaining();
        info!(
            applied = self.report.applied_count(),
            skipped = self.report.skipped_count(),
            not_attempted = self.report.not_attempted,
            "replay session finished"
        );
        self.report
    }
}

fn apply_entry(ctx: &mut ApplyContext<'_>, entry: &InverseLogEntry) -> Result<Applied, SkipReason> {
    let Some(handler) = handler_for(&entry.category) else {
        debug!(category = %entry.category, "no apply routine for category");
        return Ok(Applied::Unsupported);
    };

    match &entry.payload {
        InversePayload::Remove => {
            let live = ctx.resolve_live(entry.element_id())?;
            ctx.model.delete_element(&live)?;
            ctx.remap.retire(entry.element_id());
            Ok(Applied::Deleted(live))
        }
        InversePayload::Recreate { info } => {
            let blueprint = handler.blueprint(ctx, &entry.category, info)?;
            let live = ctx.model.create_element(&blueprint)?;
            ctx.remap.register(entry.element_id().clone(), live.clone());
            Ok(Applied::Created(live))
        }
        InversePayload::Patch(patch) => handler.modify(ctx, entry, patch),
    }
}
