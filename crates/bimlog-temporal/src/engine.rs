//! SessionContext: one modeling session end to end.
//!
//! Owns the forward log (through the recorder), the optional session store
//! and the configuration. Builds the inverse log on demand and runs
//! rollback requests as build → select → replay.

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use bimlog_core::config::BimLogConfig;
use bimlog_core::errors::BimLogResult;
use bimlog_core::models::{LogEntry, RollbackRequest, SessionDocument, SessionInfo};
use bimlog_core::traits::LiveModel;
use bimlog_storage::LogStore;

use crate::event_store::{CaptureEvent, ForwardLogRecorder};
use crate::inverse::{build_inverse_log, BuildReport, InverseLog};
use crate::replay::{ReplayReport, ReplaySession};
use crate::window::{select, ReplayPlan};

/// Everything a rollback did, attributable per entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RollbackReport {
    pub build: BuildReport,
    pub plan_len: usize,
    pub excluded_derivative: usize,
    pub replay: ReplayReport,
}

/// Summary line for logs and callers that only need counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RollbackSummary {
    pub planned: usize,
    pub applied: usize,
    pub skipped: usize,
    pub excluded_derivative: usize,
}

impl RollbackReport {
    pub fn summary(&self) -> RollbackSummary {
        RollbackSummary {
            planned: self.plan_len,
            applied: self.replay.applied_count(),
            skipped: self.replay.skipped_count(),
            excluded_derivative: self.excluded_derivative,
        }
    }
}

pub struct SessionContext {
    info: SessionInfo,
    recorder: ForwardLogRecorder,
    store: Option<LogStore>,
    config: BimLogConfig,
}

impl SessionContext {
    /// Start a new session. Persisted when `config.storage.db_path` is set.
    pub fn new(document_name: impl Into<String>, config: BimLogConfig) -> BimLogResult<Self> {
        let store = match &config.storage.db_path {
            Some(_) => Some(LogStore::open(&config.storage)?),
            None => None,
        };
        Self::start(SessionInfo::new(document_name), store, config)
    }

    /// Start a new session recorded into an already open store.
    pub fn with_store(
        document_name: impl Into<String>,
        store: LogStore,
        config: BimLogConfig,
    ) -> BimLogResult<Self> {
        Self::start(SessionInfo::new(document_name), Some(store), config)
    }

    fn start(info: SessionInfo, store: Option<LogStore>, config: BimLogConfig) -> BimLogResult<Self> {
        if let Some(store) = &store {
            store.insert_session(&info)?;
        }
        info!(session = %info.session_key, document = %info.document_name, "session started");
        Ok(Self {
            info,
            recorder: ForwardLogRecorder::new(),
            store,
            config,
        })
    }

    /// Resume a stored session; the forward log is reloaded from the store.
    pub fn open(store: LogStore, session_key: &Uuid, config: BimLogConfig) -> BimLogResult<Self> {
        let info = store.require_session(session_key)?;
        let forward = store.load_forward_log(session_key)?;
        info!(session = %session_key, entries = forward.len(), "session reopened");
        Ok(Self {
            info,
            recorder: ForwardLogRecorder::from_entries(forward),
            store: Some(store),
            config,
        })
    }

    /// Load a session document. With a store configured, the session and
    /// its forward log are written to it.
    pub fn from_document(doc: SessionDocument, config: BimLogConfig) -> BimLogResult<Self> {
        let store = match &config.storage.db_path {
            Some(_) => Some(LogStore::open(&config.storage)?),
            None => None,
        };
        if let Some(store) = &store {
            store.insert_session(&doc.session)?;
            for entry in &doc.forward {
                store.append_entry(&doc.session.session_key, entry)?;
            }
        }
        debug!(session = %doc.session.session_key, entries = doc.forward.len(), "session loaded from document");
        Ok(Self {
            info: doc.session,
            recorder: ForwardLogRecorder::from_entries(doc.forward),
            store,
            config,
        })
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn config(&self) -> &BimLogConfig {
        &self.config
    }

    pub fn forward_log(&self) -> &[LogEntry] {
        self.recorder.entries()
    }

    pub fn store(&self) -> Option<&LogStore> {
        self.store.as_ref()
    }

    pub fn into_store(self) -> Option<LogStore> {
        self.store
    }

    /// Record one mutation of the live model.
    pub fn capture(&mut self, event: CaptureEvent) -> BimLogResult<LogEntry> {
        let entry = self.recorder.record(event)?.clone();
        if let Some(store) = &self.store {
            store.append_entry(&self.info.session_key, &entry)?;
        }
        Ok(entry)
    }

    /// Rebuild the inverse log from the whole forward log and store it.
    pub fn inverse_log(&mut self) -> BimLogResult<InverseLog> {
        let log = build_inverse_log(self.recorder.entries());
        if let Some(store) = &mut self.store {
            store.replace_inverse_log(&self.info.session_key, &log.entries)?;
        }
        Ok(log)
    }

    /// Entries a rollback to `request` would apply, most recent first.
    pub fn plan(&mut self, request: &RollbackRequest) -> BimLogResult<(ReplayPlan, BuildReport)> {
        let log = self.inverse_log()?;
        let plan = select(&log.entries, request, &self.config.patch);
        Ok((plan, log.report))
    }

    /// Roll the live model back to `request.target` for the requested scope.
    pub fn rollback(
        &mut self,
        model: &mut dyn LiveModel,
        request: &RollbackRequest,
    ) -> BimLogResult<RollbackReport> {
        let (plan, build) = self.plan(request)?;
        let plan_len = plan.len();
        let excluded_derivative = plan.excluded_derivative();

        let replay = ReplaySession::new(model, plan, &self.config.patch).run();
        let report = RollbackReport {
            build,
            plan_len,
            excluded_derivative,
            replay,
        };
        let summary = report.summary();
        info!(
            session = %self.info.session_key,
            target = %request.target,
            planned = summary.planned,
            applied = summary.applied,
            skipped = summary.skipped,
            "rollback finished"
        );
        Ok(report)
    }

    /// Parse a JSON rollback request and run it.
    pub fn rollback_json(&mut self, model: &mut dyn LiveModel, raw: &str) -> BimLogResult<RollbackReport> {
        let request = RollbackRequest::from_json(raw)?;
        self.rollback(model, &request)
    }

    /// Portable export with a freshly built inverse log.
    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            session: self.info.clone(),
            forward: self.recorder.entries().to_vec(),
            inverse: build_inverse_log(self.recorder.entries()).entries,
        }
    }
}
