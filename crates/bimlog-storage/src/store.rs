//! LogStore: the SQLite-backed session store.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bimlog_core::config::StorageConfig;
use bimlog_core::errors::{BimLogResult, StorageError};
use bimlog_core::models::{
    CommandType, ElementCategory, EntryInfo, InverseLogEntry, InversePayload, LogEntry,
    SessionInfo, SlotId,
};
use bimlog_core::timestamp::parse_timestamp;

use crate::migrations;
use crate::payload::{compress_json, decompress_json};
use crate::queries::entry_ops::{self, RawEntry};
use crate::queries::inverse_ops::{self, RawInverse};
use crate::queries::session_ops::{self, RawSession};
use crate::to_storage_err;

/// Single-connection session store.
pub struct LogStore {
    conn: Connection,
    compression_level: i32,
}

impl LogStore {
    /// Open the store described by `config`; no `db_path` means in memory.
    pub fn open(config: &StorageConfig) -> BimLogResult<Self> {
        match &config.db_path {
            Some(path) => Self::open_at(path, config),
            None => {
                let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
                Self::init(conn, config)
            }
        }
    }

    pub fn open_at(path: &Path, config: &StorageConfig) -> BimLogResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| to_storage_err(format!("open {}: {e}", path.display())))?;
        info!(path = %path.display(), "opened session store");
        Self::init(conn, config)
    }

    pub fn open_in_memory() -> BimLogResult<Self> {
        Self::open(&StorageConfig::default())
    }

    fn init(conn: Connection, config: &StorageConfig) -> BimLogResult<Self> {
        conn.execute_batch(&format!(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA busy_timeout = {};
            ",
            config.busy_timeout_ms
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;

        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            compression_level: config.compression_level,
        })
    }

    pub fn schema_version(&self) -> BimLogResult<u32> {
        migrations::current_version(&self.conn)
    }

    // ── Sessions ─────────────────────────────────────────────────────────

    pub fn insert_session(&self, session: &SessionInfo) -> BimLogResult<()> {
        session_ops::insert_session(
            &self.conn,
            &session.session_key.to_string(),
            &session.document_name,
            &session.started_at.to_rfc3339(),
        )
    }

    pub fn get_session(&self, session_key: &Uuid) -> BimLogResult<Option<SessionInfo>> {
        let raw = session_ops::get_session(&self.conn, &session_key.to_string())?;
        raw.map(raw_to_session).transpose()
    }

    /// Like `get_session`, but a missing session is an error.
    pub fn require_session(&self, session_key: &Uuid) -> BimLogResult<SessionInfo> {
        self.get_session(session_key)?.ok_or_else(|| {
            StorageError::SessionNotFound {
                session_key: session_key.to_string(),
            }
            .into()
        })
    }

    pub fn list_sessions(&self) -> BimLogResult<Vec<SessionInfo>> {
        session_ops::list_sessions(&self.conn)?
            .into_iter()
            .map(raw_to_session)
            .collect()
    }

    pub fn delete_session(&self, session_key: &Uuid) -> BimLogResult<bool> {
        let removed = session_ops::delete_session(&self.conn, &session_key.to_string())?;
        Ok(removed > 0)
    }

    // ── Forward log ──────────────────────────────────────────────────────

    /// Append one forward-log entry. Returns its row id.
    pub fn append_entry(&self, session_key: &Uuid, entry: &LogEntry) -> BimLogResult<u64> {
        let info = entry
            .info
            .as_ref()
            .map(|info| compress_json(info, self.compression_level))
            .transpose()?;

        let id = entry_ops::insert_entry(
            &self.conn,
            &session_key.to_string(),
            &entry.slot.to_string(),
            entry.element_id().as_str(),
            entry.command_type.code(),
            &entry.timestamp.to_rfc3339(),
            entry.category.name(),
            info.as_deref(),
        )?;
        debug!(entry_id = id, slot = %entry.slot, command = %entry.command_type, "appended log entry");
        Ok(id)
    }

    /// The session's forward log in append order.
    ///
    /// Rows that cannot be decoded are skipped with a warning.
    pub fn load_forward_log(&self, session_key: &Uuid) -> BimLogResult<Vec<LogEntry>> {
        let raw = entry_ops::get_entries_for_session(&self.conn, &session_key.to_string())?;
        Ok(raw
            .into_iter()
            .filter_map(|r| {
                let entry_id = r.entry_id;
                let slot = r.slot.clone();
                match raw_to_entry(r) {
                    Ok(entry) => Some(entry),
                    Err(reason) => {
                        warn!(entry_id, element_id = %slot, %reason, "skipping malformed log entry");
                        None
                    }
                }
            })
            .collect())
    }

    pub fn count_entries(&self, session_key: &Uuid) -> BimLogResult<u64> {
        entry_ops::count_entries(&self.conn, &session_key.to_string())
    }

    // ── Inverse log ──────────────────────────────────────────────────────

    /// Replace the session's stored inverse log in one transaction.
    pub fn replace_inverse_log(
        &mut self,
        session_key: &Uuid,
        entries: &[InverseLogEntry],
    ) -> BimLogResult<()> {
        let key = session_key.to_string();
        let prepared = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                Ok(RawInverse {
                    position: position as u64,
                    slot: entry.slot.to_string(),
                    element_id: entry.element_id().to_string(),
                    command_type: entry.command_type().code().to_string(),
                    recorded_at: entry.timestamp.to_rfc3339(),
                    category: entry.category.name().to_string(),
                    derivative: entry.derivative,
                    payload: compress_json(&entry.payload, self.compression_level)?,
                })
            })
            .collect::<BimLogResult<Vec<_>>>()?;

        let tx = self
            .conn
            .transaction()
            .map_err(|e| to_storage_err(e.to_string()))?;
        inverse_ops::delete_inverse_for_session(&tx, &key)?;
        for raw in &prepared {
            inverse_ops::insert_inverse(&tx, &key, raw)?;
        }
        tx.commit().map_err(|e| to_storage_err(e.to_string()))?;

        info!(session = %key, entries = prepared.len(), "stored inverse log");
        Ok(())
    }

    /// The session's stored inverse log in forward order.
    pub fn load_inverse_log(&self, session_key: &Uuid) -> BimLogResult<Vec<InverseLogEntry>> {
        let raw = inverse_ops::get_inverse_for_session(&self.conn, &session_key.to_string())?;
        Ok(raw
            .into_iter()
            .filter_map(|r| {
                let position = r.position;
                match raw_to_inverse(r) {
                    Ok(entry) => Some(entry),
                    Err(reason) => {
                        warn!(position, %reason, "skipping malformed inverse entry");
                        None
                    }
                }
            })
            .collect())
    }
}

fn raw_to_session(raw: RawSession) -> BimLogResult<SessionInfo> {
    let session_key = Uuid::parse_str(&raw.session_key)
        .map_err(|e| to_storage_err(format!("bad session key {}: {e}", raw.session_key)))?;
    let started_at = DateTime::parse_from_rfc3339(&raw.started_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| to_storage_err(format!("bad started_at {}: {e}", raw.started_at)))?;
    Ok(SessionInfo {
        session_key,
        document_name: raw.document_name,
        started_at,
    })
}

fn raw_to_entry(raw: RawEntry) -> Result<LogEntry, String> {
    let slot = SlotId::parse(&raw.slot)?;
    let command_type = CommandType::from_code(&raw.command_type)
        .ok_or_else(|| format!("unknown command type {}", raw.command_type))?;
    let timestamp = parse_timestamp(&raw.recorded_at)
        .ok_or_else(|| format!("bad timestamp {}", raw.recorded_at))?;
    let info = raw
        .info
        .as_deref()
        .map(decompress_json::<EntryInfo>)
        .transpose()
        .map_err(|e| e.to_string())?;
    Ok(LogEntry {
        slot,
        command_type,
        timestamp,
        category: ElementCategory::from_name(&raw.category),
        info,
    })
}

fn raw_to_inverse(raw: RawInverse) -> Result<InverseLogEntry, String> {
    let slot = SlotId::parse(&raw.slot)?;
    let timestamp = parse_timestamp(&raw.recorded_at)
        .ok_or_else(|| format!("bad timestamp {}", raw.recorded_at))?;
    let payload: InversePayload = decompress_json(&raw.payload).map_err(|e| e.to_string())?;
    Ok(InverseLogEntry {
        slot,
        category: ElementCategory::from_name(&raw.category),
        timestamp,
        derivative: raw.derivative,
        payload,
    })
}
