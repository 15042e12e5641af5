//! Raw SQL operations for the log_entries table (forward log).

use rusqlite::{params, Connection};

use bimlog_core::errors::BimLogResult;

use crate::to_storage_err;

/// Raw forward-log row. `info` is zstd-compressed JSON.
#[derive(Debug, Clone)]
pub struct RawEntry {
    pub entry_id: u64,
    pub session_key: String,
    pub slot: String,
    pub element_id: String,
    pub command_type: String,
    pub recorded_at: String,
    pub category: String,
    pub info: Option<Vec<u8>>,
}

/// Insert a single entry. Returns the assigned entry_id.
#[allow(clippy::too_many_arguments)]
pub fn insert_entry(
    conn: &Connection,
    session_key: &str,
    slot: &str,
    element_id: &str,
    command_type: &str,
    recorded_at: &str,
    category: &str,
    info: Option<&[u8]>,
) -> BimLogResult<u64> {
    conn.execute(
        "INSERT INTO log_entries
            (session_key, slot, element_id, command_type, recorded_at, category, info)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            session_key,
            slot,
            element_id,
            command_type,
            recorded_at,
            category,
            info
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(conn.last_insert_rowid() as u64)
}

/// Entries of one session in append order.
pub fn get_entries_for_session(conn: &Connection, session_key: &str) -> BimLogResult<Vec<RawEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT entry_id, session_key, slot, element_id, command_type, recorded_at, category, info
             FROM log_entries WHERE session_key = ?1
             ORDER BY entry_id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![session_key], row_to_raw_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Entries touching one element, in append order.
pub fn get_entries_for_element(
    conn: &Connection,
    session_key: &str,
    element_id: &str,
) -> BimLogResult<Vec<RawEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT entry_id, session_key, slot, element_id, command_type, recorded_at, category, info
             FROM log_entries WHERE session_key = ?1 AND element_id = ?2
             ORDER BY entry_id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![session_key, element_id], row_to_raw_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_entries(conn: &Connection, session_key: &str) -> BimLogResult<u64> {
    conn.query_row(
        "SELECT COUNT(*) FROM log_entries WHERE session_key = ?1",
        params![session_key],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as u64)
    .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_raw_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        entry_id: row.get::<_, i64>(0)? as u64,
        session_key: row.get(1)?,
        slot: row.get(2)?,
        element_id: row.get(3)?,
        command_type: row.get(4)?,
        recorded_at: row.get(5)?,
        category: row.get(6)?,
        info: row.get(7)?,
    })
}
