//! Raw SQL operations for the inverse_entries table.

use rusqlite::{params, Connection};

use bimlog_core::errors::BimLogResult;

use crate::to_storage_err;

/// Raw inverse-log row. `payload` is zstd-compressed JSON.
#[derive(Debug, Clone)]
pub struct RawInverse {
    pub position: u64,
    pub slot: String,
    pub element_id: String,
    pub command_type: String,
    pub recorded_at: String,
    pub category: String,
    pub derivative: bool,
    pub payload: Vec<u8>,
}

pub fn delete_inverse_for_session(conn: &Connection, session_key: &str) -> BimLogResult<usize> {
    conn.execute(
        "DELETE FROM inverse_entries WHERE session_key = ?1",
        params![session_key],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn insert_inverse(conn: &Connection, session_key: &str, raw: &RawInverse) -> BimLogResult<()> {
    conn.execute(
        "INSERT INTO inverse_entries
            (session_key, position, slot, element_id, command_type, recorded_at, category, derivative, payload)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            session_key,
            raw.position as i64,
            raw.slot,
            raw.element_id,
            raw.command_type,
            raw.recorded_at,
            raw.category,
            raw.derivative,
            raw.payload,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Inverse entries of one session in forward order.
pub fn get_inverse_for_session(
    conn: &Connection,
    session_key: &str,
) -> BimLogResult<Vec<RawInverse>> {
    let mut stmt = conn
        .prepare(
            "SELECT position, slot, element_id, command_type, recorded_at, category, derivative, payload
             FROM inverse_entries WHERE session_key = ?1
             ORDER BY position ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map(params![session_key], |row| {
            Ok(RawInverse {
                position: row.get::<_, i64>(0)? as u64,
                slot: row.get(1)?,
                element_id: row.get(2)?,
                command_type: row.get(3)?,
                recorded_at: row.get(4)?,
                category: row.get(5)?,
                derivative: row.get(6)?,
                payload: row.get(7)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
