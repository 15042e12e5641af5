//! Raw SQL operations for the sessions table.

use rusqlite::{params, Connection};

use bimlog_core::errors::BimLogResult;

use crate::to_storage_err;

/// Raw session row from the database.
#[derive(Debug, Clone)]
pub struct RawSession {
    pub session_key: String,
    pub document_name: String,
    pub started_at: String,
}

pub fn insert_session(
    conn: &Connection,
    session_key: &str,
    document_name: &str,
    started_at: &str,
) -> BimLogResult<()> {
    conn.execute(
        "INSERT INTO sessions (session_key, document_name, started_at) VALUES (?1, ?2, ?3)",
        params![session_key, document_name, started_at],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_session(conn: &Connection, session_key: &str) -> BimLogResult<Option<RawSession>> {
    let result = conn.query_row(
        "SELECT session_key, document_name, started_at FROM sessions WHERE session_key = ?1",
        params![session_key],
        row_to_raw_session,
    );

    match result {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}

/// All sessions, most recently started first.
pub fn list_sessions(conn: &Connection) -> BimLogResult<Vec<RawSession>> {
    let mut stmt = conn
        .prepare(
            "SELECT session_key, document_name, started_at FROM sessions
             ORDER BY started_at DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;

    let rows = stmt
        .query_map([], row_to_raw_session)
        .map_err(|e| to_storage_err(e.to_string()))?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Delete a session and, through the cascade, its logs. Returns rows removed.
pub fn delete_session(conn: &Connection, session_key: &str) -> BimLogResult<usize> {
    conn.execute(
        "DELETE FROM sessions WHERE session_key = ?1",
        params![session_key],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_raw_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSession> {
    Ok(RawSession {
        session_key: row.get(0)?,
        document_name: row.get(1)?,
        started_at: row.get(2)?,
    })
}
