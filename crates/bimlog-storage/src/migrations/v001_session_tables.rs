//! v001: sessions and the forward log.

use rusqlite::Connection;

use bimlog_core::errors::BimLogResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> BimLogResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS sessions (
            session_key   TEXT PRIMARY KEY,
            document_name TEXT NOT NULL,
            started_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS log_entries (
            entry_id     INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key  TEXT NOT NULL REFERENCES sessions(session_key) ON DELETE CASCADE,
            slot         TEXT NOT NULL,
            element_id   TEXT NOT NULL,
            command_type TEXT NOT NULL,
            recorded_at  TEXT NOT NULL,
            category     TEXT NOT NULL,
            info         BLOB
        );

        CREATE INDEX IF NOT EXISTS idx_log_entries_session
            ON log_entries(session_key, entry_id);
        CREATE INDEX IF NOT EXISTS idx_log_entries_element
            ON log_entries(session_key, element_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}
