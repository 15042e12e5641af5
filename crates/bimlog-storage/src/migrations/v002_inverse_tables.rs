//! v002: derived inverse log, one ordered set per session.

use rusqlite::Connection;

use bimlog_core::errors::BimLogResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> BimLogResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS inverse_entries (
            inverse_id   INTEGER PRIMARY KEY AUTOINCREMENT,
            session_key  TEXT NOT NULL REFERENCES sessions(session_key) ON DELETE CASCADE,
            position     INTEGER NOT NULL,
            slot         TEXT NOT NULL,
            element_id   TEXT NOT NULL,
            command_type TEXT NOT NULL,
            recorded_at  TEXT NOT NULL,
            category     TEXT NOT NULL,
            derivative   INTEGER NOT NULL DEFAULT 0,
            payload      BLOB NOT NULL,
            built_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE (session_key, position)
        );

        CREATE INDEX IF NOT EXISTS idx_inverse_entries_time
            ON inverse_entries(session_key, recorded_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    Ok(())
}
