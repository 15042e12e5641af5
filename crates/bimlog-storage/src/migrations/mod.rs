//! Session store schema. The applied version lives in `PRAGMA user_version`;
//! each step commits together with its version bump.

mod v001_session_tables;
mod v002_inverse_tables;

use rusqlite::Connection;
use tracing::{debug, info};

use bimlog_core::errors::{BimLogResult, StorageError};

use crate::to_storage_err;

struct Step {
    version: u32,
    name: &'static str,
    apply: fn(&Connection) -> BimLogResult<()>,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "session_tables",
        apply: v001_session_tables::migrate,
    },
    Step {
        version: 2,
        name: "inverse_tables",
        apply: v002_inverse_tables::migrate,
    },
];

/// Schema version a fresh store ends up at.
pub const LATEST_VERSION: u32 = 2;

pub fn current_version(conn: &Connection) -> BimLogResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Bring the schema up to `LATEST_VERSION`. Returns the number of steps applied.
///
/// A store written by a newer build is refused rather than guessed at.
pub fn run_migrations(conn: &Connection) -> BimLogResult<u32> {
    let from = current_version(conn)?;
    if from > LATEST_VERSION {
        return Err(StorageError::MigrationFailed {
            version: from,
            reason: format!("store schema is newer than v{LATEST_VERSION:03}"),
        }
        .into());
    }

    let pending: Vec<&Step> = STEPS.iter().filter(|s| s.version > from).collect();
    if pending.is_empty() {
        debug!(version = from, "session store schema is current");
        return Ok(0);
    }

    for step in &pending {
        apply_step(conn, step)?;
    }
    info!(from, to = LATEST_VERSION, applied = pending.len(), "session store migrated");
    Ok(pending.len() as u32)
}

fn apply_step(conn: &Connection, step: &Step) -> BimLogResult<()> {
    let failed = |reason: String| StorageError::MigrationFailed {
        version: step.version,
        reason,
    };

    // Dropping the transaction without commit rolls the step back.
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| failed(e.to_string()))?;
    (step.apply)(&tx).map_err(|e| failed(e.to_string()))?;
    tx.pragma_update(None, "user_version", step.version)
        .map_err(|e| failed(e.to_string()))?;
    tx.commit().map_err(|e| failed(e.to_string()))?;

    debug!(version = step.version, name = step.name, "applied migration");
    Ok(())
}
