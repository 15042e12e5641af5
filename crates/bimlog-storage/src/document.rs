//! JSON session documents: `{ session, forward, inverse }`.
//!
//! Import is lenient per entry. A bare array of forward-log records (or an
//! object holding it under `ShapeLog`) is also accepted, as written by the
//! capture side; such documents get a fresh session identity.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use bimlog_core::errors::{BimLogResult, StorageError};
use bimlog_core::models::{InverseLogEntry, LogEntry, SessionDocument, SessionInfo};

fn io_err(path: &Path, e: impl std::fmt::Display) -> StorageError {
    StorageError::DocumentIo {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

pub fn write_document(path: &Path, doc: &SessionDocument) -> BimLogResult<()> {
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(path, json).map_err(|e| io_err(path, e))?;
    info!(
        path = %path.display(),
        forward = doc.forward.len(),
        inverse = doc.inverse.len(),
        "wrote session document"
    );
    Ok(())
}

pub fn read_document(path: &Path) -> BimLogResult<SessionDocument> {
    let raw = fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    let value: Value = serde_json::from_str(&raw)?;
    let fallback_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_document(value, &fallback_name)
}

/// Parse a document value. `fallback_name` names the session when the
/// document carries none.
pub fn parse_document(value: Value, fallback_name: &str) -> BimLogResult<SessionDocument> {
    match value {
        Value::Array(records) => Ok(SessionDocument {
            session: SessionInfo::new(fallback_name),
            forward: parse_forward(records),
            inverse: Vec::new(),
        }),
        Value::Object(mut obj) => {
            if let Some(Value::Array(records)) = obj.remove("ShapeLog") {
                return Ok(SessionDocument {
                    session: SessionInfo::new(fallback_name),
                    forward: parse_forward(records),
                    inverse: Vec::new(),
                });
            }
            let session: SessionInfo = match obj.remove("session") {
                Some(s) => serde_json::from_value(s)?,
                None => SessionInfo::new(fallback_name),
            };
            let forward = match obj.remove("forward") {
                Some(Value::Array(records)) => parse_forward(records),
                _ => Vec::new(),
            };
            let inverse = match obj.remove("inverse") {
                Some(Value::Array(records)) => parse_inverse(records),
                _ => Vec::new(),
            };
            Ok(SessionDocument {
                session,
                forward,
                inverse,
            })
        }
        other => Err(StorageError::DocumentIo {
            path: fallback_name.to_string(),
            reason: format!("expected object or array, found {}", kind_of(&other)),
        }
        .into()),
    }
}

fn parse_forward(records: Vec<Value>) -> Vec<LogEntry> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match LogEntry::from_value(record) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(index, reason = %e, "skipping malformed forward record");
                None
            }
        })
        .collect()
}

fn parse_inverse(records: Vec<Value>) -> Vec<InverseLogEntry> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            match serde_json::from_value::<InverseLogEntry>(record) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(index, reason = %e, "skipping malformed inverse record");
                    None
                }
            }
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
