//! # bimlog-storage
//!
//! SQLite persistence for modeling sessions: the forward log, the derived
//! inverse log, and JSON session-document import/export.
//! One connection per store, owned by the session that opened it.

pub mod document;
pub mod migrations;
pub mod payload;
pub mod queries;
pub mod store;

pub use store::LogStore;

/// Helper to convert a string message into a BimLogError::StorageError.
pub fn to_storage_err(msg: String) -> bimlog_core::BimLogError {
    bimlog_core::BimLogError::StorageError(bimlog_core::errors::StorageError::SqliteError {
        message: msg,
    })
}
