/// Persistence-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {message}")]
    SqliteError { message: String },

    #[error("migration v{version:03} failed: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("payload compression failed: {0}")]
    CompressionFailed(String),

    #[error("session not found: {session_key}")]
    SessionNotFound { session_key: String },

    #[error("document io failed for {path}: {reason}")]
    DocumentIo { path: String, reason: String },
}
