use super::{PatchError, StorageError};

/// Top-level error type for the bimlog patch engine.
/// Subsystem errors convert into this via `From` impls.
///
/// Per-entry problems during inverse building or replay are not errors;
/// they are recorded in the build/replay reports. Only failures that
/// prevent reading or writing the logs surface here.
#[derive(Debug, thiserror::Error)]
pub enum BimLogError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("patch error: {0}")]
    PatchError(#[from] PatchError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

/// Convenience type alias.
pub type BimLogResult<T> = Result<T, BimLogError>;
