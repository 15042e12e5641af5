/// Patch-engine errors.
///
/// `ModelRejected` is what `LiveModel` implementations return when the host
/// refuses a mutation; the replay executor downgrades it to a per-entry skip.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    #[error("malformed log entry {element_id}: {reason}")]
    MalformedEntry { element_id: String, reason: String },

    #[error("invalid rollback request: {0}")]
    InvalidRequest(String),

    #[error("live model rejected mutation: {0}")]
    ModelRejected(String),

    #[error("live element not found: {0}")]
    LiveElementNotFound(String),
}
