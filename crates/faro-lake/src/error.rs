//! Lake error types.

/// Errors from the object-storage layer.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// Object store operation failed (list, get, put).
    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),

    /// A record line could not be decoded.
    #[error("invalid record in {key} line {line}: {reason}")]
    InvalidRecord {
        key: String,
        line: usize,
        reason: String,
    },

    /// Storage section is missing required fields.
    #[error("storage is not configured: {0}")]
    NotConfigured(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(String),
}
