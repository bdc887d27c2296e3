use lexica_types::ComponentId;

/// Errors from component store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested subject is not known to the store.
    #[error("subject not found: {0}")]
    SubjectNotFound(ComponentId),

    /// The requested record identity is not known to the store.
    #[error("record not found: {0}")]
    RecordNotFound(ComponentId),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure, surfaced verbatim.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
