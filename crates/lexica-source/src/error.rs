use thiserror::Error;

/// Errors from locating and opening content.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying path or archive entry does not exist.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A file could not be parsed as an archive.
    #[error("malformed archive {archive}: {reason}")]
    MalformedArchive { archive: String, reason: String },

    /// A nested-entry scan exhausted the embedded archive without a match.
    #[error("entry {entry:?} not found in {archive}")]
    EntryNotFound { archive: String, entry: String },

    /// I/O error from the underlying file system.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for source operations.
pub type SourceResult<T> = Result<T, SourceError>;
