use thiserror::Error;

use lexica_source::SourceError;
use lexica_store::StoreError;
use lexica_types::{ComponentId, TypeError};

use crate::aggregate::CompileError;

/// Errors from the import pipeline.
///
/// Every variant is fatal to the run; there is no per-record retry or
/// skip-and-continue. Already-submitted records remain in storage.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A line's field count did not match the fixed schema arity.
    #[error("{source_label}:{line}: expected {expected} fields, found {found}")]
    SchemaViolation {
        source_label: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A data row carried a value the type layer rejected.
    #[error("{source_label}:{line}: {source}")]
    BadRow {
        source_label: String,
        line: u64,
        #[source]
        source: TypeError,
    },

    /// The expression compiler rejected a subject's aggregated expressions.
    #[error("expression compilation failed for subject {subject}")]
    ExpressionCompilationFailed {
        subject: ComponentId,
        #[source]
        source: CompileError,
    },

    /// Failure locating or opening the release content.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Failure raised by a type operation outside row context.
    #[error("type error: {0}")]
    Type(#[from] TypeError),

    /// Failure raised by the storage collaborator.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// I/O failure while reading the release stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImportError {
    /// Attach row context to a type failure.
    pub(crate) fn bad_row(source_label: &str, line: u64, source: TypeError) -> Self {
        Self::BadRow {
            source_label: source_label.to_owned(),
            line,
            source,
        }
    }
}

/// Result alias for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
