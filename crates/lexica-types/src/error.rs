use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// An effective-time string was not an 8-digit compressed date.
    #[error("malformed effective time: {0:?}")]
    MalformedTimestamp(String),

    /// A lifecycle flag was something other than "0" or "1".
    #[error("unknown state flag: {0:?}")]
    UnknownStateFlag(String),

    /// An identifier string could not be parsed as a UUID.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}
