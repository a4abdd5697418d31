//! Listkeeper - the persistence core for community task-list bots.
//!
//! This library provides the storage engine and binding manager behind the
//! `lk` CLI: guild-scoped prioritized task lists kept in a local SQLite
//! database, plus the optional association of a list with a chat channel and
//! the id of its most recently rendered message.

pub mod binding;
pub mod cli;
pub mod commands;
pub mod models;
pub mod storage;

/// Library-level error type for listkeeper operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database could not be opened, read, or written.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A write was rejected by a schema or referential constraint.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// An id was referenced that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller supplied an argument the operation cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::ConstraintViolation(err.to_string())
            }
            _ => Error::StorageUnavailable(err.to_string()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::StorageUnavailable(err.to_string())
    }
}

/// Result type alias for listkeeper operations.
pub type Result<T> = std::result::Result<T, Error>;
