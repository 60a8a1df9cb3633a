//! Centralized error handling.
//!
//! Provides a unified error type for every repository operation, sync or
//! async, with conversions from the underlying toolkit errors.

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum Error {
    /// The driver rejected or failed a statement.
    #[error("database error")]
    Database(#[from] rusqlite::Error),

    /// A statement could not be assembled.
    #[error("query build error")]
    QueryBuild(#[from] sea_query::error::Error),

    /// A row that was just written could not be read back.
    #[error("saved row could not be read back")]
    SavedRowMissing,

    /// The shared connection mutex was poisoned by a panicking holder.
    #[error("connection mutex poisoned")]
    ConnectionPoisoned,

    /// A blocking task did not complete on the thread pool.
    #[error("background task failed: {0}")]
    Background(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
