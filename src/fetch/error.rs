//! Error types for partition fetching.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading a partition.
///
/// Every kind is terminal for the current request; nothing here is
/// retried and no partial collection survives a failure.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not borrow a live connection from the pool
    #[error("failed to connect to database: {0}")]
    ConnectFailed(String),

    /// Liveness check failed on a borrowed connection
    #[error("database ping failed: {0}")]
    PingFailed(String),

    /// Query execution failed (missing partition included)
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A row refused to decode; the whole read fails rather than
    /// returning a collection with holes
    #[error("failed to scan row: {0}")]
    ScanFailed(String),

    /// The cursor errored after rows had already been produced
    #[error("error iterating over rows: {0}")]
    IterationFailed(String),

    /// Request deadline expired somewhere in acquire/ping/query/iterate
    #[error("partition read timed out after {0:?}")]
    Timeout(Duration),
}

impl FetchError {
    /// Classify an error surfaced by the row stream into the nearest
    /// kind. Decode failures are scan errors regardless of position;
    /// otherwise the cutover from query to iteration error is whether
    /// any row has been produced.
    pub(crate) fn from_stream(e: sqlx::Error, rows_seen: bool) -> Self {
        match &e {
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::Decode(_) => FetchError::ScanFailed(e.to_string()),
            _ if rows_seen => FetchError::IterationFailed(e.to_string()),
            _ => FetchError::QueryFailed(e.to_string()),
        }
    }
}
