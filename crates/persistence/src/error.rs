//! Persistence error types

use thiserror::Error;

/// Errors surfaced by the stores.
///
/// Logical outcomes (not-found, already-cancelled) are not errors; they are
/// expressed in the store return types so callers branch on data.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The connection to the database could not be established.
    /// The transaction was never opened.
    #[error("failed to connect to the railway database: {0}")]
    Connection(String),

    /// An operational error while talking to the store. Any open
    /// transaction has been rolled back.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store is temporarily unable to serve requests.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A row held contents the layer could not interpret.
    #[error("invalid data in store: {0}")]
    InvalidData(String),

    /// An update inside a locked transaction affected an unexpected
    /// number of rows. The transaction has been rolled back.
    #[error("update affected {0} rows inside a locked transaction")]
    LockAnomaly(u64),
}
