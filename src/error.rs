//! Store error taxonomy.

use thiserror::Error;

/// Failures surfaced by the persistent store.
///
/// `Unavailable` is fatal to the session; everything else is scoped to a
/// single operation and recoverable by retrying or re-reading store truth.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened at all.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] rusqlite::Error),

    /// A save or delete failed.
    #[error("store write failed: {0}")]
    Write(#[source] rusqlite::Error),

    /// A collection read failed.
    #[error("store read failed: {0}")]
    Read(#[source] rusqlite::Error),

    /// A record could not be serialized for storage.
    #[error("record encoding failed: {0}")]
    Encode(#[source] serde_json::Error),
}
