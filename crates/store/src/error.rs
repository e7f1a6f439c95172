//! Store-level errors.

use thiserror::Error;

/// Failure performing CRUD against a [`crate::BlockStore`],
/// [`crate::TaskStore`], or [`crate::FileStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the given id.
    #[error("no record for id {0}")]
    NotFound(i64),
    /// The concrete backing store failed in a way specific to its
    /// implementation (e.g. a SQL error); the message is opaque here.
    #[error("backing store error: {0}")]
    Backend(String),
}
