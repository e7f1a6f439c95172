//! Scheduler-level errors.
//!
//! Only operations whose failure the caller must act on return
//! `Result<_, SchedulerError>`. `on_block_request`/`on_block_response`
//! never do: per the recovery policy, a failing block is marked `Failed`
//! in the store and the function still returns normally.

use thiserror::Error;

/// Failure setting up or tearing down a task's schedule.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The backing block or task store failed.
    #[error("store error: {0}")]
    Store(#[from] danejoe_store::StoreError),
    /// Writing a queued request to the transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] danejoe_transport::TransportError),
}
