//! Top-level CLI errors; `main` reports these and exits non-zero.

use thiserror::Error;

/// Failure that aborts the transfer entirely (as opposed to a
/// per-block failure, which the scheduler records and moves past).
#[derive(Debug, Error)]
pub enum CliError {
    /// The `url` argument did not parse as a `danejoe://` URL.
    #[error("invalid server url: {0}")]
    InvalidUrl(danejoe_transport::TransportError),
    /// DNS resolution or socket setup failed.
    #[error("failed to resolve or connect to server: {0}")]
    Connect(#[source] std::io::Error),
    /// The reactor itself failed (not a per-connection I/O error).
    #[error("event loop failed: {0}")]
    Reactor(#[source] std::io::Error),
    /// Writing or reading the connection failed.
    #[error("transport error: {0}")]
    Transport(#[from] danejoe_transport::TransportError),
    /// The scheduler could not seed or dispatch a task.
    #[error("scheduler error: {0}")]
    Scheduler(#[from] danejoe_scheduler::SchedulerError),
    /// A response frame failed to decode.
    #[error("protocol error: {0}")]
    Protocol(#[from] danejoe_protocol::ProtocolError),
}
