//! Transport and endpoint-parsing errors.

use thiserror::Error;

/// Failure reading, writing, or addressing a [`crate::TransportSession`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The underlying socket returned an I/O error other than
    /// `WouldBlock`.
    #[error("transport i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// The peer closed the connection (a zero-length read).
    #[error("peer closed the connection")]
    Closed,
    /// A `danejoe://host:port` string failed to parse.
    #[error("invalid endpoint url `{0}`")]
    InvalidUrl(String),
}
