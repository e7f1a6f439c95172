//! Errors raised while assembling or parsing envelopes.

use danejoe_wire::CodecError;
use thiserror::Error;

/// Failure while building or parsing request/response envelopes.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The underlying frame failed to decode.
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// A required field was absent from a parsed body.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A body field contained bytes that were not valid UTF-8.
    #[error("field `{0}` is not valid utf-8")]
    InvalidUtf8(&'static str),
    /// The envelope's `path` did not match any known server path.
    #[error("unknown path `{0}`")]
    UnknownPath(String),
}
