//! Decode-time error taxonomy.

use thiserror::Error;

/// Failure decoding a frame, header, or a nested container value.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum CodecError {
    /// Buffer shorter than the 16-byte fixed header.
    #[error("buffer shorter than the 16-byte frame header")]
    ShortHeader,
    /// The header's magic number did not match `0x66666666`.
    #[error("bad magic number")]
    BadMagic,
    /// The header declared a protocol version this decoder does not speak.
    #[error("unsupported protocol version {found}")]
    UnsupportedVersion {
        /// The version byte actually found.
        found: u8,
    },
    /// The header's declared `body_length` exceeds the bytes available.
    #[error("frame truncated: declared body length {declared} exceeds available {available}")]
    Truncated {
        /// Bytes the header claimed would follow.
        declared: u32,
        /// Bytes actually available.
        available: u32,
    },
    /// A field's declared name/value lengths would read past the body.
    #[error("field `{field}` overruns the frame body")]
    FieldOverrun {
        /// Name of the field being decoded, if it was read before the
        /// overrun was detected.
        field: String,
    },
}
