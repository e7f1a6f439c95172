#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `danejoe-wire` is the lowest layer of the transfer client: the binary
//! encoding shared by every frame that crosses the wire. It has no
//! knowledge of sockets, tasks, or scheduling — only bytes.
//!
//! # Design
//!
//! [`FrameHeader`] is a fixed 16-byte, big-endian header ([`MAGIC`],
//! version, body length, flags, reserved checksum, field count). The body
//! following it is a flat sequence of [`Field`]s, each a name/type/flags
//! tuple plus a value. Scalar values are fixed-width; [`DataType::String`],
//! [`DataType::ByteArray`], [`DataType::Array`], [`DataType::Map`], and
//! [`DataType::Dictionary`] are variable-width containers carried as an
//! opaque byte blob, decoded on demand via [`ArrayValue`]/[`MapValue`].
//! [`FrameCodec`] ties header and fields together under a [`CodecLimits`]
//! cap.
//!
//! # Invariants
//!
//! - All multi-byte scalars are big-endian on the wire, regardless of host
//!   endianness (see [`byte_order`]).
//! - A field exceeding [`CodecLimits`] is skipped, never fatal to the rest
//!   of the frame.
//! - An unrecognised [`DataType`] tag decodes to [`DataType::Unknown`]
//!   rather than failing.
//!
//! # Errors
//!
//! Every fallible operation returns [`CodecError`].

mod array_value;
mod byte_order;
mod codec;
mod data_type;
mod error;
mod field;
mod header;
mod map_value;

pub use array_value::{ArrayValue, FLAG_ELEMENT_LENGTH_VARIABLE};
pub use codec::{CodecLimits, Frame, FrameBuilder, FrameCodec, ScalarValue};
pub use data_type::{DataType, WireScalar};
pub use error::CodecError;
pub use field::{Field, FieldValue, FLAG_HAS_VALUE_LENGTH};
pub use header::{FrameHeader, FLAG_HAS_CHECKSUM, HEADER_LEN, MAGIC, VERSION};
pub use map_value::{MapValue, FLAG_KEY_LENGTH_VARIABLE, FLAG_VALUE_LENGTH_VARIABLE};
