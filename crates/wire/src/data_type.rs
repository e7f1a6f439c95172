//! The wire type-tag enumeration.

/// Type tag carried by every [`crate::Field`].
///
/// Numeric order is the crate's own wire convention (this is a from-scratch
/// reimplementation of the protocol, not a byte-for-byte port of the
/// original C++ server); it is fixed once chosen since it appears on the
/// wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum DataType {
    /// Opaque tagged value with no fixed layout; never produced by the
    /// encoder, accepted only so the decoder can name an unrecognised slot.
    Object = 0,
    /// Unsigned 8-bit integer.
    UInt8 = 1,
    /// Signed 8-bit integer.
    Int8 = 2,
    /// Unsigned 16-bit integer.
    UInt16 = 3,
    /// Signed 16-bit integer.
    Int16 = 4,
    /// Unsigned 32-bit integer.
    UInt32 = 5,
    /// Signed 32-bit integer.
    Int32 = 6,
    /// Unsigned 64-bit integer.
    UInt64 = 7,
    /// Signed 64-bit integer.
    Int64 = 8,
    /// IEEE-754 single precision float.
    Float = 9,
    /// IEEE-754 double precision float.
    Double = 10,
    /// Boolean, encoded as a single `0x00`/`0x01` byte.
    Bool = 11,
    /// UTF-8 string, variable length.
    String = 12,
    /// Opaque byte array, variable length.
    ByteArray = 13,
    /// Nested [`crate::MapValue`], variable length.
    Map = 14,
    /// Nested [`crate::ArrayValue`], variable length.
    Array = 15,
    /// Nested dictionary; encoded identically to [`DataType::ByteArray`]
    /// (opaque, passed through verbatim) since the protocol paths in this
    /// workspace never populate one. See `DESIGN.md` for the rationale.
    Dictionary = 16,
    /// Explicit absence of a value. Always zero-width on the wire.
    Null = 17,
    /// Placeholder for a tag byte the decoder does not recognise.
    Unknown = 18,
}

impl DataType {
    /// Returns the statically known byte width of a fixed-width type, or
    /// `None` for variable-width types (`String`, `ByteArray`, `Array`,
    /// `Map`, `Dictionary`).
    #[must_use]
    pub const fn fixed_width(self) -> Option<u32> {
        match self {
            DataType::UInt8 | DataType::Int8 | DataType::Bool => Some(1),
            DataType::UInt16 | DataType::Int16 => Some(2),
            DataType::UInt32 | DataType::Int32 | DataType::Float => Some(4),
            DataType::UInt64 | DataType::Int64 | DataType::Double => Some(8),
            DataType::Null => Some(0),
            DataType::Object | DataType::Unknown => Some(0),
            DataType::String
            | DataType::ByteArray
            | DataType::Map
            | DataType::Array
            | DataType::Dictionary => None,
        }
    }

    /// Returns `true` for the container-typed values that are passed
    /// through the codec as opaque bytes (their inner encoding is decoded
    /// on demand, not eagerly).
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            DataType::String
                | DataType::ByteArray
                | DataType::Array
                | DataType::Map
                | DataType::Dictionary
        )
    }

    /// Decodes a wire tag byte. Unrecognised bytes map to [`DataType::Unknown`]
    /// rather than failing the whole frame.
    #[must_use]
    pub const fn from_wire(tag: u8) -> DataType {
        match tag {
            0 => DataType::Object,
            1 => DataType::UInt8,
            2 => DataType::Int8,
            3 => DataType::UInt16,
            4 => DataType::Int16,
            5 => DataType::UInt32,
            6 => DataType::Int32,
            7 => DataType::UInt64,
            8 => DataType::Int64,
            9 => DataType::Float,
            10 => DataType::Double,
            11 => DataType::Bool,
            12 => DataType::String,
            13 => DataType::ByteArray,
            14 => DataType::Map,
            15 => DataType::Array,
            16 => DataType::Dictionary,
            17 => DataType::Null,
            _ => DataType::Unknown,
        }
    }

    /// Encodes the tag to its wire byte.
    #[must_use]
    pub const fn to_wire(self) -> u8 {
        self as u8
    }
}

/// Maps a Rust scalar type onto its [`DataType`] tag, used by the typed
/// encoder/accessor helpers in [`crate::codec`].
pub trait WireScalar: Copy {
    /// The tag this Rust type is carried as on the wire.
    const DATA_TYPE: DataType;
}

macro_rules! impl_wire_scalar {
    ($ty:ty, $tag:expr) => {
        impl WireScalar for $ty {
            const DATA_TYPE: DataType = $tag;
        }
    };
}

impl_wire_scalar!(u8, DataType::UInt8);
impl_wire_scalar!(i8, DataType::Int8);
impl_wire_scalar!(u16, DataType::UInt16);
impl_wire_scalar!(i16, DataType::Int16);
impl_wire_scalar!(u32, DataType::UInt32);
impl_wire_scalar!(i32, DataType::Int32);
impl_wire_scalar!(u64, DataType::UInt64);
impl_wire_scalar!(i64, DataType::Int64);
impl_wire_scalar!(f32, DataType::Float);
impl_wire_scalar!(f64, DataType::Double);
impl_wire_scalar!(bool, DataType::Bool);
