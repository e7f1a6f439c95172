//! A single named, typed field within a frame body.

use crate::byte_order;
use crate::data_type::DataType;
use crate::error::CodecError;

/// Bit set in [`RawField::flags`] when a `value_length: u32` precedes the
/// value bytes. Always set for variable-width types, always clear for
/// fixed-width ones.
pub const FLAG_HAS_VALUE_LENGTH: u8 = 0x01;

/// The decoded, typed value carried by a [`Field`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// `DataType::UInt8`.
    UInt8(u8),
    /// `DataType::Int8`.
    Int8(i8),
    /// `DataType::UInt16`.
    UInt16(u16),
    /// `DataType::Int16`.
    Int16(i16),
    /// `DataType::UInt32`.
    UInt32(u32),
    /// `DataType::Int32`.
    Int32(i32),
    /// `DataType::UInt64`.
    UInt64(u64),
    /// `DataType::Int64`.
    Int64(i64),
    /// `DataType::Float`.
    Float(f32),
    /// `DataType::Double`.
    Double(f64),
    /// `DataType::Bool`.
    Bool(bool),
    /// Opaque container payload for `String`/`ByteArray`/`Array`/`Map`/`Dictionary`.
    /// Passed through verbatim; inner encoding is decoded on demand.
    Container(Vec<u8>),
    /// `DataType::Null`: explicit absence of a value.
    Null,
    /// `DataType::Object`/`DataType::Unknown`: an unrecognised or
    /// unstructured tag. The raw bytes (always empty in this
    /// implementation) are kept so round-tripping an unknown field does
    /// not lose data.
    Unknown(Vec<u8>),
}

/// A fully decoded field: name, type tag, raw flags, and value.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    /// Field name as it appeared on the wire.
    pub name: String,
    /// The type tag this field was encoded with.
    pub data_type: DataType,
    /// Raw flags byte (see [`FLAG_HAS_VALUE_LENGTH`]).
    pub flags: u8,
    /// The decoded value.
    pub value: FieldValue,
}

/// The minimal structural decode of a field: used internally before
/// [`crate::codec::CodecLimits`] are applied, so a field that exceeds
/// configured caps can still be skipped without losing frame alignment.
pub(crate) struct RawField {
    pub name: String,
    pub data_type: DataType,
    pub flags: u8,
    pub value_bytes: Vec<u8>,
}

impl RawField {
    /// Parses one field starting at `buf[0]`, returning the field and the
    /// number of bytes consumed.
    pub(crate) fn decode(buf: &[u8]) -> Result<(RawField, usize), CodecError> {
        let overrun = |field: &str| CodecError::FieldOverrun {
            field: field.to_string(),
        };

        if buf.len() < 2 {
            return Err(overrun(""));
        }
        let name_length = byte_order::read_u16(&buf[0..2]) as usize;
        let mut pos = 2usize;
        if buf.len() < pos + name_length {
            return Err(overrun(""));
        }
        let name = String::from_utf8_lossy(&buf[pos..pos + name_length]).into_owned();
        pos += name_length;

        if buf.len() < pos + 2 {
            return Err(overrun(&name));
        }
        let data_type = DataType::from_wire(buf[pos]);
        let flags = buf[pos + 1];
        pos += 2;

        let has_value_length = flags & FLAG_HAS_VALUE_LENGTH != 0;
        let value_length = if has_value_length {
            if buf.len() < pos + 4 {
                return Err(overrun(&name));
            }
            let len = byte_order::read_u32(&buf[pos..pos + 4]) as usize;
            pos += 4;
            len
        } else {
            data_type.fixed_width().unwrap_or(0) as usize
        };

        // A declared value_length that disagrees with a fixed-width type's
        // actual width would otherwise slice a too-short/too-long buffer
        // into the scalar readers in `into_field`, which panic on mismatch.
        if let Some(fixed) = data_type.fixed_width() {
            if value_length != fixed as usize {
                return Err(overrun(&name));
            }
        }

        if buf.len() < pos + value_length {
            return Err(overrun(&name));
        }
        let value_bytes = buf[pos..pos + value_length].to_vec();
        pos += value_length;

        Ok((
            RawField {
                name,
                data_type,
                flags,
                value_bytes,
            },
            pos,
        ))
    }

    /// Converts the raw, still-untyped bytes into a [`Field`].
    pub(crate) fn into_field(self) -> Field {
        let value = match self.data_type {
            DataType::UInt8 => FieldValue::UInt8(self.value_bytes.first().copied().unwrap_or(0)),
            DataType::Int8 => {
                FieldValue::Int8(self.value_bytes.first().copied().unwrap_or(0) as i8)
            }
            DataType::UInt16 => FieldValue::UInt16(byte_order::read_u16(&self.value_bytes)),
            DataType::Int16 => FieldValue::Int16(byte_order::read_i16(&self.value_bytes)),
            DataType::UInt32 => FieldValue::UInt32(byte_order::read_u32(&self.value_bytes)),
            DataType::Int32 => FieldValue::Int32(byte_order::read_i32(&self.value_bytes)),
            DataType::UInt64 => FieldValue::UInt64(byte_order::read_u64(&self.value_bytes)),
            DataType::Int64 => FieldValue::Int64(byte_order::read_i64(&self.value_bytes)),
            DataType::Float => FieldValue::Float(byte_order::read_f32(&self.value_bytes)),
            DataType::Double => FieldValue::Double(byte_order::read_f64(&self.value_bytes)),
            DataType::Bool => FieldValue::Bool(self.value_bytes.first().copied().unwrap_or(0) != 0),
            DataType::String
            | DataType::ByteArray
            | DataType::Array
            | DataType::Map
            | DataType::Dictionary => FieldValue::Container(self.value_bytes),
            DataType::Null => FieldValue::Null,
            DataType::Object | DataType::Unknown => FieldValue::Unknown(self.value_bytes),
        };
        Field {
            name: self.name,
            data_type: self.data_type,
            flags: self.flags,
            value,
        }
    }
}

impl Field {
    /// Encodes this field's `name_length/name/type/flags/[value_length]/value`
    /// layout, appending to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        let name_bytes = self.name.as_bytes();
        let mut name_len_buf = [0u8; 2];
        byte_order::write_u16(&mut name_len_buf, name_bytes.len() as u16);
        out.extend_from_slice(&name_len_buf);
        out.extend_from_slice(name_bytes);
        out.push(self.data_type.to_wire());
        out.push(self.flags);

        let value_bytes = self.encoded_value_bytes();
        if self.flags & FLAG_HAS_VALUE_LENGTH != 0 {
            let mut len_buf = [0u8; 4];
            byte_order::write_u32(&mut len_buf, value_bytes.len() as u32);
            out.extend_from_slice(&len_buf);
        }
        out.extend_from_slice(&value_bytes);
    }

    fn encoded_value_bytes(&self) -> Vec<u8> {
        match &self.value {
            FieldValue::UInt8(v) => vec![*v],
            FieldValue::Int8(v) => vec![*v as u8],
            FieldValue::UInt16(v) => {
                let mut buf = [0u8; 2];
                byte_order::write_u16(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::Int16(v) => {
                let mut buf = [0u8; 2];
                byte_order::write_i16(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::UInt32(v) => {
                let mut buf = [0u8; 4];
                byte_order::write_u32(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::Int32(v) => {
                let mut buf = [0u8; 4];
                byte_order::write_i32(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::UInt64(v) => {
                let mut buf = [0u8; 8];
                byte_order::write_u64(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::Int64(v) => {
                let mut buf = [0u8; 8];
                byte_order::write_i64(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::Float(v) => {
                let mut buf = [0u8; 4];
                byte_order::write_f32(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::Double(v) => {
                let mut buf = [0u8; 8];
                byte_order::write_f64(&mut buf, *v);
                buf.to_vec()
            }
            FieldValue::Bool(v) => vec![u8::from(*v)],
            FieldValue::Container(bytes) => bytes.clone(),
            FieldValue::Null => Vec::new(),
            FieldValue::Unknown(bytes) => bytes.clone(),
        }
    }

    /// Builds a fixed-width scalar field with `flags` cleared of
    /// `HAS_VALUE_LENGTH` automatically.
    pub fn scalar(name: impl Into<String>, data_type: DataType, value: FieldValue) -> Field {
        Field {
            name: name.into(),
            data_type,
            flags: 0,
            value,
        }
    }

    /// Builds a variable-width container field with `HAS_VALUE_LENGTH` set.
    pub(crate) fn container(name: impl Into<String>, data_type: DataType, bytes: Vec<u8>) -> Field {
        Field {
            name: name.into(),
            data_type,
            flags: FLAG_HAS_VALUE_LENGTH,
            value: FieldValue::Container(bytes),
        }
    }
}
