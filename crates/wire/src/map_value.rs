//! Nested map encoding carried inside a `DataType::Map` field's value.

use crate::byte_order;
use crate::data_type::DataType;
use crate::error::CodecError;

/// Bit set in [`MapValue`]'s flags byte when keys have individually varying
/// lengths rather than one shared fixed width.
pub const FLAG_KEY_LENGTH_VARIABLE: u8 = 0x01;
/// Bit set in [`MapValue`]'s flags byte when values have individually
/// varying lengths rather than one shared fixed width.
pub const FLAG_VALUE_LENGTH_VARIABLE: u8 = 0x02;

/// A map of same-typed keys to same-typed values, each stored as raw bytes
/// (the caller interprets them per `key_type`/`value_type`).
#[derive(Clone, Debug, PartialEq)]
pub struct MapValue {
    /// The type tag shared by every key.
    pub key_type: DataType,
    /// The type tag shared by every value.
    pub value_type: DataType,
    /// Raw `(key, value)` byte pairs, in order.
    pub entries: Vec<(Vec<u8>, Vec<u8>)>,
}

impl MapValue {
    /// Encodes `key_type, value_type, entry_count, flags, [key lengths],
    /// [value lengths], keys..., values...`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(self.key_type.to_wire());
        out.push(self.value_type.to_wire());

        let mut count_buf = [0u8; 4];
        byte_order::write_u32(&mut count_buf, self.entries.len() as u32);
        out.extend_from_slice(&count_buf);

        let key_variable = self.key_type.fixed_width().is_none();
        let value_variable = self.value_type.fixed_width().is_none();
        let mut flags = 0u8;
        if key_variable {
            flags |= FLAG_KEY_LENGTH_VARIABLE;
        }
        if value_variable {
            flags |= FLAG_VALUE_LENGTH_VARIABLE;
        }
        out.push(flags);

        if key_variable {
            for (key, _) in &self.entries {
                let mut len_buf = [0u8; 4];
                byte_order::write_u32(&mut len_buf, key.len() as u32);
                out.extend_from_slice(&len_buf);
            }
        } else {
            let width = self.key_type.fixed_width().unwrap_or(0);
            let mut width_buf = [0u8; 4];
            byte_order::write_u32(&mut width_buf, width);
            out.extend_from_slice(&width_buf);
        }

        if value_variable {
            for (_, value) in &self.entries {
                let mut len_buf = [0u8; 4];
                byte_order::write_u32(&mut len_buf, value.len() as u32);
                out.extend_from_slice(&len_buf);
            }
        } else {
            let width = self.value_type.fixed_width().unwrap_or(0);
            let mut width_buf = [0u8; 4];
            byte_order::write_u32(&mut width_buf, width);
            out.extend_from_slice(&width_buf);
        }

        for (key, _) in &self.entries {
            out.extend_from_slice(key);
        }
        for (_, value) in &self.entries {
            out.extend_from_slice(value);
        }
        out
    }

    /// Decodes a `MapValue` from the start of `buf`, returning the value and
    /// the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the buffer is too short for the
    /// declared entry count or lengths.
    pub fn decode(buf: &[u8]) -> Result<(MapValue, usize), CodecError> {
        const MIN_HEADER: usize = 1 + 1 + 4 + 1;
        if buf.len() < MIN_HEADER {
            return Err(CodecError::Truncated {
                declared: MIN_HEADER as u32,
                available: buf.len() as u32,
            });
        }
        let key_type = DataType::from_wire(buf[0]);
        let value_type = DataType::from_wire(buf[1]);
        let entry_count = byte_order::read_u32(&buf[2..6]) as usize;
        let flags = buf[6];
        let mut pos = 7usize;

        let key_variable = flags & FLAG_KEY_LENGTH_VARIABLE != 0;
        let value_variable = flags & FLAG_VALUE_LENGTH_VARIABLE != 0;

        let read_lengths = |buf: &[u8], pos: &mut usize, variable: bool| -> Result<Vec<usize>, CodecError> {
            if variable {
                let need = *pos + entry_count * 4;
                if buf.len() < need {
                    return Err(CodecError::Truncated {
                        declared: need as u32,
                        available: buf.len() as u32,
                    });
                }
                let mut lengths = Vec::with_capacity(entry_count);
                for _ in 0..entry_count {
                    lengths.push(byte_order::read_u32(&buf[*pos..*pos + 4]) as usize);
                    *pos += 4;
                }
                Ok(lengths)
            } else {
                if buf.len() < *pos + 4 {
                    return Err(CodecError::Truncated {
                        declared: (*pos + 4) as u32,
                        available: buf.len() as u32,
                    });
                }
                let width = byte_order::read_u32(&buf[*pos..*pos + 4]) as usize;
                *pos += 4;
                Ok(vec![width; entry_count])
            }
        };

        let key_lengths = read_lengths(buf, &mut pos, key_variable)?;
        let value_lengths = read_lengths(buf, &mut pos, value_variable)?;

        let mut keys = Vec::with_capacity(entry_count);
        for len in key_lengths {
            if buf.len() < pos + len {
                return Err(CodecError::Truncated {
                    declared: (pos + len) as u32,
                    available: buf.len() as u32,
                });
            }
            keys.push(buf[pos..pos + len].to_vec());
            pos += len;
        }

        let mut values = Vec::with_capacity(entry_count);
        for len in value_lengths {
            if buf.len() < pos + len {
                return Err(CodecError::Truncated {
                    declared: (pos + len) as u32,
                    available: buf.len() as u32,
                });
            }
            values.push(buf[pos..pos + len].to_vec());
            pos += len;
        }

        let entries = keys.into_iter().zip(values).collect();

        Ok((
            MapValue {
                key_type,
                value_type,
                entries,
            },
            pos,
        ))
    }
}
