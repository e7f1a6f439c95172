//! Nested array encoding carried inside a `DataType::Array` field's value.

use crate::byte_order;
use crate::data_type::DataType;
use crate::error::CodecError;

/// Bit set in [`ArrayValue`]'s flags byte when elements have individually
/// varying lengths (e.g. a `ByteArray` array) rather than one shared
/// fixed width (e.g. an `Int32` array).
pub const FLAG_ELEMENT_LENGTH_VARIABLE: u8 = 0x01;

/// An array of same-typed elements, each stored as raw bytes (the caller
/// interprets them per `element_type`).
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayValue {
    /// The type tag shared by every element.
    pub element_type: DataType,
    /// Raw element bytes, in order.
    pub elements: Vec<Vec<u8>>,
}

impl ArrayValue {
    /// Encodes `element_type, element_count, flags, [lengths], elements...`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.push(self.element_type.to_wire());

        let mut count_buf = [0u8; 4];
        byte_order::write_u32(&mut count_buf, self.elements.len() as u32);
        out.extend_from_slice(&count_buf);

        let is_variable = self.element_type.fixed_width().is_none();
        out.push(if is_variable {
            FLAG_ELEMENT_LENGTH_VARIABLE
        } else {
            0
        });

        if is_variable {
            for element in &self.elements {
                let mut len_buf = [0u8; 4];
                byte_order::write_u32(&mut len_buf, element.len() as u32);
                out.extend_from_slice(&len_buf);
            }
        } else {
            let width = self.element_type.fixed_width().unwrap_or(0);
            let mut width_buf = [0u8; 4];
            byte_order::write_u32(&mut width_buf, width);
            out.extend_from_slice(&width_buf);
        }

        for element in &self.elements {
            out.extend_from_slice(element);
        }
        out
    }

    /// Decodes an `ArrayValue` from the start of `buf`, returning the value
    /// and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the buffer is too short for the
    /// declared element count or lengths.
    pub fn decode(buf: &[u8]) -> Result<(ArrayValue, usize), CodecError> {
        const MIN_HEADER: usize = 1 + 4 + 1;
        if buf.len() < MIN_HEADER {
            return Err(CodecError::Truncated {
                declared: MIN_HEADER as u32,
                available: buf.len() as u32,
            });
        }
        let element_type = DataType::from_wire(buf[0]);
        let element_count = byte_order::read_u32(&buf[1..5]) as usize;
        let flags = buf[5];
        let mut pos = 6usize;
        let is_variable = flags & FLAG_ELEMENT_LENGTH_VARIABLE != 0;

        let lengths: Vec<usize> = if is_variable {
            let need = pos + element_count * 4;
            if buf.len() < need {
                return Err(CodecError::Truncated {
                    declared: need as u32,
                    available: buf.len() as u32,
                });
            }
            let mut lengths = Vec::with_capacity(element_count);
            for _ in 0..element_count {
                lengths.push(byte_order::read_u32(&buf[pos..pos + 4]) as usize);
                pos += 4;
            }
            lengths
        } else {
            if buf.len() < pos + 4 {
                return Err(CodecError::Truncated {
                    declared: (pos + 4) as u32,
                    available: buf.len() as u32,
                });
            }
            let width = byte_order::read_u32(&buf[pos..pos + 4]) as usize;
            pos += 4;
            vec![width; element_count]
        };

        let mut elements = Vec::with_capacity(element_count);
        for len in lengths {
            if buf.len() < pos + len {
                return Err(CodecError::Truncated {
                    declared: (pos + len) as u32,
                    available: buf.len() as u32,
                });
            }
            elements.push(buf[pos..pos + len].to_vec());
            pos += len;
        }

        Ok((
            ArrayValue {
                element_type,
                elements,
            },
            pos,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_array_round_trips() {
        let array = ArrayValue {
            element_type: DataType::Int32,
            elements: vec![1i32.to_be_bytes().to_vec(), 2i32.to_be_bytes().to_vec()],
        };
        let bytes = array.encode();
        let (decoded, consumed) = ArrayValue::decode(&bytes).expect("decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, array);
    }

    #[test]
    fn variable_width_array_round_trips() {
        let array = ArrayValue {
            element_type: DataType::ByteArray,
            elements: vec![b"a".to_vec(), b"bcd".to_vec(), b"".to_vec()],
        };
        let bytes = array.encode();
        let (decoded, consumed) = ArrayValue::decode(&bytes).expect("decode");
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded, array);
    }

    #[test]
    fn truncated_array_is_rejected() {
        let array = ArrayValue {
            element_type: DataType::ByteArray,
            elements: vec![b"abcdef".to_vec()],
        };
        let mut bytes = array.encode();
        bytes.truncate(bytes.len() - 1);
        assert!(ArrayValue::decode(&bytes).is_err());
    }
}
